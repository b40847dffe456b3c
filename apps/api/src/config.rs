use anyhow::{Context, Result};

use crate::matching::ranker::TierLimits;
use crate::roadmap::synthesizer::SynthesisSettings;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    /// Sentence-embedding endpoint. `None` selects the built-in hashing embedder.
    pub embedding_url: Option<String>,
    pub embedding_dimensions: usize,
    pub roadmap_temperature: f32,
    pub roadmap_max_tokens: Option<u32>,
    pub title_match_limit: usize,
    pub fallback_match_limit: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            embedding_url: std::env::var("EMBEDDING_URL")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            embedding_dimensions: parse_env("EMBEDDING_DIMENSIONS", 384)?,
            roadmap_temperature: parse_env("ROADMAP_TEMPERATURE", 0.7)?,
            roadmap_max_tokens: parse_optional_env("ROADMAP_MAX_TOKENS")?,
            title_match_limit: parse_env("TITLE_MATCH_LIMIT", 10)?,
            fallback_match_limit: parse_env("FALLBACK_MATCH_LIMIT", 5)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn synthesis_settings(&self) -> SynthesisSettings {
        SynthesisSettings {
            limits: TierLimits {
                title_filtered: self.title_match_limit.max(1),
                unfiltered: self.fallback_match_limit.max(1),
            },
            temperature: self.roadmap_temperature,
            max_tokens: self.roadmap_max_tokens,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    Ok(parse_optional_env(key)?.unwrap_or(default))
}

fn parse_optional_env<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        _ => Ok(None),
    }
}
