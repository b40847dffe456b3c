//! Embedding: the `EmbeddingProvider` capability consumed by ranking and synthesis.
//!
//! Providers are injected at construction time (`Arc<dyn EmbeddingProvider>`),
//! never looked up from global state. Two backends ship with the service:
//! - `HttpEmbedder`: a sentence-embedding service reachable over HTTP
//! - `HashingEmbedder`: deterministic feature hashing, used when no service is configured

use async_trait::async_trait;
use thiserror::Error;

pub mod hashing;
pub mod http;

pub use hashing::HashingEmbedder;
pub use http::HttpEmbedder;

/// Fixed-length embedding vector. The length is constant across a catalog.
pub type SkillVector = Vec<f32>;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Text cannot be empty")]
    EmptyInput,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Embedding API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Embedding has {actual} dimensions, expected {expected}")]
    Dimension { expected: usize, actual: usize },
}

/// Turns text into a `SkillVector`. Implementations must be safe for concurrent use.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Fails with `EmbeddingError::EmptyInput` when `text` is blank after trimming.
    async fn embed(&self, text: &str) -> Result<SkillVector, EmbeddingError>;

    fn dimension(&self) -> usize;

    /// Short backend label for logs.
    fn name(&self) -> &'static str;
}

/// Rejects blank input before any provider work happens.
pub(crate) fn require_text(text: &str) -> Result<&str, EmbeddingError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(EmbeddingError::EmptyInput);
    }
    Ok(trimmed)
}
