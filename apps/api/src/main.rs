mod catalog;
mod config;
mod db;
mod embedding;
mod errors;
mod llm_client;
mod matching;
mod models;
mod roadmap;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::{PgJobCatalog, PgSkillCatalog};
use crate::config::Config;
use crate::db::create_pool;
use crate::embedding::{EmbeddingProvider, HashingEmbedder, HttpEmbedder};
use crate::llm_client::LlmClient;
use crate::roadmap::synthesizer::RoadmapSynthesizer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SkillBridge API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize embedding provider
    let embedder = build_embedder(&config);
    info!(
        "Embedding provider initialized ({}, {} dimensions)",
        embedder.name(),
        embedder.dimension()
    );

    // Initialize LLM client
    let llm = Arc::new(LlmClient::new(config.anthropic_api_key.clone()));
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let settings = config.synthesis_settings();
    info!(
        "Roadmap synthesis: top {} title-matched / {} unfiltered postings, temperature {}",
        settings.limits.title_filtered, settings.limits.unfiltered, settings.temperature
    );
    let synthesizer = RoadmapSynthesizer::new(embedder.clone(), llm, settings);

    // Build app state
    let state = AppState {
        jobs: Arc::new(PgJobCatalog::new(db.clone())),
        skills: Arc::new(PgSkillCatalog::new(db.clone())),
        db,
        embedder,
        synthesizer,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// HTTP embedding service when `EMBEDDING_URL` is set, deterministic hashing otherwise.
fn build_embedder(config: &Config) -> Arc<dyn EmbeddingProvider> {
    match &config.embedding_url {
        Some(url) => Arc::new(HttpEmbedder::new(url.clone(), config.embedding_dimensions)),
        None => Arc::new(HashingEmbedder::new(config.embedding_dimensions)),
    }
}
