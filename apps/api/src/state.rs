use std::sync::Arc;

use sqlx::PgPool;

use crate::catalog::Catalog;
use crate::embedding::EmbeddingProvider;
use crate::models::job::JobPosting;
use crate::models::skill::SkillDefinition;
use crate::roadmap::synthesizer::RoadmapSynthesizer;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is read-only or internally synchronized; requests share no mutable state.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Job postings ranked by roadmap generation and job matching.
    pub jobs: Arc<dyn Catalog<JobPosting>>,
    /// Skill definitions ranked by skill search.
    pub skills: Arc<dyn Catalog<SkillDefinition>>,
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub synthesizer: RoadmapSynthesizer,
}
