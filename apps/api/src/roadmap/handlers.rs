//! Axum route handlers for the Roadmap API.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::catalog::CatalogFilter;
use crate::errors::AppError;
use crate::matching::ranker::RoleMatchTier;
use crate::models::roadmap::RoadmapRow;
use crate::roadmap::store::{get_roadmap, insert_roadmap, learning_path};
use crate::roadmap::{LearningStep, RoadmapRequest};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RoadmapResponse {
    pub id: Uuid,
    pub current_skills: Vec<String>,
    pub target_role: String,
    pub target_salary: Option<f64>,
    pub skill_gaps: Vec<String>,
    pub recommended_skills: Vec<String>,
    pub learning_path: Vec<LearningStep>,
    pub estimated_timeline: String,
    pub confidence_score: f64,
    pub provenance: String,
    /// Only known for freshly generated roadmaps; not persisted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_tier: Option<RoleMatchTier>,
    pub created_at: DateTime<Utc>,
}

impl RoadmapResponse {
    fn from_row(row: RoadmapRow, match_tier: Option<RoleMatchTier>) -> Result<Self, AppError> {
        let learning_path = learning_path(&row)?;
        Ok(Self {
            id: row.id,
            current_skills: row.current_skills,
            target_role: row.target_role,
            target_salary: row.target_salary,
            skill_gaps: row.skill_gaps,
            recommended_skills: row.recommended_skills,
            learning_path,
            estimated_timeline: row.estimated_timeline,
            confidence_score: row.confidence_score,
            provenance: row.provenance,
            match_tier,
            created_at: row.created_at,
        })
    }
}

/// POST /api/v1/roadmaps/generate
///
/// Builds a roadmap against the current job catalog and stores it.
pub async fn handle_generate_roadmap(
    State(state): State<AppState>,
    Json(request): Json<RoadmapRequest>,
) -> Result<Json<RoadmapResponse>, AppError> {
    request.validate()?;

    let catalog = state.jobs.query(&CatalogFilter::default()).await?;
    let roadmap = state.synthesizer.build_roadmap(&catalog, &request).await?;
    let row = insert_roadmap(&state.db, &roadmap).await?;

    Ok(Json(RoadmapResponse::from_row(row, Some(roadmap.match_tier))?))
}

/// GET /api/v1/roadmaps/:id
pub async fn handle_get_roadmap(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RoadmapResponse>, AppError> {
    let row = get_roadmap(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Roadmap {id} not found")))?;
    Ok(Json(RoadmapResponse::from_row(row, None)?))
}
