//! Axum route handlers for the Matching API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::CatalogFilter;
use crate::errors::AppError;
use crate::matching::confidence::{compute_skill_gap, SkillGap};
use crate::matching::ranker::rank_catalog;
use crate::matching::skill_set::SkillSet;
use crate::state::AppState;

pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 50;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct JobMatchRequest {
    pub skills: Vec<String>,
    pub limit: Option<usize>,
    pub min_salary: Option<f64>,
    pub experience_level: Option<String>,
    pub remote_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JobMatch {
    pub job_id: i64,
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub required_skills: Vec<String>,
    pub match_score: f64,
    pub missing_skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct JobMatchResponse {
    pub matches: Vec<JobMatch>,
}

#[derive(Debug, Deserialize)]
pub struct SkillSearchRequest {
    pub query: String,
    pub limit: Option<usize>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SkillHit {
    pub skill_name: String,
    pub category: String,
    pub similarity_score: f64,
    pub demand_score: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct SkillSearchResponse {
    pub skills: Vec<SkillHit>,
}

#[derive(Debug, Deserialize)]
pub struct SkillGapRequest {
    pub current_skills: Vec<String>,
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub preferred_skills: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn resolve_limit(limit: Option<usize>) -> Result<usize, AppError> {
    match limit.unwrap_or(DEFAULT_LIMIT) {
        n @ 1..=MAX_LIMIT => Ok(n),
        n => Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_LIMIT}, got {n}"
        ))),
    }
}

/// Embedding input for a match query: the skills exactly as sent, in order.
fn match_query_text(skills: &[String]) -> String {
    skills.join(", ")
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs/match
///
/// Ranks job postings against the caller's skills under optional hard filters.
pub async fn handle_match_jobs(
    State(state): State<AppState>,
    Json(request): Json<JobMatchRequest>,
) -> Result<Json<JobMatchResponse>, AppError> {
    let limit = resolve_limit(request.limit)?;
    let known = SkillSet::normalize(&request.skills);
    if known.is_empty() {
        return Err(AppError::Validation(
            "skills must contain at least one skill".to_string(),
        ));
    }

    let filter = CatalogFilter {
        min_salary: request.min_salary,
        experience_level: request.experience_level,
        remote_type: request.remote_type,
        ..CatalogFilter::default()
    };

    let query = state.embedder.embed(&match_query_text(&request.skills)).await?;
    let catalog = state.jobs.query(&filter).await?;
    let results = rank_catalog(&query, &catalog, &filter, limit, &known)?;
    info!(
        "Matched {} of {} job postings for {} skills",
        results.len(),
        catalog.len(),
        known.len()
    );

    let matches = results
        .into_iter()
        .map(|r| JobMatch {
            job_id: r.entity.id,
            title: r.entity.title,
            company: r.entity.company,
            location: r.entity.location,
            salary_min: r.entity.salary_min,
            salary_max: r.entity.salary_max,
            required_skills: r.entity.required_skills,
            match_score: round3(r.similarity),
            missing_skills: r.missing_skills.to_vec(),
        })
        .collect();

    Ok(Json(JobMatchResponse { matches }))
}

/// POST /api/v1/skills/search
pub async fn handle_search_skills(
    State(state): State<AppState>,
    Json(request): Json<SkillSearchRequest>,
) -> Result<Json<SkillSearchResponse>, AppError> {
    let limit = resolve_limit(request.limit)?;
    if request.query.trim().is_empty() {
        return Err(AppError::Validation("query cannot be empty".to_string()));
    }

    let filter = CatalogFilter {
        category: request.category,
        ..CatalogFilter::default()
    };

    let query = state.embedder.embed(&request.query).await?;
    let catalog = state.skills.query(&filter).await?;
    let results = rank_catalog(&query, &catalog, &filter, limit, &SkillSet::new())?;

    let skills = results
        .into_iter()
        .map(|r| SkillHit {
            skill_name: r.entity.name,
            category: r
                .entity
                .category
                .unwrap_or_else(|| "Uncategorized".to_string()),
            similarity_score: round3(r.similarity),
            demand_score: r.entity.demand_score,
        })
        .collect();

    Ok(Json(SkillSearchResponse { skills }))
}

/// POST /api/v1/skills/gap
///
/// Pure set arithmetic over the supplied lists; touches neither the catalog nor the embedder.
pub async fn handle_skill_gap(Json(request): Json<SkillGapRequest>) -> Json<SkillGap> {
    let current = SkillSet::normalize(&request.current_skills);
    let required = SkillSet::normalize(&request.required_skills);
    let preferred = SkillSet::normalize(&request.preferred_skills);
    Json(compute_skill_gap(&current, &required, &preferred))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_limit_defaults_to_ten() {
        assert_eq!(resolve_limit(None).unwrap(), DEFAULT_LIMIT);
    }

    #[test]
    fn test_resolve_limit_bounds() {
        assert_eq!(resolve_limit(Some(1)).unwrap(), 1);
        assert_eq!(resolve_limit(Some(50)).unwrap(), 50);
        assert!(matches!(resolve_limit(Some(0)), Err(AppError::Validation(_))));
        assert!(matches!(resolve_limit(Some(51)), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_match_query_text_keeps_skills_as_sent() {
        let skills = vec!["SQL".to_string(), "python".to_string(), "Python".to_string()];
        assert_eq!(match_query_text(&skills), "SQL, python, Python");
    }

    #[test]
    fn test_round3() {
        assert_eq!(round3(0.123456), 0.123);
        assert_eq!(round3(0.4567), 0.457);
        assert_eq!(round3(1.0), 1.0);
    }

    #[tokio::test]
    async fn test_skill_gap_handler_normalizes_lists() {
        let Json(result) = handle_skill_gap(Json(SkillGapRequest {
            current_skills: vec!["python".to_string(), " SQL ".to_string()],
            required_skills: vec!["Python".to_string(), "Spark".to_string(), "sql".to_string()],
            preferred_skills: vec!["Airflow".to_string(), "Python".to_string()],
        }))
        .await;
        assert_eq!(result.gap.to_vec(), vec!["Spark".to_string()]);
        assert_eq!(result.recommended.to_vec(), vec!["Airflow".to_string()]);
        assert!((result.confidence - 2.0 / 3.0).abs() < 1e-9);
    }
}
