//! Axum route handlers for the Jobs and Skills catalog API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::catalog::store::{self, JobStats, Page};
use crate::catalog::{job_embedding_text, CatalogFilter};
use crate::errors::AppError;
use crate::models::job::{JobPostingRecord, NewJobPosting};
use crate::models::skill::{NewSkill, SkillRecord};
use crate::state::AppState;

pub const DEFAULT_TRENDING_LIMIT: i64 = 10;
pub const MAX_TRENDING_LIMIT: i64 = 50;

// ────────────────────────────────────────────────────────────────────────────
// Query / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct JobListQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub experience_level: Option<String>,
    pub remote_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SkillListQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TrendingQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

fn validate_new_job(job: &NewJobPosting) -> Result<(), AppError> {
    if job.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    if let (Some(min), Some(max)) = (job.salary_min, job.salary_max) {
        if min > max {
            return Err(AppError::Validation(format!(
                "salary_min ({min}) cannot exceed salary_max ({max})"
            )));
        }
    }
    Ok(())
}

fn validate_new_skill(skill: &NewSkill) -> Result<(), AppError> {
    if skill.name.trim().is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }
    Ok(())
}

fn resolve_trending_limit(limit: Option<i64>) -> Result<i64, AppError> {
    match limit.unwrap_or(DEFAULT_TRENDING_LIMIT) {
        n @ 1..=MAX_TRENDING_LIMIT => Ok(n),
        n => Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_TRENDING_LIMIT}, got {n}"
        ))),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Jobs
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs
///
/// Embeds the posting's skills (or its title) and stores it in the catalog.
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(job): Json<NewJobPosting>,
) -> Result<Json<JobPostingRecord>, AppError> {
    validate_new_job(&job)?;

    let text = job_embedding_text(job.title.trim(), &job.required_skills, &job.preferred_skills);
    let embedding = state.embedder.embed(&text).await?;
    let record = store::insert_job(&state.db, &job, &embedding).await?;

    Ok(Json(record))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> Result<Json<Vec<JobPostingRecord>>, AppError> {
    let page = Page::resolve(query.skip, query.limit)?;
    let filter = CatalogFilter {
        experience_level: query.experience_level,
        remote_type: query.remote_type,
        ..CatalogFilter::default()
    };
    Ok(Json(store::list_jobs(&state.db, &filter, page).await?))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<JobPostingRecord>, AppError> {
    let record = store::get_job(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job posting {id} not found")))?;
    Ok(Json(record))
}

/// GET /api/v1/jobs/stats/summary
pub async fn handle_job_stats(State(state): State<AppState>) -> Result<Json<JobStats>, AppError> {
    Ok(Json(store::job_stats(&state.db).await?))
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/skills
///
/// Embeds the skill name and stores it. Duplicate names are rejected with 400.
pub async fn handle_create_skill(
    State(state): State<AppState>,
    Json(skill): Json<NewSkill>,
) -> Result<Json<SkillRecord>, AppError> {
    validate_new_skill(&skill)?;

    let embedding = state.embedder.embed(skill.name.trim()).await?;
    let record = store::insert_skill(&state.db, &skill, &embedding).await?;

    Ok(Json(record))
}

/// GET /api/v1/skills
pub async fn handle_list_skills(
    State(state): State<AppState>,
    Query(query): Query<SkillListQuery>,
) -> Result<Json<Vec<SkillRecord>>, AppError> {
    let page = Page::resolve(query.skip, query.limit)?;
    let filter = CatalogFilter {
        category: query.category,
        ..CatalogFilter::default()
    };
    Ok(Json(store::list_skills(&state.db, &filter, page).await?))
}

/// GET /api/v1/skills/:id
pub async fn handle_get_skill(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SkillRecord>, AppError> {
    let record = store::get_skill(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Skill {id} not found")))?;
    Ok(Json(record))
}

/// GET /api/v1/skills/categories/list
pub async fn handle_list_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoriesResponse>, AppError> {
    let categories = store::list_categories(&state.db).await?;
    Ok(Json(CategoriesResponse { categories }))
}

/// GET /api/v1/skills/trending/top
pub async fn handle_trending_skills(
    State(state): State<AppState>,
    Query(query): Query<TrendingQuery>,
) -> Result<Json<Vec<SkillRecord>>, AppError> {
    let limit = resolve_trending_limit(query.limit)?;
    Ok(Json(store::trending_skills(&state.db, limit).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_job(title: &str) -> NewJobPosting {
        NewJobPosting {
            title: title.to_string(),
            company: None,
            location: None,
            salary_min: None,
            salary_max: None,
            description: None,
            required_skills: vec![],
            preferred_skills: vec![],
            experience_level: None,
            remote_type: None,
        }
    }

    #[test]
    fn test_new_job_requires_title() {
        assert!(validate_new_job(&new_job("Data Engineer")).is_ok());
        assert!(matches!(
            validate_new_job(&new_job("  ")),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_new_job_salary_range_must_be_ordered() {
        let mut job = new_job("Data Engineer");
        job.salary_min = Some(120_000.0);
        job.salary_max = Some(90_000.0);
        assert!(matches!(validate_new_job(&job), Err(AppError::Validation(_))));

        job.salary_max = None;
        assert!(validate_new_job(&job).is_ok());
    }

    #[test]
    fn test_new_job_body_defaults_skill_lists() {
        let job: NewJobPosting = serde_json::from_str(r#"{"title": "Analyst"}"#).unwrap();
        assert!(job.required_skills.is_empty());
        assert!(job.preferred_skills.is_empty());
    }

    #[test]
    fn test_new_skill_requires_name() {
        let skill = NewSkill {
            name: "\t".to_string(),
            category: None,
            description: None,
        };
        assert!(matches!(validate_new_skill(&skill), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_resolve_trending_limit() {
        assert_eq!(resolve_trending_limit(None).unwrap(), DEFAULT_TRENDING_LIMIT);
        assert_eq!(resolve_trending_limit(Some(50)).unwrap(), 50);
        assert!(resolve_trending_limit(Some(0)).is_err());
        assert!(resolve_trending_limit(Some(51)).is_err());
    }
}
