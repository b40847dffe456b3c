//! Roadmap persistence. Identity and creation timestamp are assigned here,
//! never by the synthesizer.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::roadmap::RoadmapRow;
use crate::roadmap::{LearningStep, Roadmap};

/// Inserts `roadmap` into `career_roadmaps` and returns the stored row.
pub async fn insert_roadmap(pool: &PgPool, roadmap: &Roadmap) -> Result<RoadmapRow, AppError> {
    let id = Uuid::new_v4();
    let learning_path = serde_json::to_value(&roadmap.learning_path).map_err(|e| {
        AppError::Internal(anyhow::anyhow!("Failed to serialize learning path: {e}"))
    })?;

    let row = sqlx::query_as::<_, RoadmapRow>(
        r#"
        INSERT INTO career_roadmaps
            (id, target_role, target_salary, current_skills, skill_gaps, recommended_skills,
             learning_path, estimated_timeline, confidence_score, provenance)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING id, target_role, target_salary, current_skills, skill_gaps, recommended_skills,
                  learning_path, estimated_timeline, confidence_score, provenance, created_at
        "#,
    )
    .bind(id)
    .bind(&roadmap.target_role)
    .bind(roadmap.target_salary)
    .bind(&roadmap.current_skills)
    .bind(&roadmap.skill_gaps)
    .bind(&roadmap.recommended_skills)
    .bind(&learning_path)
    .bind(&roadmap.estimated_timeline)
    .bind(roadmap.confidence_score)
    .bind(roadmap.provenance.as_str())
    .fetch_one(pool)
    .await?;

    info!("Roadmap {} stored for target role '{}'", id, roadmap.target_role);
    Ok(row)
}

pub async fn get_roadmap(pool: &PgPool, id: Uuid) -> Result<Option<RoadmapRow>, AppError> {
    let row = sqlx::query_as::<_, RoadmapRow>(
        r#"
        SELECT id, target_role, target_salary, current_skills, skill_gaps, recommended_skills,
               learning_path, estimated_timeline, confidence_score, provenance, created_at
        FROM career_roadmaps
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Decodes the stored `learning_path` JSON back into steps.
pub fn learning_path(row: &RoadmapRow) -> Result<Vec<LearningStep>, AppError> {
    serde_json::from_value(row.learning_path.clone()).map_err(|e| {
        AppError::Internal(anyhow::anyhow!(
            "Stored learning path for roadmap {} is corrupt: {e}",
            row.id
        ))
    })
}
