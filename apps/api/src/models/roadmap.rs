use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted roadmap. `learning_path` holds the serialized `Vec<LearningStep>`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoadmapRow {
    pub id: Uuid,
    pub target_role: String,
    pub target_salary: Option<f64>,
    pub current_skills: Vec<String>,
    pub skill_gaps: Vec<String>,
    pub recommended_skills: Vec<String>,
    pub learning_path: Value,
    pub estimated_timeline: String,
    pub confidence_score: f64,
    pub provenance: String,
    pub created_at: DateTime<Utc>,
}
