use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A skill definition as stored in `skills`, minus its embedding column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SkillDefinition {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub demand_score: Option<f64>,
}

#[derive(Debug, FromRow)]
pub struct SkillDefinitionRow {
    #[sqlx(flatten)]
    pub skill: SkillDefinition,
    pub embedding: Vec<f32>,
}

/// Body of `POST /api/v1/skills`. The embedding is computed from `name`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSkill {
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SkillRecord {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub skill: SkillDefinition,
    pub created_at: DateTime<Utc>,
}
