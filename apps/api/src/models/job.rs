use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A job posting as stored in `job_postings`, minus its embedding column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct JobPosting {
    pub id: i64,
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub description: Option<String>,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    /// Junior, Mid, Senior, Lead
    pub experience_level: Option<String>,
    /// Remote, Hybrid, Onsite
    pub remote_type: Option<String>,
}

/// Row shape when the embedding is selected alongside the posting.
#[derive(Debug, FromRow)]
pub struct JobPostingRow {
    #[sqlx(flatten)]
    pub posting: JobPosting,
    pub skills_embedding: Vec<f32>,
}

/// Body of `POST /api/v1/jobs`. The embedding is computed server-side.
#[derive(Debug, Clone, Deserialize)]
pub struct NewJobPosting {
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub description: Option<String>,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub preferred_skills: Vec<String>,
    pub experience_level: Option<String>,
    pub remote_type: Option<String>,
}

/// A posting as listed by the catalog endpoints, with its creation time.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct JobPostingRecord {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub posting: JobPosting,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
pub fn test_posting(id: i64, title: &str) -> JobPosting {
    JobPosting {
        id,
        title: title.to_string(),
        company: Some("Acme".to_string()),
        location: Some("Berlin".to_string()),
        salary_min: Some(90_000.0),
        salary_max: Some(120_000.0),
        description: None,
        required_skills: vec!["Python".to_string(), "SQL".to_string()],
        preferred_skills: vec!["Docker".to_string()],
        experience_level: Some("Mid".to_string()),
        remote_type: Some("Remote".to_string()),
    }
}
