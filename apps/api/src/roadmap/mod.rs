//! Roadmap synthesis: turns a skill gap into an ordered, validated learning plan.
//!
//! Flow: embed target role → two-tier role match → skill gap + confidence →
//!       generation request → parse (or fall back) → timeline.
//! All text generation goes through the `TextGenerator` trait in llm_client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::matching::ranker::RoleMatchTier;
use crate::matching::skill_set::SkillSet;
use crate::matching::MatchError;

pub mod handlers;
pub mod parser;
pub mod prompts;
pub mod store;
pub mod synthesizer;
pub mod timeline;

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// Failures that may abort `build_roadmap`. Generation and parsing problems are
/// not here: they degrade to the fallback plan instead.
#[derive(Debug, Error)]
pub enum RoadmapError {
    #[error("Query vector has {actual} dimensions but the catalog uses {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No matching entries: {0}")]
    NoMatchingEntries(String),

    #[error("Embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),
}

impl From<MatchError> for RoadmapError {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::DimensionMismatch { expected, actual } => {
                RoadmapError::DimensionMismatch { expected, actual }
            }
            MatchError::InvalidArgument(msg) => RoadmapError::InvalidArgument(msg),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Input to roadmap generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadmapRequest {
    pub current_skills: Vec<String>,
    pub target_role: String,
    /// Target compensation, USD per year.
    pub target_salary: Option<f64>,
    pub experience_years: Option<f64>,
}

impl RoadmapRequest {
    /// Known skills must contain at least one non-blank name; the role must be non-blank.
    pub fn validate(&self) -> Result<(), RoadmapError> {
        if SkillSet::normalize(&self.current_skills).is_empty() {
            return Err(RoadmapError::InvalidArgument(
                "current_skills must contain at least one skill".to_string(),
            ));
        }
        if self.target_role.trim().is_empty() {
            return Err(RoadmapError::InvalidArgument(
                "target_role cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// One step of a learning plan. Field names are the schema the generator is asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningStep {
    /// 1-based, contiguous within a roadmap.
    pub step: u32,
    pub title: String,
    pub description: String,
    /// Free text with a leading integer token, e.g. "2 weeks".
    pub estimated_duration: String,
    pub resources: Vec<String>,
    pub skills_gained: Vec<String>,
}

/// Where the learning path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Parsed from the generator's response.
    Synthesized,
    /// Deterministic plan built after a generator or parse failure.
    Fallback,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Synthesized => "synthesized",
            Provenance::Fallback => "fallback",
        }
    }
}

/// The complete output of one generation request.
#[derive(Debug, Clone, Serialize)]
pub struct Roadmap {
    pub current_skills: Vec<String>,
    pub target_role: String,
    pub target_salary: Option<f64>,
    pub skill_gaps: Vec<String>,
    pub recommended_skills: Vec<String>,
    pub learning_path: Vec<LearningStep>,
    pub estimated_timeline: String,
    /// In [0, 1].
    pub confidence_score: f64,
    pub provenance: Provenance,
    pub match_tier: RoleMatchTier,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(skills: &[&str], role: &str) -> RoadmapRequest {
        RoadmapRequest {
            current_skills: skills.iter().map(|s| s.to_string()).collect(),
            target_role: role.to_string(),
            target_salary: None,
            experience_years: None,
        }
    }

    #[test]
    fn test_validate_accepts_minimal_request() {
        assert!(request(&["Python"], "Data Engineer").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_skills() {
        let err = request(&["", "  "], "Data Engineer").validate().unwrap_err();
        assert!(matches!(err, RoadmapError::InvalidArgument(_)));
        assert!(request(&[], "Data Engineer").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_role() {
        let err = request(&["Python"], "   ").validate().unwrap_err();
        assert!(matches!(err, RoadmapError::InvalidArgument(_)));
    }

    #[test]
    fn test_learning_step_requires_all_fields() {
        let json = r#"{"step": 1, "title": "T", "description": "D", "estimated_duration": "2 weeks", "resources": []}"#;
        assert!(serde_json::from_str::<LearningStep>(json).is_err());
    }

    #[test]
    fn test_provenance_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Provenance::Fallback).unwrap(),
            "\"fallback\""
        );
        assert_eq!(Provenance::Synthesized.as_str(), "synthesized");
    }

    #[test]
    fn test_match_error_converts() {
        let err: RoadmapError = MatchError::DimensionMismatch {
            expected: 384,
            actual: 3,
        }
        .into();
        assert!(matches!(
            err,
            RoadmapError::DimensionMismatch {
                expected: 384,
                actual: 3
            }
        ));
    }
}
