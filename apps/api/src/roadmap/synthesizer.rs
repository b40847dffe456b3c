//! Roadmap Synthesizer: orchestrates ranking, gap analysis, generation and fallback.
//!
//! Per request: Retrieving → GapComputed → AwaitingGeneration → Parsing →
//! {Synthesized | Fallback}. Only retrieval can fail the request; every
//! generation or parse problem ends in the fallback plan.

use std::sync::Arc;

use tracing::{info, warn};

use crate::catalog::{CatalogEntry, Listing};
use crate::embedding::EmbeddingProvider;
use crate::llm_client::TextGenerator;
use crate::matching::confidence::compute_skill_gap;
use crate::matching::ranker::{rank_for_role, TierLimits};
use crate::matching::skill_set::{union_all, SkillSet};
use crate::models::job::JobPosting;
use crate::roadmap::parser::{fallback_plan, parse_generation, GenerationOutcome};
use crate::roadmap::prompts::build_roadmap_prompt;
use crate::roadmap::timeline;
use crate::roadmap::{Provenance, Roadmap, RoadmapError, RoadmapRequest};

/// Tunables fixed at construction time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthesisSettings {
    pub limits: TierLimits,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl Default for SynthesisSettings {
    fn default() -> Self {
        Self {
            limits: TierLimits::default(),
            temperature: 0.7,
            max_tokens: None,
        }
    }
}

#[derive(Clone)]
pub struct RoadmapSynthesizer {
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn TextGenerator>,
    settings: SynthesisSettings,
}

impl RoadmapSynthesizer {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn TextGenerator>,
        settings: SynthesisSettings,
    ) -> Self {
        Self {
            embedder,
            generator,
            settings,
        }
    }

    /// Builds a roadmap for `request` against an immutable snapshot of the job catalog.
    ///
    /// Fails only with `InvalidArgument`, `DimensionMismatch`, `NoMatchingEntries`
    /// or an embedding failure.
    pub async fn build_roadmap(
        &self,
        catalog: &[CatalogEntry<JobPosting>],
        request: &RoadmapRequest,
    ) -> Result<Roadmap, RoadmapError> {
        request.validate()?;
        let target_role = request.target_role.trim();

        // Retrieving
        info!("Generating roadmap for target role: {}", target_role);
        let query = self.embedder.embed(target_role).await?;
        let matched = rank_for_role(&query, catalog, target_role, &self.settings.limits)?
            .ok_or_else(|| {
                RoadmapError::NoMatchingEntries(format!(
                    "No job postings match target role '{target_role}'"
                ))
            })?;
        info!(
            "Matched {} postings for '{}' via {:?}",
            matched.ranked.len(),
            target_role,
            matched.tier
        );

        // GapComputed
        let postings: Vec<&JobPosting> = matched.ranked.iter().map(|r| &r.entry.entity).collect();
        let required = union_all(postings.iter().map(|p| p.required_skills()));
        let preferred = union_all(postings.iter().map(|p| p.preferred_skills()));
        let known = SkillSet::normalize(&request.current_skills);
        let skill_gap = compute_skill_gap(&known, &required, &preferred);
        let skill_gaps = skill_gap.gap.to_vec();
        let recommended_skills = skill_gap.recommended.to_vec();
        info!(
            "Identified {} skill gaps, {} recommended skills, confidence {:.2}",
            skill_gaps.len(),
            recommended_skills.len(),
            skill_gap.confidence
        );

        // AwaitingGeneration → Parsing
        let outcome = self
            .generate_steps(request, &skill_gaps, &recommended_skills)
            .await;

        let (learning_path, provenance) = match outcome {
            GenerationOutcome::Parsed(steps) => (steps, Provenance::Synthesized),
            GenerationOutcome::Malformed { raw, reason } => {
                warn!(
                    "Falling back to minimal roadmap for '{}': {} (raw response: {:?})",
                    target_role,
                    reason,
                    raw.chars().take(200).collect::<String>()
                );
                (fallback_plan(&skill_gaps), Provenance::Fallback)
            }
        };

        let estimated_timeline = timeline::aggregate(&learning_path);
        info!(
            "Roadmap for '{}' has {} steps ({}), provenance={}",
            target_role,
            learning_path.len(),
            estimated_timeline,
            provenance.as_str()
        );

        Ok(Roadmap {
            current_skills: request.current_skills.clone(),
            target_role: target_role.to_string(),
            target_salary: request.target_salary,
            skill_gaps,
            recommended_skills,
            learning_path,
            estimated_timeline,
            confidence_score: skill_gap.confidence,
            provenance,
            match_tier: matched.tier,
        })
    }

    /// One generator call, no retries here. A generator error is reported as a
    /// malformed outcome so the caller has a single fallback branch.
    async fn generate_steps(
        &self,
        request: &RoadmapRequest,
        skill_gaps: &[String],
        recommended_skills: &[String],
    ) -> GenerationOutcome {
        let prompt = build_roadmap_prompt(request, skill_gaps, recommended_skills);

        match self
            .generator
            .generate(&prompt, self.settings.temperature, self.settings.max_tokens)
            .await
        {
            Ok(raw) => parse_generation(&raw),
            Err(e) => GenerationOutcome::Malformed {
                raw: String::new(),
                reason: format!("generator error: {e}"),
            },
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
