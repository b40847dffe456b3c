//! Similarity Ranker: orders catalog entries by cosine distance to a query vector.
//!
//! Filters run before ranking and `limit` truncates after the sort. The sort is
//! stable, so equal distances keep catalog insertion order.

use serde::Serialize;
use tracing::debug;

use crate::catalog::{CatalogEntry, CatalogFilter, Listing};
use crate::matching::skill_set::{gap, SkillSet};
use crate::matching::MatchError;

/// Cosine distance, `1 − cos θ`, in [0, 2]. A zero vector is treated as orthogonal (1.0).
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }

    let cosine = (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0);
    1.0 - cosine
}

/// One ranked entry, borrowed from the caller's catalog snapshot.
#[derive(Debug)]
pub struct Ranked<'a, T> {
    pub entry: &'a CatalogEntry<T>,
    pub distance: f64,
}

/// Ranks `catalog` against `query` under `filter`, nearest first, at most `limit` entries.
///
/// - `limit == 0` → `InvalidArgument`
/// - empty catalog or empty query → empty result
/// - any entry whose vector length differs from the query → `DimensionMismatch`
pub fn rank<'a, T: Listing>(
    query: &[f32],
    catalog: &'a [CatalogEntry<T>],
    filter: &CatalogFilter,
    limit: usize,
) -> Result<Vec<Ranked<'a, T>>, MatchError> {
    if limit == 0 {
        return Err(MatchError::InvalidArgument(
            "limit must be greater than zero".to_string(),
        ));
    }
    if catalog.is_empty() || query.is_empty() {
        return Ok(Vec::new());
    }
    if let Some(bad) = catalog.iter().find(|e| e.vector.len() != query.len()) {
        return Err(MatchError::DimensionMismatch {
            expected: bad.vector.len(),
            actual: query.len(),
        });
    }

    let mut ranked: Vec<Ranked<'a, T>> = catalog
        .iter()
        .filter(|e| filter.matches(&e.entity))
        .map(|entry| Ranked {
            entry,
            distance: cosine_distance(query, &entry.vector),
        })
        .collect();

    // sort_by is stable: ties keep insertion order.
    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    ranked.truncate(limit);
    Ok(ranked)
}

// ────────────────────────────────────────────────────────────────────────────
// Role matching: title-filtered tier, then unfiltered tier
// ────────────────────────────────────────────────────────────────────────────

/// The ranking attempts made when matching a target role, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleMatchTier {
    /// Only entries whose title contains the role (case-insensitive).
    TitleFiltered,
    /// The whole catalog, no title filter.
    Unfiltered,
}

impl RoleMatchTier {
    pub const ATTEMPTS: [RoleMatchTier; 2] = [RoleMatchTier::TitleFiltered, RoleMatchTier::Unfiltered];

    fn filter(self, role: &str) -> CatalogFilter {
        match self {
            RoleMatchTier::TitleFiltered => CatalogFilter::for_title(role),
            RoleMatchTier::Unfiltered => CatalogFilter::default(),
        }
    }
}

/// How many entries each role-matching tier may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierLimits {
    pub title_filtered: usize,
    pub unfiltered: usize,
}

impl Default for TierLimits {
    fn default() -> Self {
        Self {
            title_filtered: 10,
            unfiltered: 5,
        }
    }
}

impl TierLimits {
    fn for_tier(&self, tier: RoleMatchTier) -> usize {
        match tier {
            RoleMatchTier::TitleFiltered => self.title_filtered,
            RoleMatchTier::Unfiltered => self.unfiltered,
        }
    }
}

#[derive(Debug)]
pub struct RoleMatch<'a, T> {
    pub tier: RoleMatchTier,
    pub ranked: Vec<Ranked<'a, T>>,
}

/// Tries each tier in `RoleMatchTier::ATTEMPTS` and returns the first non-empty one.
/// The tiers are never merged. `None` means both came back empty.
pub fn rank_for_role<'a, T: Listing>(
    query: &[f32],
    catalog: &'a [CatalogEntry<T>],
    role: &str,
    limits: &TierLimits,
) -> Result<Option<RoleMatch<'a, T>>, MatchError> {
    for tier in RoleMatchTier::ATTEMPTS {
        let ranked = rank(query, catalog, &tier.filter(role), limits.for_tier(tier))?;
        if !ranked.is_empty() {
            debug!(
                "Role '{}' matched {} entries via {:?}, nearest id {} at distance {:.3}",
                role,
                ranked.len(),
                tier,
                ranked[0].entry.entity.id(),
                ranked[0].distance
            );
            return Ok(Some(RoleMatch { tier, ranked }));
        }
        debug!("Role '{}' tier {:?} returned no entries", role, tier);
    }
    Ok(None)
}

// ────────────────────────────────────────────────────────────────────────────
// Match results
// ────────────────────────────────────────────────────────────────────────────

/// A ranked entity with its similarity and the required skills the query side lacks.
#[derive(Debug, Clone)]
pub struct MatchResult<T> {
    pub entity: T,
    /// `1 − cosine distance`
    pub similarity: f64,
    pub missing_skills: SkillSet,
}

/// Ranks `catalog` and annotates each hit with its missing-skill set relative to `known`.
pub fn rank_catalog<T: Listing + Clone>(
    query: &[f32],
    catalog: &[CatalogEntry<T>],
    filter: &CatalogFilter,
    limit: usize,
    known: &SkillSet,
) -> Result<Vec<MatchResult<T>>, MatchError> {
    Ok(rank(query, catalog, filter, limit)?
        .into_iter()
        .map(|r| {
            let required = SkillSet::normalize(r.entry.entity.required_skills());
            MatchResult {
                entity: r.entry.entity.clone(),
                similarity: 1.0 - r.distance,
                missing_skills: gap(&required, known),
            }
        })
        .collect())
}
