use serde::{Deserialize, Serialize};

use crate::matching::skill_set::{gap, recommended, SkillSet};

/// Fraction of `aggregated_required` already in `known`, in [0, 1].
///
/// An empty requirement set scores 0.0: with nothing to validate against
/// there is no evidence of fit.
pub fn score(known: &SkillSet, aggregated_required: &SkillSet) -> f64 {
    if aggregated_required.is_empty() {
        return 0.0;
    }
    let covered = aggregated_required.intersection(known).len();
    (covered as f64 / aggregated_required.len() as f64).clamp(0.0, 1.0)
}

/// Result of `compute_skill_gap`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGap {
    pub gap: SkillSet,
    pub recommended: SkillSet,
    pub confidence: f64,
}

/// Gap, recommendations and confidence for one person against aggregated requirements.
pub fn compute_skill_gap(
    current: &SkillSet,
    required: &SkillSet,
    preferred: &SkillSet,
) -> SkillGap {
    SkillGap {
        gap: gap(required, current),
        recommended: recommended(preferred, current),
        confidence: score(current, required),
    }
}
