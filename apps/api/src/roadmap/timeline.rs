use crate::roadmap::LearningStep;

/// Sums below this many weeks render as weeks; at or above, as `sum / 4` months.
const WEEKS_DISPLAY_LIMIT: u64 = 52;

/// Leading integer token of a duration ("2" in "2 weeks"). Anything else is 0,
/// including ranges like "2-3 weeks" and words like "one month".
pub fn leading_integer(duration: &str) -> u64 {
    duration
        .split_whitespace()
        .next()
        .filter(|token| token.chars().all(|c| c.is_ascii_digit()))
        .and_then(|token| token.parse::<u64>().ok())
        .unwrap_or(0)
}

/// Folds step durations into one timeline string. Units are read uniformly as weeks;
/// the month rendering is integer division by 4, not a calendar conversion.
pub fn aggregate(steps: &[LearningStep]) -> String {
    let total = steps
        .iter()
        .map(|s| leading_integer(&s.estimated_duration))
        .fold(0u64, u64::saturating_add);

    if total < WEEKS_DISPLAY_LIMIT {
        format!("{total} weeks")
    } else {
        format!("{} months", total / 4)
    }
}
