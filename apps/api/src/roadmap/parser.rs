//! Parsing of raw generator output into learning steps, and the fallback plan
//! used when that output cannot be trusted.

use serde::Deserialize;

use crate::roadmap::LearningStep;

/// Tagged result of reading a generator response. The fallback path is a branch
/// on `Malformed`, not an error handler.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// Steps renumbered 1..N by array position.
    Parsed(Vec<LearningStep>),
    Malformed { raw: String, reason: String },
}

/// Step shape as the generator returns it. Every field is mandatory, but the
/// `step` value itself is discarded: steps are renumbered by position.
#[derive(Debug, Deserialize)]
struct GeneratedStep {
    #[serde(rename = "step")]
    _step: serde_json::Value,
    title: String,
    description: String,
    estimated_duration: String,
    resources: Vec<String>,
    skills_gained: Vec<String>,
}

/// First balanced `[...]` span in `text`. Brackets inside JSON strings don't count.
pub fn extract_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + c.len_utf8();
                    return Some(&text[start..end]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Reads the first bracketed array out of `raw` (or all of `raw` when there is none)
/// as a list of steps. Missing fields or an empty list make the response malformed.
pub fn parse_generation(raw: &str) -> GenerationOutcome {
    let candidate = extract_array(raw).unwrap_or(raw);

    let malformed = |reason: String| GenerationOutcome::Malformed {
        raw: raw.to_string(),
        reason,
    };

    let generated: Vec<GeneratedStep> = match serde_json::from_str(candidate) {
        Ok(steps) => steps,
        Err(e) => return malformed(format!("invalid step array: {e}")),
    };

    if generated.is_empty() {
        return malformed("step array is empty".to_string());
    }

    GenerationOutcome::Parsed(
        generated
            .into_iter()
            .zip(1u32..)
            .map(|(g, step)| LearningStep {
                step,
                title: g.title,
                description: g.description,
                estimated_duration: g.estimated_duration,
                resources: g.resources,
                skills_gained: g.skills_gained,
            })
            .collect(),
    )
}

/// Gap skills the fallback step is built around.
const FALLBACK_SKILL_COUNT: usize = 3;

/// The deterministic one-step plan used when generation yields nothing usable.
pub fn fallback_plan(skill_gaps: &[String]) -> Vec<LearningStep> {
    let core: Vec<String> = skill_gaps
        .iter()
        .take(FALLBACK_SKILL_COUNT)
        .cloned()
        .collect();

    vec![LearningStep {
        step: 1,
        title: "Foundation Building".to_string(),
        description: format!("Start by learning the core skills: {}", core.join(", ")),
        estimated_duration: "1-2 months".to_string(),
        resources: vec![
            "Online courses".to_string(),
            "Documentation".to_string(),
            "Practice projects".to_string(),
        ],
        skills_gained: core,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_STEPS: &str = r#"[
        {"step": 1, "title": "Learn Go", "description": "Syntax and tooling",
         "estimated_duration": "3 weeks", "resources": ["Tour of Go"], "skills_gained": ["Go"]},
        {"step": 2, "title": "Containers", "description": "Docker then Kubernetes",
         "estimated_duration": "4 weeks", "resources": [], "skills_gained": ["Kubernetes"]}
    ]"#;

    fn parsed(raw: &str) -> Vec<LearningStep> {
        match parse_generation(raw) {
            GenerationOutcome::Parsed(steps) => steps,
            GenerationOutcome::Malformed { reason, .. } => panic!("expected parse, got: {reason}"),
        }
    }

    fn assert_malformed(raw: &str) {
        assert!(
            matches!(parse_generation(raw), GenerationOutcome::Malformed { .. }),
            "expected malformed for {raw:?}"
        );
    }

    #[test]
    fn test_extract_array_skips_prose() {
        let text = "Here is your plan:\n[1, [2, 3]] and that's it ]";
        assert_eq!(extract_array(text), Some("[1, [2, 3]]"));
    }

    #[test]
    fn test_extract_array_ignores_brackets_in_strings() {
        let text = r#"[{"title": "Arrays ] and [ slices", "x": "\"]"}] trailing"#;
        assert_eq!(
            extract_array(text),
            Some(r#"[{"title": "Arrays ] and [ slices", "x": "\"]"}]"#)
        );
    }

    #[test]
    fn test_extract_array_none_when_unbalanced_or_absent() {
        assert_eq!(extract_array("no brackets here"), None);
        assert_eq!(extract_array("[ never closed"), None);
    }

    #[test]
    fn test_parse_plain_array() {
        let steps = parsed(TWO_STEPS);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].title, "Learn Go");
        assert_eq!(steps[1].skills_gained, vec!["Kubernetes"]);
    }

    #[test]
    fn test_parse_array_wrapped_in_fences_and_prose() {
        let raw = format!("Sure! Here's the roadmap.\n```json\n{TWO_STEPS}\n```\nGood luck!");
        assert_eq!(parsed(&raw).len(), 2);
    }

    #[test]
    fn test_steps_are_renumbered_by_position() {
        let raw = r#"[
            {"step": 7, "title": "B", "description": "", "estimated_duration": "1 week", "resources": [], "skills_gained": []},
            {"step": "first", "title": "A", "description": "", "estimated_duration": "1 week", "resources": [], "skills_gained": []},
            {"step": null, "title": "C", "description": "", "estimated_duration": "1 week", "resources": [], "skills_gained": []}
        ]"#;
        let steps = parsed(raw);
        let numbers: Vec<u32> = steps.iter().map(|s| s.step).collect();
        let titles: Vec<&str> = steps.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(titles, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_missing_field_is_malformed() {
        assert_malformed(
            r#"[{"title": "A", "description": "", "estimated_duration": "1 week", "resources": []}]"#,
        );
    }

    #[test]
    fn test_missing_step_field_is_malformed() {
        assert_malformed(
            r#"[{"title": "A", "description": "d", "estimated_duration": "2 weeks", "resources": [], "skills_gained": []}]"#,
        );
    }

    #[test]
    fn test_step_field_required_on_every_object() {
        let raw = r#"[
            {"step": 1, "title": "A", "description": "", "estimated_duration": "1 week", "resources": [], "skills_gained": []},
            {"title": "B", "description": "", "estimated_duration": "1 week", "resources": [], "skills_gained": []}
        ]"#;
        assert_malformed(raw);
    }

    #[test]
    fn test_empty_array_is_malformed() {
        assert_malformed("[]");
    }

    #[test]
    fn test_non_json_is_malformed() {
        assert_malformed("I'm sorry, I can't help with that.");
        assert_malformed("");
    }

    #[test]
    fn test_object_instead_of_array_is_malformed() {
        assert_malformed(r#"{"steps": "none"}"#);
    }

    #[test]
    fn test_malformed_keeps_raw_text() {
        match parse_generation("garbage") {
            GenerationOutcome::Malformed { raw, .. } => assert_eq!(raw, "garbage"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_fallback_plan_uses_first_three_gaps() {
        let gaps: Vec<String> = ["Kubernetes", "Terraform", "Go"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let plan = fallback_plan(&gaps);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].step, 1);
        assert_eq!(plan[0].title, "Foundation Building");
        assert_eq!(plan[0].estimated_duration, "1-2 months");
        assert_eq!(plan[0].skills_gained, vec!["Kubernetes", "Terraform", "Go"]);
        assert_eq!(
            plan[0].description,
            "Start by learning the core skills: Kubernetes, Terraform, Go"
        );
    }

    #[test]
    fn test_fallback_plan_truncates_and_tolerates_empty_gap() {
        let gaps: Vec<String> = (1..=5).map(|i| format!("Skill {i}")).collect();
        assert_eq!(fallback_plan(&gaps)[0].skills_gained.len(), 3);
        assert!(fallback_plan(&[])[0].skills_gained.is_empty());
    }
}
