// Prompt templates for roadmap generation.

use crate::roadmap::RoadmapRequest;

/// Gap skills named in the prompt.
pub const PROMPT_GAP_LIMIT: usize = 10;
/// Recommended skills named in the prompt.
pub const PROMPT_RECOMMENDED_LIMIT: usize = 5;

/// Roadmap prompt template.
/// Replace: {target_role}, {current_skills}, {profile_context}, {skill_gaps}, {recommended_skills}
pub const ROADMAP_PROMPT_TEMPLATE: &str = r#"You are an expert career coach specializing in tech career development. Generate a detailed, step-by-step learning roadmap for a professional transitioning to a {target_role} role.

CURRENT PROFILE:
- Current Skills: {current_skills}
{profile_context}
TARGET ROLE: {target_role}

REQUIRED SKILLS TO LEARN: {skill_gaps}
RECOMMENDED ADDITIONAL SKILLS: {recommended_skills}

Create a personalized learning path with 5-8 major steps. Each step should build on the previous one.

Return ONLY a JSON array with this EXACT structure (no text before or after it):
[
  {
    "step": 1,
    "title": "Foundation Building: Core Concepts",
    "description": "What to learn, why it matters and how it applies to the target role",
    "estimated_duration": "3 weeks",
    "resources": ["Course: Introduction to X", "Book: Learning X", "Practice: small project"],
    "skills_gained": ["Skill A", "Skill B"]
  }
]

HARD RULES:
1. Every step object MUST have all six fields above
2. `estimated_duration` MUST start with a whole number of weeks, e.g. "2 weeks" or "6 weeks" (never ranges like "2-3 weeks")
3. `resources` lists 3-5 specific courses, books, documentation or practice platforms
4. `skills_gained` lists 2-4 skills, preferring names from the skills to learn above"#;

/// Fills the roadmap template. Only the first `PROMPT_GAP_LIMIT` gap skills and
/// `PROMPT_RECOMMENDED_LIMIT` recommended skills are named.
pub fn build_roadmap_prompt(
    request: &RoadmapRequest,
    skill_gaps: &[String],
    recommended_skills: &[String],
) -> String {
    let mut profile_context = String::new();
    if let Some(years) = request.experience_years {
        profile_context.push_str(&format!("- Current Experience: {years} years\n"));
    }
    if let Some(salary) = request.target_salary {
        profile_context.push_str(&format!("- Target Salary: ${salary:.0} per year\n"));
    }

    let current_skills = request.current_skills.join(", ");
    let skill_gaps = join_first(skill_gaps, PROMPT_GAP_LIMIT);
    let recommended_skills = join_first(recommended_skills, PROMPT_RECOMMENDED_LIMIT);

    fill_template(
        ROADMAP_PROMPT_TEMPLATE,
        &[
            ("target_role", request.target_role.trim()),
            ("current_skills", current_skills.as_str()),
            ("profile_context", profile_context.as_str()),
            ("skill_gaps", skill_gaps.as_str()),
            ("recommended_skills", recommended_skills.as_str()),
        ],
    )
}

/// Substitutes `{name}` placeholders in one left-to-right pass. Substituted text is
/// never rescanned, so braces inside user input stay literal. Unknown `{...}`
/// spans (the JSON example in the template) are copied through.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let value = tail.find('}').and_then(|close| {
            let name = &tail[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &tail[close + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

fn join_first(items: &[String], limit: usize) -> String {
    if items.is_empty() {
        return "none".to_string();
    }
    items
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
