//! Prompt templates for resume analysis and rewriting.
//!
//! Templates use `{placeholder}` slots filled by the builder functions.
//! Both prompts pin the exact JSON shape the model must return; the rewrite
//! contract mirrors the `StructuredResume` deserializer, so a conforming
//! response parses without post-processing.

use super::RewriteMode;

pub const ANALYSIS_SYSTEM: &str = "You are an expert technical recruiter and resume reviewer. \
You respond with a single JSON object and nothing else.";

pub const REWRITE_SYSTEM: &str = "You are an expert resume writer. You respond with a single \
JSON object and nothing else. You never invent employers, dates, or credentials that are not \
in the source resume.";

const ANALYSIS_TEMPLATE: &str = r#"Compare the resume below against the job description and score the match.

RESUME:
{resume}

JOB DESCRIPTION:
{jd}

Return a JSON object with exactly these keys:
{
  "summary": "<2-3 sentence assessment>",
  "strengths": ["<strength>", ...],
  "missing_keywords": ["<keyword from the JD absent in the resume>", ...],
  "suggested_changes": ["<concrete, actionable edit>", ...],
  "scoring_breakdown": {
    "key_skills": {"score": <0-100>, "justification": "<one sentence>"},
    "experience_level": {"score": <0-100>, "justification": "<one sentence>"},
    "project_and_impact": {"score": <0-100>, "justification": "<one sentence>"},
    "education_and_certs": {"score": <0-100>, "justification": "<one sentence>"}
  }
}

Scores are integers. Do not include any key not listed above."#;

const REWRITE_TEMPLATE: &str = r#"Rewrite the resume below. {objective}

Apply these changes where they are truthful to the source material:
{suggestions}

SOURCE RESUME:
{resume}

Return a JSON object with exactly this shape:
{
  "candidate_name": "{name}",
  "designation_line": "<one-line professional headline>",
  "contact_info": {"email": "...", "phone": "...", ...},
  "sections": [
    {"title": "Summary", "content": "<paragraph>"},
    {"title": "Experience", "content": [
      {"job_title": "...", "company_and_date": "...", "duties": ["...", ...]}
    ]},
    {"title": "Projects", "content": [
      {"project_name": "...", "description": "...", "tech_stack": "..."}
    ]},
    {"title": "Skills", "content": [
      {"category": "...", "skills": "<comma-separated list>"}
    ]}
  ]
}

Keep every employer, date, and credential from the source. Omit contact keys
that are absent from the source rather than inventing them. Sections other
than the four above may use a plain string or a list of strings as content."#;

pub fn analysis_prompt(resume_text: &str, jd_text: &str) -> String {
    ANALYSIS_TEMPLATE
        .replace("{resume}", resume_text)
        .replace("{jd}", jd_text)
}

pub fn rewrite_prompt(
    resume_text: &str,
    suggestions: &[String],
    mode: &RewriteMode,
    candidate_name: &str,
) -> String {
    let objective = match mode {
        RewriteMode::TailorToJd { jd_text } => format!(
            "Tailor it to the following job description, emphasizing relevant \
             experience and mirroring its terminology:\n\n{jd_text}"
        ),
        RewriteMode::JobTitle(title) => format!(
            "Tailor it for a '{title}' role, emphasizing the experience most \
             relevant to that title."
        ),
        RewriteMode::ReformatOnly => {
            "Keep the content as-is; only restructure it into the required shape.".to_string()
        }
    };

    let suggestions = if suggestions.is_empty() {
        "- (none)".to_string()
    } else {
        suggestions
            .iter()
            .map(|s| format!("- {s}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    REWRITE_TEMPLATE
        .replace("{objective}", &objective)
        .replace("{suggestions}", &suggestions)
        .replace("{resume}", resume_text)
        .replace("{name}", candidate_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_prompt_fills_slots() {
        let prompt = analysis_prompt("resume body here", "jd body here");
        assert!(prompt.contains("resume body here"));
        assert!(prompt.contains("jd body here"));
        assert!(!prompt.contains("{resume}"));
        assert!(!prompt.contains("{jd}"));
    }

    #[test]
    fn test_rewrite_prompt_embeds_mode_objective() {
        let tailored = rewrite_prompt(
            "resume",
            &[],
            &RewriteMode::JobTitle("Staff Engineer".to_string()),
            "Jane Doe",
        );
        assert!(tailored.contains("Staff Engineer"));
        assert!(tailored.contains("Jane Doe"));

        let reformat = rewrite_prompt("resume", &[], &RewriteMode::ReformatOnly, "Jane Doe");
        assert!(reformat.contains("only restructure"));
    }

    #[test]
    fn test_rewrite_prompt_lists_suggestions() {
        let prompt = rewrite_prompt(
            "resume",
            &["Add Kubernetes".to_string(), "Quantify impact".to_string()],
            &RewriteMode::ReformatOnly,
            "Jane Doe",
        );
        assert!(prompt.contains("- Add Kubernetes"));
        assert!(prompt.contains("- Quantify impact"));
    }
}
