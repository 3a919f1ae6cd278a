//! Resume analysis and rewriting.
//!
//! Two model-backed operations: [`analyze_resume`] scores a resume against a
//! job description with a weighted category breakdown, and [`rewrite_resume`]
//! produces a [`StructuredResume`] ready for rendering. Parsing of model
//! output is kept in pure functions so it can be tested without a live model.

pub mod prompts;

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::EngineError;
use crate::llm_client::{strip_json_fences, GenerateText};
use crate::models::resume::StructuredResume;

const ANALYSIS_TEMPERATURE: f32 = 0.2;
const REWRITE_TEMPERATURE: f32 = 0.4;

/// Score reported when the model's breakdown is unusable.
const FALLBACK_MATCH_SCORE: u8 = 42;

/// Category weights, in order: key skills, experience level, project and
/// impact, education and certs. Sum to 1.0.
const WEIGHTS: [f32; 4] = [0.40, 0.30, 0.20, 0.10];

const SCORE_MIN: u8 = 5;
const SCORE_MAX: u8 = 98;

// ────────────────────────────────────────────────────────────────────────────
// Report types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub summary: String,
    pub strengths: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub suggested_changes: Vec<String>,
    /// Absent when the model returned an unusable breakdown; `match_score`
    /// then falls back to [`FALLBACK_MATCH_SCORE`].
    pub scoring_breakdown: Option<ScoringBreakdown>,
    pub match_score: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringBreakdown {
    pub key_skills: CategoryScore,
    pub experience_level: CategoryScore,
    pub project_and_impact: CategoryScore,
    pub education_and_certs: CategoryScore,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryScore {
    #[serde(deserialize_with = "de_flexible_score")]
    pub score: u8,
    #[serde(default)]
    pub justification: String,
}

/// Accepts `85`, `85.0`, `"85"`, or `"85%"` — models emit all four.
fn de_flexible_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let parsed = match &value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .map(|f| f.round().clamp(0.0, 100.0) as u8)
        .ok_or_else(|| serde::de::Error::custom(format!("unparseable score: {value}")))
}

/// Weighted aggregate of the four category scores, clamped to 5..=98 so a
/// displayed score never reads as a hopeless 0 or a guaranteed 100.
pub fn compute_match_score(breakdown: &ScoringBreakdown) -> u8 {
    let scores = [
        breakdown.key_skills.score,
        breakdown.experience_level.score,
        breakdown.project_and_impact.score,
        breakdown.education_and_certs.score,
    ];
    let weighted: f32 = scores
        .iter()
        .zip(WEIGHTS)
        .map(|(s, w)| *s as f32 * w)
        .sum();
    (weighted.round() as u8).clamp(SCORE_MIN, SCORE_MAX)
}

// ────────────────────────────────────────────────────────────────────────────
// Rewrite modes
// ────────────────────────────────────────────────────────────────────────────

/// What the rewrite should optimize for.
#[derive(Debug, Clone)]
pub enum RewriteMode {
    /// A full job description is available.
    TailorToJd { jd_text: String },
    /// Only a target job title is known.
    JobTitle(String),
    /// Restructure without retargeting the content.
    ReformatOnly,
}

// ────────────────────────────────────────────────────────────────────────────
// Operations
// ────────────────────────────────────────────────────────────────────────────

/// Scores `resume_text` against `jd_text`.
pub async fn analyze_resume(
    llm: &dyn GenerateText,
    resume_text: &str,
    jd_text: &str,
) -> Result<AnalysisReport, EngineError> {
    let prompt = prompts::analysis_prompt(resume_text, jd_text);
    let raw = llm
        .generate(prompts::ANALYSIS_SYSTEM, &prompt, ANALYSIS_TEMPERATURE)
        .await?;
    parse_analysis(&raw)
}

/// Rewrites `resume_text` into a renderable [`StructuredResume`].
pub async fn rewrite_resume(
    llm: &dyn GenerateText,
    resume_text: &str,
    suggestions: &[String],
    mode: &RewriteMode,
    candidate_name: &str,
) -> Result<StructuredResume, EngineError> {
    let prompt = prompts::rewrite_prompt(resume_text, suggestions, mode, candidate_name);
    let raw = llm
        .generate(prompts::REWRITE_SYSTEM, &prompt, REWRITE_TEMPERATURE)
        .await?;
    parse_rewrite(&raw)
}

/// Parses the model's analysis JSON. The top level must parse; a malformed
/// `scoring_breakdown` degrades to the fallback match score instead of
/// failing the whole analysis.
pub fn parse_analysis(raw: &str) -> Result<AnalysisReport, EngineError> {
    #[derive(Deserialize)]
    struct RawAnalysis {
        #[serde(default)]
        summary: String,
        #[serde(default)]
        strengths: Vec<String>,
        #[serde(default)]
        missing_keywords: Vec<String>,
        #[serde(default)]
        suggested_changes: Vec<String>,
        #[serde(default)]
        scoring_breakdown: serde_json::Value,
    }

    let parsed: RawAnalysis = serde_json::from_str(strip_json_fences(raw))
        .map_err(|e| EngineError::Llm(format!("Unparseable analysis response: {e}")))?;

    let breakdown = match serde_json::from_value::<ScoringBreakdown>(parsed.scoring_breakdown) {
        Ok(b) => Some(b),
        Err(e) => {
            tracing::warn!(error = %e, "Malformed scoring breakdown, using fallback score");
            None
        }
    };
    let match_score = breakdown
        .as_ref()
        .map(compute_match_score)
        .unwrap_or(FALLBACK_MATCH_SCORE);

    Ok(AnalysisReport {
        summary: parsed.summary,
        strengths: parsed.strengths,
        missing_keywords: parsed.missing_keywords,
        suggested_changes: parsed.suggested_changes,
        scoring_breakdown: breakdown,
        match_score,
    })
}

/// Parses the model's rewrite JSON into a [`StructuredResume`].
pub fn parse_rewrite(raw: &str) -> Result<StructuredResume, EngineError> {
    let value: serde_json::Value = serde_json::from_str(strip_json_fences(raw))
        .map_err(|e| EngineError::Llm(format!("Unparseable rewrite response: {e}")))?;
    StructuredResume::from_value(value)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;

    fn breakdown(ks: u8, exp: u8, proj: u8, edu: u8) -> ScoringBreakdown {
        let cat = |score| CategoryScore {
            score,
            justification: String::new(),
        };
        ScoringBreakdown {
            key_skills: cat(ks),
            experience_level: cat(exp),
            project_and_impact: cat(proj),
            education_and_certs: cat(edu),
        }
    }

    #[test]
    fn test_weighted_score_math() {
        // 80*.4 + 70*.3 + 60*.2 + 50*.1 = 32 + 21 + 12 + 5 = 70
        assert_eq!(compute_match_score(&breakdown(80, 70, 60, 50)), 70);
    }

    #[test]
    fn test_score_clamped_to_bounds() {
        assert_eq!(compute_match_score(&breakdown(100, 100, 100, 100)), 98);
        assert_eq!(compute_match_score(&breakdown(0, 0, 0, 0)), 5);
    }

    #[test]
    fn test_string_scores_parse() {
        let raw = r#"{"score": "85", "justification": "solid"}"#;
        let cat: CategoryScore = serde_json::from_str(raw).unwrap();
        assert_eq!(cat.score, 85);

        let raw = r#"{"score": "85%"}"#;
        let cat: CategoryScore = serde_json::from_str(raw).unwrap();
        assert_eq!(cat.score, 85);
    }

    #[test]
    fn test_unparseable_score_is_an_error() {
        let raw = r#"{"score": "very good"}"#;
        assert!(serde_json::from_str::<CategoryScore>(raw).is_err());
    }

    #[test]
    fn test_malformed_breakdown_falls_back() {
        let raw = r#"{
            "summary": "ok",
            "scoring_breakdown": {"key_skills": "not an object"}
        }"#;
        let report = parse_analysis(raw).unwrap();
        assert!(report.scoring_breakdown.is_none());
        assert_eq!(report.match_score, FALLBACK_MATCH_SCORE);
    }

    #[test]
    fn test_fenced_analysis_parses() {
        let raw = "```json\n{\"summary\": \"good fit\", \"scoring_breakdown\": {\
                   \"key_skills\": {\"score\": 90, \"justification\": \"\"},\
                   \"experience_level\": {\"score\": 80, \"justification\": \"\"},\
                   \"project_and_impact\": {\"score\": 70, \"justification\": \"\"},\
                   \"education_and_certs\": {\"score\": 60, \"justification\": \"\"}}}\n```";
        let report = parse_analysis(raw).unwrap();
        assert_eq!(report.summary, "good fit");
        // 90*.4 + 80*.3 + 70*.2 + 60*.1 = 80
        assert_eq!(report.match_score, 80);
    }

    struct CannedModel(&'static str);

    #[async_trait]
    impl GenerateText for CannedModel {
        async fn generate(&self, _: &str, _: &str, _: f32) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn test_rewrite_round_trips_through_model_seam() {
        let canned = CannedModel(
            r#"{
                "candidate_name": "Jane Doe",
                "designation_line": "Engineer",
                "contact_info": {"phone": "555-0100", "email": "j@d.io"},
                "sections": [{"title": "Summary", "content": "Builds things."}]
            }"#,
        );
        let resume = rewrite_resume(&canned, "source", &[], &RewriteMode::ReformatOnly, "Jane Doe")
            .await
            .unwrap();
        assert_eq!(resume.candidate_name, "Jane Doe");
        assert_eq!(resume.sections.len(), 1);
        // contact order in the model's response is display order
        let keys: Vec<&str> = resume.contact_info.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["phone", "email"]);
    }
}
