//! Match scoring: pluggable, trait-based estimate of resume-to-job fit.
//!
//! Default: `KeywordMatchScorer` (pure Rust, deterministic, no network).
//! Opt-in: `LlmMatchScorer` (see `tailoring::llm`), via `ENABLE_LLM_MATCH_SCORING`.

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::{MatchScore, ResumeContent, Skill};
use crate::tailoring::capabilities::{JobAnalysis, MatchScorer};

const REQUIRED_WEIGHT: f64 = 2.0;
const OTHER_WEIGHT: f64 = 1.0;

/// Weighted coverage of the job's terms by the tailored content and the user's skills.
///
/// Required skills count double; preferred skills and keywords count once.
/// A term counts as covered when it appears (case-insensitively) in the
/// summary, a tailored bullet, or a skill name.
pub struct KeywordMatchScorer;

#[async_trait]
impl MatchScorer for KeywordMatchScorer {
    async fn score(
        &self,
        analysis: &JobAnalysis,
        content: &ResumeContent,
        user_skills: &[Skill],
    ) -> Result<MatchScore, AppError> {
        MatchScore::new(compute_keyword_score(analysis, content, user_skills) as i64)
    }
}

fn compute_keyword_score(analysis: &JobAnalysis, content: &ResumeContent, skills: &[Skill]) -> u32 {
    let corpus = build_corpus(content, skills);
    let required: Vec<String> = analysis
        .required_skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .collect();

    let mut total = 0.0_f64;
    let mut covered = 0.0_f64;
    for term in analysis.all_terms() {
        let term = term.to_lowercase();
        let weight = if required.contains(&term) {
            REQUIRED_WEIGHT
        } else {
            OTHER_WEIGHT
        };
        total += weight;
        if corpus.contains(&term) {
            covered += weight;
        }
    }

    if total == 0.0 {
        return 0;
    }
    ((covered / total) * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Lowercased text the scorer searches, one field per line.
fn build_corpus(content: &ResumeContent, skills: &[Skill]) -> String {
    let mut corpus = content.summary.to_lowercase();
    for bullet in content.experiences.iter().flat_map(|e| &e.bullets) {
        corpus.push('\n');
        corpus.push_str(&bullet.tailored_content.to_lowercase());
    }
    for name in skills.iter().map(|s| &s.name).chain(&content.skills) {
        corpus.push('\n');
        corpus.push_str(&name.to_lowercase());
    }
    corpus
}
