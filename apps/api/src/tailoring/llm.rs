//! LLM-backed adapters for the tailoring capabilities.
//! All model traffic goes through `LlmClient`.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::i18n::Locale;
use crate::llm_client::prompts::{
    language_instruction, EMPHASIS_INSTRUCTION, FACTUALITY_INSTRUCTION, JSON_ONLY_SYSTEM,
    PLAIN_TEXT_SYSTEM,
};
use crate::llm_client::LlmClient;
use crate::models::{Bullet, MatchScore, ResumeContent, Skill, TailoredBullet, User};
use crate::tailoring::capabilities::{JobAnalysis, MatchScorer, ResumeAi};
use crate::tailoring::prompts::{
    ANALYZE_PROMPT_TEMPLATE, ANALYZE_SYSTEM, SCORE_PROMPT_TEMPLATE, SCORE_SYSTEM,
    SELECT_PROMPT_TEMPLATE, SELECT_SYSTEM, SUMMARY_PROMPT_TEMPLATE, SUMMARY_SYSTEM,
    TAILOR_PROMPT_TEMPLATE, TAILOR_SYSTEM,
};
use crate::tailoring::selection::{rank_bullets, sanitize_selection};
use crate::tailoring::style::TailoringStyle;

pub struct LlmResumeAi {
    llm: LlmClient,
}

impl LlmResumeAi {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

fn json_system(base: &str) -> String {
    format!("{base} {JSON_ONLY_SYSTEM}")
}

fn text_system(base: &str) -> String {
    format!("{base} {PLAIN_TEXT_SYSTEM}")
}

fn to_json<T: serde::Serialize>(value: &T, what: &str) -> Result<String, AppError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize {what}: {e}")))
}

fn selection_prompt(
    analysis: &JobAnalysis,
    bullets: &[Bullet],
    max_count: usize,
    language: Locale,
) -> Result<String, AppError> {
    let candidates: Vec<_> = rank_bullets(bullets, analysis)
        .into_iter()
        .map(|ranked| {
            json!({
                "id": ranked.bullet.id,
                "experience_id": ranked.bullet.experience_id,
                "text": ranked.bullet.content,
                "keywords": ranked.bullet.keywords,
                "relevance": (ranked.relevance * 100.0).round() / 100.0,
                "impact": ranked.bullet.impact_score,
            })
        })
        .collect();

    Ok(SELECT_PROMPT_TEMPLATE
        .replace("{max_count}", &max_count.to_string())
        .replace("{language}", language.code())
        .replace("{analysis_json}", &to_json(analysis, "job analysis")?)
        .replace("{bullets_json}", &to_json(&candidates, "candidate bullets")?))
}

#[async_trait]
impl ResumeAi for LlmResumeAi {
    async fn analyze_job(
        &self,
        job_description: &str,
        language: Locale,
    ) -> Result<JobAnalysis, AppError> {
        let prompt = ANALYZE_PROMPT_TEMPLATE
            .replace("{language_instruction}", &language_instruction(language.code()))
            .replace("{jd_text}", job_description);
        self.llm
            .call_json::<JobAnalysis>(&prompt, &json_system(ANALYZE_SYSTEM))
            .await
            .map_err(|e| AppError::Llm(format!("Job analysis failed: {e}")))
    }

    async fn select_bullets(
        &self,
        analysis: &JobAnalysis,
        bullets: &[Bullet],
        max_count: usize,
        language: Locale,
    ) -> Result<Vec<Uuid>, AppError> {
        let prompt = selection_prompt(analysis, bullets, max_count, language)?;

        let chosen: Vec<Uuid> = self
            .llm
            .call_json(&prompt, &json_system(SELECT_SYSTEM))
            .await
            .map_err(|e| AppError::Llm(format!("Bullet selection failed: {e}")))?;

        let returned = chosen.len();
        let selected = sanitize_selection(chosen, bullets, max_count);
        if selected.len() != returned {
            warn!(
                "Selection reply had {} ids, {} usable after sanitizing",
                returned,
                selected.len()
            );
        }
        if selected.is_empty() {
            return Err(AppError::Llm(
                "Bullet selection returned no usable bullet ids".to_string(),
            ));
        }
        Ok(selected)
    }

    async fn tailor_bullet(
        &self,
        bullet: &Bullet,
        analysis: &JobAnalysis,
        language: Locale,
        style: &TailoringStyle,
    ) -> Result<String, AppError> {
        let prompt = TAILOR_PROMPT_TEMPLATE
            .replace("{factuality_instruction}", FACTUALITY_INSTRUCTION)
            .replace("{emphasis_instruction}", EMPHASIS_INSTRUCTION)
            .replace("{language_instruction}", &language_instruction(language.code()))
            .replace("{style_json}", &to_json(style, "style")?)
            .replace("{analysis_json}", &to_json(analysis, "job analysis")?)
            .replace("{bullet_text}", &bullet.content);

        let text = self
            .llm
            .call_text(&prompt, &text_system(TAILOR_SYSTEM))
            .await
            .map_err(|e| AppError::Llm(format!("Tailoring bullet {} failed: {e}", bullet.id)))?;
        debug!("Tailored bullet {}", bullet.id);
        Ok(text)
    }

    async fn generate_summary(
        &self,
        user: &User,
        analysis: &JobAnalysis,
        bullets: &[TailoredBullet],
        language: Locale,
    ) -> Result<String, AppError> {
        let profile = json!({
            "name": user.full_name,
            "headline": user.headline,
            "location": user.location,
        });
        let achievements: Vec<&str> = bullets.iter().map(|b| b.tailored_content.as_str()).collect();

        let prompt = SUMMARY_PROMPT_TEMPLATE
            .replace("{factuality_instruction}", FACTUALITY_INSTRUCTION)
            .replace("{emphasis_instruction}", EMPHASIS_INSTRUCTION)
            .replace("{language_instruction}", &language_instruction(language.code()))
            .replace("{profile_json}", &to_json(&profile, "profile")?)
            .replace("{analysis_json}", &to_json(analysis, "job analysis")?)
            .replace("{bullets_json}", &to_json(&achievements, "achievements")?);

        self.llm
            .call_text(&prompt, &text_system(SUMMARY_SYSTEM))
            .await
            .map_err(|e| AppError::Llm(format!("Summary generation failed: {e}")))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LlmMatchScorer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ScoreReply {
    score: i64,
}

/// Semantic scorer via the model. The reply is range-checked like any other score.
pub struct LlmMatchScorer {
    llm: LlmClient,
}

impl LlmMatchScorer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl MatchScorer for LlmMatchScorer {
    async fn score(
        &self,
        analysis: &JobAnalysis,
        content: &ResumeContent,
        user_skills: &[Skill],
    ) -> Result<MatchScore, AppError> {
        let skill_names: Vec<&str> = user_skills.iter().map(|s| s.name.as_str()).collect();
        let prompt = SCORE_PROMPT_TEMPLATE
            .replace("{analysis_json}", &to_json(analysis, "job analysis")?)
            .replace("{content_json}", &to_json(content, "resume content")?)
            .replace("{skills_json}", &to_json(&skill_names, "skills")?);

        let reply: ScoreReply = self
            .llm
            .call_json(&prompt, &json_system(SCORE_SYSTEM))
            .await
            .map_err(|e| AppError::Llm(format!("Match scoring failed: {e}")))?;
        MatchScore::new(reply.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_prompt_carries_locale_and_candidates() {
        let bullet = Bullet {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            experience_id: Uuid::new_v4(),
            content: "Construí serviços em Go".to_string(),
            keywords: vec!["Go".to_string()],
            impact_score: 0.8,
        };
        let analysis = JobAnalysis {
            required_skills: vec!["Go".to_string()],
            ..JobAnalysis::default()
        };

        let prompt = selection_prompt(&analysis, &[bullet.clone()], 5, Locale::PtBr).unwrap();

        assert!(prompt.contains("at most 5 bullets"));
        assert!(prompt.contains("locale `pt-BR`"));
        assert!(prompt.contains(&bullet.id.to_string()));
        assert!(!prompt.contains("{language}"));
    }
}
