//! Ports for the AI capabilities the tailoring pipeline drives.
//!
//! The orchestrator holds these as `Arc<dyn ...>` so the LLM-backed adapters
//! can be swapped for fakes in tests, and so the per-step failure policy lives
//! in one place instead of inside each client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::i18n::Locale;
use crate::models::{Bullet, MatchScore, ResumeContent, Skill, TailoredBullet, User};
use crate::tailoring::style::TailoringStyle;

/// Detected register of a job description. Drives verb choice when rewriting bullets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobTone {
    AggressiveStartup,
    #[default]
    CollaborativeEnterprise,
    ResearchOriented,
    ProductOriented,
}

/// Structured reading of a job description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobAnalysis {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub preferred_skills: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub tone: JobTone,
    #[serde(default)]
    pub seniority: String,
}

impl JobAnalysis {
    /// Required skills, preferred skills, then keywords, deduplicated
    /// case-insensitively with the first occurrence kept.
    pub fn all_terms(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.required_skills
            .iter()
            .chain(&self.preferred_skills)
            .chain(&self.keywords)
            .map(|term| term.trim())
            .filter(|term| !term.is_empty() && seen.insert(term.to_lowercase()))
            .collect()
    }
}

#[async_trait]
pub trait ResumeAi: Send + Sync {
    async fn analyze_job(
        &self,
        job_description: &str,
        language: Locale,
    ) -> Result<JobAnalysis, AppError>;

    /// Ordered IDs of the chosen bullets, at most `max_count`.
    async fn select_bullets(
        &self,
        analysis: &JobAnalysis,
        bullets: &[Bullet],
        max_count: usize,
        language: Locale,
    ) -> Result<Vec<Uuid>, AppError>;

    async fn tailor_bullet(
        &self,
        bullet: &Bullet,
        analysis: &JobAnalysis,
        language: Locale,
        style: &TailoringStyle,
    ) -> Result<String, AppError>;

    async fn generate_summary(
        &self,
        user: &User,
        analysis: &JobAnalysis,
        bullets: &[TailoredBullet],
        language: Locale,
    ) -> Result<String, AppError>;
}

/// Estimates resume-to-job fit. Carried in state as `Arc<dyn MatchScorer>`.
#[async_trait]
pub trait MatchScorer: Send + Sync {
    async fn score(
        &self,
        analysis: &JobAnalysis,
        content: &ResumeContent,
        user_skills: &[Skill],
    ) -> Result<MatchScore, AppError>;
}
