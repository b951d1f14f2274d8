//! Tailoring Orchestrator: turns a draft resume plus the user's content
//! library into persisted `ResumeContent`.
//!
//! Flow: load library → analyze JD → select bullets → tailor each bullet
//!       (bounded fan-out) → summary → group by experience → score → save.
//!
//! Failure policy per step:
//! - analysis, selection, summary: abort and propagate
//! - a single bullet rewrite: logged, bullet omitted
//! - an experience that cannot be loaded: logged, its bullets omitted
//! - scoring: logged, score falls back to 0

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};
use uuid::Uuid;

use crate::delivery::documents::evict_cached_pdf;
use crate::delivery::storage::BlobStore;
use crate::errors::AppError;
use crate::i18n::Locale;
use crate::models::{
    Bullet, KeywordAnalysis, MatchScore, Resume, ResumeContent, TailoredBullet,
    TailoredExperience,
};
use crate::repository::{load_owned_resume, ContentLibrary, ResumeRepository};
use crate::tailoring::capabilities::{JobAnalysis, MatchScorer, ResumeAi};
use crate::tailoring::lock::{LockGuard, TailorLock};
use crate::tailoring::selection::sanitize_selection;
use crate::tailoring::style::style_for;

/// Hard ceiling on `max_bullets` accepted from callers.
pub const MAX_BULLETS_LIMIT: usize = 50;
const MAX_RECOMMENDATIONS: usize = 3;

#[derive(Debug, Clone, Copy)]
pub struct TailoringSettings {
    pub default_max_bullets: usize,
    /// Concurrent per-bullet rewrites.
    pub concurrency: usize,
}

impl Default for TailoringSettings {
    fn default() -> Self {
        Self {
            default_max_bullets: 15,
            concurrency: 4,
        }
    }
}

pub struct TailoringService {
    resumes: Arc<dyn ResumeRepository>,
    library: Arc<dyn ContentLibrary>,
    ai: Arc<dyn ResumeAi>,
    scorer: Arc<dyn MatchScorer>,
    lock: Arc<dyn TailorLock>,
    blobs: Arc<dyn BlobStore>,
    settings: TailoringSettings,
}

impl TailoringService {
    pub fn new(
        resumes: Arc<dyn ResumeRepository>,
        library: Arc<dyn ContentLibrary>,
        ai: Arc<dyn ResumeAi>,
        scorer: Arc<dyn MatchScorer>,
        lock: Arc<dyn TailorLock>,
        blobs: Arc<dyn BlobStore>,
        settings: TailoringSettings,
    ) -> Self {
        Self {
            resumes,
            library,
            ai,
            scorer,
            lock,
            blobs,
            settings,
        }
    }

    /// Runs the full pipeline for one resume and persists the result.
    ///
    /// Each run overwrites `selected_bullets`, `generated_content` and `score`,
    /// so a failed or cancelled run can simply be retried. A dropped call
    /// still releases the lock.
    pub async fn tailor_resume(
        &self,
        user_id: Uuid,
        resume_id: Uuid,
        max_bullets: Option<usize>,
    ) -> Result<Resume, AppError> {
        let max_bullets = self.resolve_max_bullets(max_bullets)?;

        // Ownership first, so a stranger cannot probe the lock.
        load_owned_resume(self.resumes.as_ref(), user_id, resume_id).await?;

        let token = self
            .lock
            .acquire(resume_id)
            .await?
            .ok_or(AppError::TailoringInProgress(resume_id))?;
        let guard = LockGuard::new(self.lock.clone(), resume_id, token);

        let result = self.run(user_id, resume_id, max_bullets).await;

        guard.release().await;
        result
    }

    fn resolve_max_bullets(&self, requested: Option<usize>) -> Result<usize, AppError> {
        match requested {
            None => Ok(self.settings.default_max_bullets),
            Some(n) if (1..=MAX_BULLETS_LIMIT).contains(&n) => Ok(n),
            Some(n) => Err(AppError::Validation(format!(
                "max_bullets must be between 1 and {MAX_BULLETS_LIMIT}, got {n}"
            ))),
        }
    }

    async fn run(
        &self,
        user_id: Uuid,
        resume_id: Uuid,
        max_bullets: usize,
    ) -> Result<Resume, AppError> {
        // Step 1: resume, owner, whole bullet library
        let mut resume = load_owned_resume(self.resumes.as_ref(), user_id, resume_id).await?;
        if resume.status.is_terminal() {
            info!("Re-tailoring resume {resume_id} in terminal status {}", resume.status);
        }
        let user = self
            .library
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;
        let library = self.library.bullets_for_user(user_id).await?;
        if library.is_empty() {
            return Err(AppError::NoBulletsAvailable);
        }

        // Step 2: skills
        let skills = self.library.skills_for_user(user_id).await?;
        let language = Locale::from_code(resume.target_language.as_deref());

        // Step 3: job analysis
        info!("Analyzing job description for resume {resume_id}");
        let analysis = self
            .ai
            .analyze_job(&resume.job_description, language)
            .await?;
        info!(
            "Job analyzed: tone={:?}, {} required skills",
            analysis.tone,
            analysis.required_skills.len()
        );
        resume.backfill_job_details(&analysis.title, &analysis.company);

        // Step 4: selection
        let chosen = self
            .ai
            .select_bullets(&analysis, &library, max_bullets, language)
            .await?;
        // The library holds only this user's bullets, so foreign IDs drop out here.
        let selected_ids = sanitize_selection(chosen, &library, max_bullets);
        if selected_ids.is_empty() {
            return Err(AppError::Llm(
                "Bullet selection chose nothing from the user's library".to_string(),
            ));
        }
        info!(
            "Selected {} of {} bullets for resume {resume_id}",
            selected_ids.len(),
            library.len()
        );

        // Step 5: full records, back in selection order
        let mut fetched = self.library.bullets_by_ids(&selected_ids).await?;
        fetched.retain(|b| b.user_id == user_id);
        let selected: Vec<Bullet> = selected_ids
            .iter()
            .filter_map(|id| fetched.iter().find(|b| b.id == *id).cloned())
            .collect();

        // Step 6: per-bullet rewrite, best effort
        let tailored = self
            .tailor_bullets(selected, Arc::new(analysis.clone()), language)
            .await;
        info!(
            "Tailored {} of {} selected bullets for resume {resume_id}",
            tailored.len(),
            selected_ids.len()
        );

        // Step 7: summary is required
        let summary = self
            .ai
            .generate_summary(&user, &analysis, &tailored, language)
            .await?;

        // Step 8: group under experiences
        let experiences = self.group_by_experience(user_id, tailored, &library).await;

        // Step 10 (assembled before scoring, which reads it)
        let content = ResumeContent {
            summary,
            experiences,
            skills: skills.iter().map(|s| s.name.clone()).collect(),
            analysis: Some(keyword_analysis(&analysis)),
        };

        // Step 9: advisory score
        let score = match self.scorer.score(&analysis, &content, &skills).await {
            Ok(score) => score,
            Err(e) => {
                warn!("Match scoring failed for resume {resume_id}, using 0: {e}");
                MatchScore::zero()
            }
        };

        // Step 11: persist
        resume.apply_tailoring(selected_ids, content, score)?;
        self.resumes.save(&resume).await?;
        // The cached PDF shows the previous content.
        evict_cached_pdf(self.blobs.as_ref(), user_id, resume_id).await;

        info!(
            "Tailored resume {resume_id}: {} bullets, score {}, status {}",
            resume
                .generated_content
                .as_ref()
                .map(ResumeContent::bullet_count)
                .unwrap_or(0),
            resume.score,
            resume.status
        );
        Ok(resume)
    }

    /// Rewrites every bullet concurrently, bounded by `settings.concurrency`.
    /// Failed or empty rewrites are dropped one by one; survivors keep input order.
    async fn tailor_bullets(
        &self,
        bullets: Vec<Bullet>,
        analysis: Arc<JobAnalysis>,
        language: Locale,
    ) -> Vec<TailoredBullet> {
        let style = Arc::new(style_for(analysis.tone));
        let permits = Arc::new(Semaphore::new(self.settings.concurrency.max(1)));
        let mut tasks: JoinSet<(usize, Bullet, Result<String, AppError>)> = JoinSet::new();

        for (index, bullet) in bullets.into_iter().enumerate() {
            let ai = Arc::clone(&self.ai);
            let analysis = Arc::clone(&analysis);
            let style = Arc::clone(&style);
            let permits = Arc::clone(&permits);
            tasks.spawn(async move {
                let result = match permits.acquire_owned().await {
                    Ok(_permit) => ai.tailor_bullet(&bullet, &analysis, language, &style).await,
                    Err(e) => Err(AppError::Internal(anyhow::anyhow!(
                        "Tailoring pool closed: {e}"
                    ))),
                };
                (index, bullet, result)
            });
        }

        let mut slots: Vec<(usize, TailoredBullet)> = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, bullet, Ok(text))) if !text.trim().is_empty() => {
                    slots.push((
                        index,
                        TailoredBullet {
                            bullet_id: bullet.id,
                            original_content: bullet.content,
                            tailored_content: text.trim().to_string(),
                        },
                    ));
                }
                Ok((_, bullet, Ok(_))) => {
                    warn!("Bullet {} came back empty, omitting it", bullet.id);
                }
                Ok((_, bullet, Err(e))) => {
                    warn!("Failed to tailor bullet {}, omitting it: {e}", bullet.id);
                }
                Err(e) => warn!("Bullet tailoring task aborted: {e}"),
            }
        }

        slots.sort_by_key(|(index, _)| *index);
        slots.into_iter().map(|(_, bullet)| bullet).collect()
    }

    /// Experiences appear in the order their first bullet was selected.
    async fn group_by_experience(
        &self,
        user_id: Uuid,
        tailored: Vec<TailoredBullet>,
        library: &[Bullet],
    ) -> Vec<TailoredExperience> {
        let mut groups: Vec<(Uuid, Vec<TailoredBullet>)> = Vec::new();
        for bullet in tailored {
            let Some(experience_id) = library
                .iter()
                .find(|b| b.id == bullet.bullet_id)
                .map(|b| b.experience_id)
            else {
                continue;
            };
            match groups.iter_mut().find(|(id, _)| *id == experience_id) {
                Some((_, bullets)) => bullets.push(bullet),
                None => groups.push((experience_id, vec![bullet])),
            }
        }

        let mut experiences = Vec::with_capacity(groups.len());
        for (experience_id, bullets) in groups {
            let experience = match self.library.find_experience(experience_id).await {
                Ok(Some(exp)) if exp.user_id == user_id => exp,
                Ok(Some(_)) => {
                    warn!("Experience {experience_id} belongs to another user, skipping");
                    continue;
                }
                Ok(None) => {
                    warn!("Experience {experience_id} not found, skipping its bullets");
                    continue;
                }
                Err(e) => {
                    warn!("Failed to load experience {experience_id}, skipping: {e}");
                    continue;
                }
            };
            experiences.push(TailoredExperience {
                experience_id,
                title: experience.title,
                organization: experience.organization,
                start_date: experience.start_date,
                end_date: experience.end_date,
                is_current: experience.is_current,
                bullets,
            });
        }
        experiences
    }
}

/// Required skills count as matched and preferred skills as missing, as-is.
/// This does not check the tailored text.
fn keyword_analysis(analysis: &JobAnalysis) -> KeywordAnalysis {
    let recommendations = analysis
        .preferred_skills
        .iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|skill| format!("Consider adding evidence of {skill} to your experience."))
        .collect();
    KeywordAnalysis {
        matched_keywords: analysis.required_skills.clone(),
        missing_keywords: analysis.preferred_skills.clone(),
        recommendations,
    }
}
