//! In-memory fakes for every port, plus a `Harness` that wires them into the
//! real services. Test-only.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{NaiveDate, Utc};
use reqwest::Url;
use tokio::sync::Notify;
use uuid::Uuid;

use crate::delivery::pdf::PdfRasterizer;
use crate::delivery::storage::BlobStore;
use crate::delivery::DocumentService;
use crate::errors::AppError;
use crate::i18n::Locale;
use crate::models::{
    Bullet, Education, Experience, JobContext, MatchScore, Project, Resume, ResumeContent, Skill,
    SpokenLanguage, TailoredBullet, User,
};
use crate::render::PageOptions;
use crate::repository::{ContentLibrary, ResumeRepository};
use crate::resumes::job_fetch::{JobPosting, JobPostingFetcher};
use crate::resumes::ResumeService;
use crate::state::AppState;
use crate::tailoring::capabilities::{JobAnalysis, ResumeAi};
use crate::tailoring::lock::{LockToken, TailorLock};
use crate::tailoring::style::TailoringStyle;
use crate::tailoring::{KeywordMatchScorer, MatchScorer, TailoringService, TailoringSettings};

pub const SAMPLE_JOB_DESCRIPTION: &str =
    "Senior Backend Engineer at Acme. You will build services in Go on PostgreSQL. Kubernetes is a plus.";

// ────────────────────────────────────────────────────────────────────────────
// Repositories
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryResumes {
    rows: Mutex<HashMap<Uuid, Resume>>,
    saves: AtomicUsize,
}

impl InMemoryResumes {
    pub fn get(&self, id: Uuid) -> Option<Resume> {
        self.rows.lock().unwrap().get(&id).cloned()
    }

    /// Writes directly, bypassing the save counter.
    pub fn put(&self, resume: Resume) {
        self.rows.lock().unwrap().insert(resume.id, resume);
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResumeRepository for InMemoryResumes {
    async fn insert(&self, resume: &Resume) -> Result<(), AppError> {
        self.put(resume.clone());
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Resume>, AppError> {
        Ok(self.get(id))
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Resume>, AppError> {
        let mut resumes: Vec<Resume> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        resumes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(resumes)
    }

    async fn save(&self, resume: &Resume) -> Result<(), AppError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.put(resume.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.rows.lock().unwrap().remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct InMemoryLibrary {
    pub users: Mutex<Vec<User>>,
    pub experiences: Mutex<Vec<Experience>>,
    pub bullets: Mutex<Vec<Bullet>>,
    pub skills: Mutex<Vec<Skill>>,
    pub education: Mutex<Vec<Education>>,
    pub projects: Mutex<Vec<Project>>,
    pub languages: Mutex<Vec<SpokenLanguage>>,
}

fn owned_by<T: Clone>(rows: &Mutex<Vec<T>>, owner: impl Fn(&T) -> bool) -> Vec<T> {
    rows.lock().unwrap().iter().filter(|r| owner(r)).cloned().collect()
}

#[async_trait]
impl ContentLibrary for InMemoryLibrary {
    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == user_id).cloned())
    }

    async fn bullets_for_user(&self, user_id: Uuid) -> Result<Vec<Bullet>, AppError> {
        Ok(owned_by(&self.bullets, |b| b.user_id == user_id))
    }

    async fn bullets_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Bullet>, AppError> {
        // Reversed so callers cannot lean on the request order.
        let mut found = owned_by(&self.bullets, |b| ids.contains(&b.id));
        found.reverse();
        Ok(found)
    }

    async fn find_experience(&self, id: Uuid) -> Result<Option<Experience>, AppError> {
        Ok(self.experiences.lock().unwrap().iter().find(|e| e.id == id).cloned())
    }

    async fn skills_for_user(&self, user_id: Uuid) -> Result<Vec<Skill>, AppError> {
        Ok(owned_by(&self.skills, |s| s.user_id == user_id))
    }

    async fn education_for_user(&self, user_id: Uuid) -> Result<Vec<Education>, AppError> {
        Ok(owned_by(&self.education, |e| e.user_id == user_id))
    }

    async fn projects_for_user(&self, user_id: Uuid) -> Result<Vec<Project>, AppError> {
        Ok(owned_by(&self.projects, |p| p.user_id == user_id))
    }

    async fn languages_for_user(&self, user_id: Uuid) -> Result<Vec<SpokenLanguage>, AppError> {
        Ok(owned_by(&self.languages, |l| l.user_id == user_id))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// AI capabilities
// ────────────────────────────────────────────────────────────────────────────

/// Deterministic stand-in for the model. Selects bullets in library order.
pub struct FakeAi {
    analysis: JobAnalysis,
    failing_bullets: Mutex<HashSet<Uuid>>,
    fail_summary: AtomicBool,
    analyze_calls: AtomicUsize,
    analyze_delay: Mutex<Duration>,
}

impl Default for FakeAi {
    fn default() -> Self {
        Self {
            analysis: JobAnalysis {
                title: "Senior Backend Engineer".to_string(),
                company: "Acme".to_string(),
                required_skills: vec!["Go".to_string(), "PostgreSQL".to_string()],
                preferred_skills: vec!["Kubernetes".to_string()],
                keywords: vec!["services".to_string()],
                seniority: "senior".to_string(),
                ..JobAnalysis::default()
            },
            failing_bullets: Mutex::new(HashSet::new()),
            fail_summary: AtomicBool::new(false),
            analyze_calls: AtomicUsize::new(0),
            analyze_delay: Mutex::new(Duration::ZERO),
        }
    }
}

impl FakeAi {
    pub fn fail_bullet(&self, id: Uuid) {
        self.failing_bullets.lock().unwrap().insert(id);
    }

    pub fn fail_summary(&self) {
        self.fail_summary.store(true, Ordering::SeqCst);
    }

    /// Makes `analyze_job` sleep first; `Duration::ZERO` turns it off.
    pub fn stall_analysis(&self, delay: Duration) {
        *self.analyze_delay.lock().unwrap() = delay;
    }

    pub fn analyze_calls(&self) -> usize {
        self.analyze_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResumeAi for FakeAi {
    async fn analyze_job(&self, _jd: &str, _language: Locale) -> Result<JobAnalysis, AppError> {
        self.analyze_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.analyze_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Ok(self.analysis.clone())
    }

    async fn select_bullets(
        &self,
        _analysis: &JobAnalysis,
        bullets: &[Bullet],
        max_count: usize,
        _language: Locale,
    ) -> Result<Vec<Uuid>, AppError> {
        Ok(bullets.iter().take(max_count).map(|b| b.id).collect())
    }

    async fn tailor_bullet(
        &self,
        bullet: &Bullet,
        _analysis: &JobAnalysis,
        _language: Locale,
        style: &TailoringStyle,
    ) -> Result<String, AppError> {
        if self.failing_bullets.lock().unwrap().contains(&bullet.id) {
            return Err(AppError::Llm(format!("rewrite of {} failed", bullet.id)));
        }
        Ok(format!("**{}** {}", style.strong_verbs[0], bullet.content))
    }

    async fn generate_summary(
        &self,
        user: &User,
        _analysis: &JobAnalysis,
        bullets: &[TailoredBullet],
        _language: Locale,
    ) -> Result<String, AppError> {
        if self.fail_summary.load(Ordering::SeqCst) {
            return Err(AppError::Llm("summary failed".to_string()));
        }
        Ok(format!(
            "{} is a backend engineer with {} relevant achievements.",
            user.full_name,
            bullets.len()
        ))
    }
}

/// Keyword scorer that can be told to fail.
#[derive(Default)]
pub struct FakeScorer {
    fail: AtomicBool,
}

impl FakeScorer {
    pub fn fail(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl MatchScorer for FakeScorer {
    async fn score(
        &self,
        analysis: &JobAnalysis,
        content: &ResumeContent,
        user_skills: &[Skill],
    ) -> Result<MatchScore, AppError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Llm("scoring unavailable".to_string()));
        }
        KeywordMatchScorer.score(analysis, content, user_skills).await
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Delivery
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeRasterizer {
    calls: AtomicUsize,
    fail: AtomicBool,
    last_template: Mutex<Option<String>>,
}

impl FakeRasterizer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn last_template(&self) -> Option<String> {
        self.last_template.lock().unwrap().clone()
    }
}

#[async_trait]
impl PdfRasterizer for FakeRasterizer {
    async fn rasterize(
        &self,
        html: &str,
        template_name: &str,
        _options: &PageOptions,
    ) -> Result<Bytes, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_template.lock().unwrap() = Some(template_name.to_string());
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Pdf("rasterizer down".to_string()));
        }
        Ok(Bytes::from(format!(
            "%PDF-1.7\n% {template_name} {} bytes of html\n%%EOF",
            html.len()
        )))
    }
}

#[derive(Default)]
pub struct InMemoryBlobs {
    objects: Mutex<HashMap<String, Bytes>>,
    fail: AtomicBool,
    put_attempts: AtomicUsize,
    written: Notify,
}

impl InMemoryBlobs {
    /// Every operation errors from now on.
    pub fn fail_all(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn clear(&self) {
        self.objects.lock().unwrap().clear();
    }

    pub fn corrupt(&self, key: &str) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), Bytes::from_static(b"<html>not a pdf</html>"));
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn put_attempts(&self) -> usize {
        self.put_attempts.load(Ordering::SeqCst)
    }

    /// Waits for the next `put`, successful or not.
    pub async fn wait_for_put(&self) {
        tokio::time::timeout(Duration::from_secs(5), self.written.notified())
            .await
            .expect("no cache write happened");
    }

    fn check(&self) -> Result<(), AppError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Storage("blob store unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobs {
    async fn put(&self, key: &str, bytes: Bytes, _content_type: &str) -> Result<(), AppError> {
        self.put_attempts.fetch_add(1, Ordering::SeqCst);
        let result = self.check().map(|()| {
            self.objects.lock().unwrap().insert(key.to_string(), bytes);
        });
        self.written.notify_one();
        result
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>, AppError> {
        self.check()?;
        Ok(self.objects.lock().unwrap().get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.check()?;
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Job fetch, lock
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeJobFetcher {
    calls: AtomicUsize,
}

impl FakeJobFetcher {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobPostingFetcher for FakeJobFetcher {
    async fn fetch(&self, _url: &Url) -> Result<JobPosting, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(JobPosting {
            title: "Senior Backend Engineer".to_string(),
            company: "Acme".to_string(),
            description: SAMPLE_JOB_DESCRIPTION.to_string(),
            location: Some("Remote".to_string()),
        })
    }
}

#[derive(Default)]
pub struct InMemoryLock {
    held: Mutex<HashMap<Uuid, LockToken>>,
}

impl InMemoryLock {
    pub fn is_free(&self, resume_id: Uuid) -> bool {
        !self.held.lock().unwrap().contains_key(&resume_id)
    }
}

#[async_trait]
impl TailorLock for InMemoryLock {
    async fn acquire(&self, resume_id: Uuid) -> Result<Option<LockToken>, AppError> {
        let mut held = self.held.lock().unwrap();
        if held.contains_key(&resume_id) {
            return Ok(None);
        }
        let token = LockToken::generate();
        held.insert(resume_id, token.clone());
        Ok(Some(token))
    }

    async fn release(&self, resume_id: Uuid, token: LockToken) -> Result<(), AppError> {
        let mut held = self.held.lock().unwrap();
        if held.get(&resume_id) == Some(&token) {
            held.remove(&resume_id);
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Harness
// ────────────────────────────────────────────────────────────────────────────

/// One user with one current experience, two skills, a degree and a language.
pub struct Harness {
    pub user: User,
    pub experience: Experience,
    pub resumes: Arc<InMemoryResumes>,
    pub library: Arc<InMemoryLibrary>,
    pub ai: Arc<FakeAi>,
    pub scorer: Arc<FakeScorer>,
    pub lock: Arc<InMemoryLock>,
    pub pdf: Arc<FakeRasterizer>,
    pub blobs: Arc<InMemoryBlobs>,
    pub jobs: Arc<FakeJobFetcher>,
}

impl Harness {
    pub fn new() -> Self {
        let user = User {
            id: Uuid::new_v4(),
            email: "ada@example.com".to_string(),
            full_name: "Ada Lovelace".to_string(),
            headline: Some("Backend Engineer".to_string()),
            phone: None,
            location: Some("London".to_string()),
            linkedin_url: Some("https://linkedin.com/in/ada".to_string()),
            github_url: None,
            website: None,
            created_at: Utc::now(),
        };
        let experience = Experience {
            id: Uuid::new_v4(),
            user_id: user.id,
            title: "Senior Engineer".to_string(),
            organization: "Analytical Engines Ltd".to_string(),
            location: None,
            start_date: NaiveDate::from_ymd_opt(2021, 3, 1).unwrap(),
            end_date: Some(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()),
            is_current: true,
        };

        let library = InMemoryLibrary::default();
        library.users.lock().unwrap().push(user.clone());
        library.experiences.lock().unwrap().push(experience.clone());
        library.skills.lock().unwrap().extend([
            Skill {
                id: Uuid::new_v4(),
                user_id: user.id,
                name: "Go".to_string(),
                category: "Languages".to_string(),
            },
            Skill {
                id: Uuid::new_v4(),
                user_id: user.id,
                name: "PostgreSQL".to_string(),
                category: "Databases".to_string(),
            },
        ]);
        library.education.lock().unwrap().push(Education {
            id: Uuid::new_v4(),
            user_id: user.id,
            institution: "University of London".to_string(),
            degree: "BSc Mathematics".to_string(),
            field_of_study: None,
            location: None,
            start_date: Some("2014-09".to_string()),
            end_date: Some("2017-06".to_string()),
            gpa: Some(3.8),
        });
        library.languages.lock().unwrap().push(SpokenLanguage {
            id: Uuid::new_v4(),
            user_id: user.id,
            name: "English".to_string(),
            proficiency: "native".to_string(),
        });

        Self {
            user,
            experience,
            resumes: Arc::new(InMemoryResumes::default()),
            library: Arc::new(library),
            ai: Arc::new(FakeAi::default()),
            scorer: Arc::new(FakeScorer::default()),
            lock: Arc::new(InMemoryLock::default()),
            pdf: Arc::new(FakeRasterizer::default()),
            blobs: Arc::new(InMemoryBlobs::default()),
            jobs: Arc::new(FakeJobFetcher::default()),
        }
    }

    pub fn add_bullet(&self, content: &str) -> Bullet {
        self.add_bullet_to(self.experience.id, content)
    }

    /// The experience need not exist.
    pub fn add_bullet_to(&self, experience_id: Uuid, content: &str) -> Bullet {
        let bullet = Bullet {
            id: Uuid::new_v4(),
            user_id: self.user.id,
            experience_id,
            content: content.to_string(),
            keywords: vec![],
            impact_score: 0.5,
        };
        self.library.bullets.lock().unwrap().push(bullet.clone());
        bullet
    }

    /// Stores a fresh draft for the sample job.
    pub async fn draft(&self) -> Resume {
        let resume = Resume::new(
            self.user.id,
            JobContext {
                job_description: SAMPLE_JOB_DESCRIPTION.to_string(),
                ..JobContext::default()
            },
        );
        self.resumes.insert(&resume).await.unwrap();
        resume
    }

    /// A draft run through the tailoring pipeline once.
    pub async fn tailored(&self) -> Resume {
        self.add_bullet("Built Go services on PostgreSQL");
        let resume = self.draft().await;
        self.tailoring()
            .tailor_resume(self.user.id, resume.id, None)
            .await
            .unwrap()
    }

    pub fn tailoring(&self) -> TailoringService {
        TailoringService::new(
            self.resumes.clone(),
            self.library.clone(),
            self.ai.clone(),
            self.scorer.clone(),
            self.lock.clone(),
            self.blobs.clone(),
            TailoringSettings {
                default_max_bullets: 15,
                concurrency: 2,
            },
        )
    }

    pub fn documents(&self) -> DocumentService {
        DocumentService::new(
            self.resumes.clone(),
            self.library.clone(),
            self.pdf.clone(),
            self.blobs.clone(),
        )
    }

    pub fn resume_service(&self) -> ResumeService {
        ResumeService::new(
            self.resumes.clone(),
            self.library.clone(),
            Arc::new(self.documents()),
            self.jobs.clone(),
        )
    }

    pub fn state(&self) -> AppState {
        let documents = Arc::new(self.documents());
        AppState {
            resumes: Arc::new(ResumeService::new(
                self.resumes.clone(),
                self.library.clone(),
                documents.clone(),
                self.jobs.clone(),
            )),
            tailoring: Arc::new(self.tailoring()),
            documents,
        }
    }
}
