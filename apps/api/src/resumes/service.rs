//! Resume use cases for the CRUD layer: create, read, status updates,
//! deletion, and job-URL parsing.

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::delivery::DocumentService;
use crate::errors::{AppError, FieldError};
use crate::i18n::Locale;
use crate::models::{JobContext, Resume, ResumeStatus};
use crate::repository::{load_owned_resume, ContentLibrary, ResumeRepository};
use crate::resumes::job_fetch::{parse_http_url, JobPosting, JobPostingFetcher};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateResumeRequest {
    pub user_id: Uuid,
    pub job_description: String,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub job_url: Option<String>,
    pub target_language: Option<String>,
    pub notes: Option<String>,
}

pub struct ResumeService {
    resumes: Arc<dyn ResumeRepository>,
    library: Arc<dyn ContentLibrary>,
    documents: Arc<DocumentService>,
    jobs: Arc<dyn JobPostingFetcher>,
}

impl ResumeService {
    pub fn new(
        resumes: Arc<dyn ResumeRepository>,
        library: Arc<dyn ContentLibrary>,
        documents: Arc<DocumentService>,
        jobs: Arc<dyn JobPostingFetcher>,
    ) -> Self {
        Self {
            resumes,
            library,
            documents,
            jobs,
        }
    }

    /// Validates the job context and stores a new draft.
    pub async fn create_resume(&self, request: CreateResumeRequest) -> Result<Resume, AppError> {
        let job = validate_job_context(&request)?;
        if self.library.find_user(request.user_id).await?.is_none() {
            return Err(AppError::NotFound(format!("User {} not found", request.user_id)));
        }

        let mut resume = Resume::new(request.user_id, job);
        resume.notes = non_blank(request.notes);
        self.resumes.insert(&resume).await?;
        info!("Created draft resume {} for user {}", resume.id, resume.user_id);
        Ok(resume)
    }

    pub async fn get_resume(&self, user_id: Uuid, resume_id: Uuid) -> Result<Resume, AppError> {
        load_owned_resume(self.resumes.as_ref(), user_id, resume_id).await
    }

    pub async fn list_resumes(&self, user_id: Uuid) -> Result<Vec<Resume>, AppError> {
        self.resumes.list_for_user(user_id).await
    }

    /// One edge of the status machine. Last write wins.
    pub async fn update_status(
        &self,
        user_id: Uuid,
        resume_id: Uuid,
        next: ResumeStatus,
    ) -> Result<Resume, AppError> {
        let mut resume = load_owned_resume(self.resumes.as_ref(), user_id, resume_id).await?;
        let previous = resume.status;
        resume.transition_to(next)?;
        self.resumes.save(&resume).await?;
        info!("Resume {resume_id} moved {previous} -> {next}");
        Ok(resume)
    }

    /// Drops the cached PDF (best effort), then the resume itself.
    pub async fn delete_resume(&self, user_id: Uuid, resume_id: Uuid) -> Result<(), AppError> {
        load_owned_resume(self.resumes.as_ref(), user_id, resume_id).await?;
        self.documents.evict(user_id, resume_id).await;
        if !self.resumes.delete(resume_id).await? {
            return Err(AppError::NotFound(format!("Resume {resume_id} not found")));
        }
        info!("Deleted resume {resume_id}");
        Ok(())
    }

    pub async fn parse_job_url(&self, raw_url: &str) -> Result<JobPosting, AppError> {
        let url = parse_http_url(raw_url).ok_or_else(|| {
            AppError::InvalidFields(vec![FieldError::new(
                "url",
                "must be an absolute http(s) URL",
            )])
        })?;
        self.jobs.fetch(&url).await
    }
}

/// Collects every field problem before failing.
fn validate_job_context(request: &CreateResumeRequest) -> Result<JobContext, AppError> {
    let mut errors = Vec::new();

    if request.job_description.trim().is_empty() {
        errors.push(FieldError::new("job_description", "must not be empty"));
    }

    let job_url = non_blank(request.job_url.clone());
    if let Some(url) = &job_url {
        if parse_http_url(url).is_none() {
            errors.push(FieldError::new("job_url", "must be an absolute http(s) URL"));
        }
    }

    let target_language = match non_blank(request.target_language.clone()) {
        Some(code) => match Locale::parse(&code) {
            Some(locale) => Some(locale.code().to_string()),
            None => {
                errors.push(FieldError::new(
                    "target_language",
                    format!("unsupported language '{code}'"),
                ));
                None
            }
        },
        None => None,
    };

    if !errors.is_empty() {
        return Err(AppError::InvalidFields(errors));
    }

    Ok(JobContext {
        job_description: request.job_description.trim().to_string(),
        job_title: non_blank(request.job_title.clone()),
        company_name: non_blank(request.company_name.clone()),
        job_url,
        target_language,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
