//! Document Delivery: renders, rasterizes, and caches resume PDFs.
//!
//! `download_pdf` is cache-first and read-only. On a miss the bytes go back to
//! the caller first; the cache write is spawned afterwards and never joined.
//! `generate_pdf` always renders, stores synchronously, and records `pdf_url`.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::delivery::filename::pdf_filename;
use crate::delivery::pdf::PdfRasterizer;
use crate::delivery::storage::BlobStore;
use crate::errors::AppError;
use crate::i18n::Locale;
use crate::models::Resume;
use crate::render::{render_resume, RenderInput, Template};
use crate::repository::{load_owned_resume, ContentLibrary, ResumeRepository};

const PDF_CONTENT_TYPE: &str = "application/pdf";
const PDF_MAGIC: &[u8] = b"%PDF";

#[derive(Debug, Clone)]
pub struct PdfDocument {
    pub bytes: Bytes,
    pub filename: String,
    /// Served from the cache without rendering.
    pub cached: bool,
}

/// Deterministic per resume. The template is not part of the key.
pub fn cache_key(user_id: Uuid, resume_id: Uuid) -> String {
    format!("resumes/{user_id}/{resume_id}.pdf")
}

/// Best-effort delete of a resume's cached PDF. Failures are only logged.
pub async fn evict_cached_pdf(blobs: &dyn BlobStore, user_id: Uuid, resume_id: Uuid) {
    let key = cache_key(user_id, resume_id);
    if let Err(e) = blobs.delete(&key).await {
        warn!("Failed to delete cached PDF {key}: {e}");
    }
}

fn looks_like_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

pub struct DocumentService {
    resumes: Arc<dyn ResumeRepository>,
    library: Arc<dyn ContentLibrary>,
    pdf: Arc<dyn PdfRasterizer>,
    blobs: Arc<dyn BlobStore>,
}

impl DocumentService {
    pub fn new(
        resumes: Arc<dyn ResumeRepository>,
        library: Arc<dyn ContentLibrary>,
        pdf: Arc<dyn PdfRasterizer>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            resumes,
            library,
            pdf,
            blobs,
        }
    }

    pub async fn download_pdf(
        &self,
        user_id: Uuid,
        resume_id: Uuid,
        template: Template,
        locale: Option<Locale>,
    ) -> Result<PdfDocument, AppError> {
        let resume = load_owned_resume(self.resumes.as_ref(), user_id, resume_id).await?;
        if !resume.can_generate_pdf() {
            return Err(AppError::ResumeNotReady);
        }
        let filename = pdf_filename(resume.company_name.as_deref(), resume.job_title.as_deref());
        let key = cache_key(user_id, resume_id);

        match self.blobs.get(&key).await {
            Ok(Some(bytes)) if looks_like_pdf(&bytes) => {
                debug!("PDF cache hit for {key}");
                return Ok(PdfDocument {
                    bytes,
                    filename,
                    cached: true,
                });
            }
            Ok(Some(bytes)) => {
                warn!("Cached object {key} is not a PDF ({} bytes), regenerating", bytes.len())
            }
            Ok(None) => debug!("PDF cache miss for {key}"),
            Err(e) => warn!("PDF cache read failed for {key}, regenerating: {e}"),
        }

        let bytes = self.render_pdf(&resume, template, locale).await?;
        self.spawn_cache_write(key, bytes.clone());
        Ok(PdfDocument {
            bytes,
            filename,
            cached: false,
        })
    }

    pub async fn generate_pdf(
        &self,
        user_id: Uuid,
        resume_id: Uuid,
        template: Template,
        locale: Option<Locale>,
    ) -> Result<PdfDocument, AppError> {
        let mut resume = load_owned_resume(self.resumes.as_ref(), user_id, resume_id).await?;
        if !resume.can_generate_pdf() {
            return Err(AppError::ResumeNotReady);
        }

        let bytes = self.render_pdf(&resume, template, locale).await?;
        let key = cache_key(user_id, resume_id);
        self.blobs.put(&key, bytes.clone(), PDF_CONTENT_TYPE).await?;

        resume.record_pdf(key);
        self.resumes.save(&resume).await?;
        info!(
            "Generated PDF for resume {resume_id} ({} bytes, template {})",
            bytes.len(),
            template.name()
        );

        Ok(PdfDocument {
            bytes,
            filename: pdf_filename(resume.company_name.as_deref(), resume.job_title.as_deref()),
            cached: false,
        })
    }

    /// Best-effort removal of the cached PDF.
    pub async fn evict(&self, user_id: Uuid, resume_id: Uuid) {
        evict_cached_pdf(self.blobs.as_ref(), user_id, resume_id).await;
    }

    async fn render_pdf(
        &self,
        resume: &Resume,
        template: Template,
        locale: Option<Locale>,
    ) -> Result<Bytes, AppError> {
        let locale = locale.unwrap_or_else(|| Locale::from_code(resume.target_language.as_deref()));
        let user_id = resume.user_id;
        let user = self
            .library
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;
        let (education, projects, languages, skills) = tokio::try_join!(
            self.library.education_for_user(user_id),
            self.library.projects_for_user(user_id),
            self.library.languages_for_user(user_id),
            self.library.skills_for_user(user_id),
        )?;

        let html = render_resume(
            RenderInput {
                user: &user,
                resume,
                education: &education,
                projects: &projects,
                languages: &languages,
                skills: &skills,
            },
            locale,
            template,
        );

        let bytes = self
            .pdf
            .rasterize(&html, template.name(), &template.page_options())
            .await?;
        if bytes.is_empty() {
            return Err(AppError::Pdf("Rasterizer returned an empty document".to_string()));
        }
        Ok(bytes)
    }

    /// Detached from the request: a dropped client does not cancel it.
    fn spawn_cache_write(&self, key: String, bytes: Bytes) {
        let blobs = Arc::clone(&self.blobs);
        tokio::spawn(async move {
            match blobs.put(&key, bytes, PDF_CONTENT_TYPE).await {
                Ok(()) => debug!("Cached PDF at {key}"),
                Err(e) => warn!("Failed to cache PDF at {key}: {e}"),
            }
        });
    }
}
