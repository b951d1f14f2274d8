//! Axum route handlers for the Resume API.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::delivery::PdfDocument;
use crate::errors::AppError;
use crate::i18n::Locale;
use crate::models::{Resume, ResumeStatus};
use crate::render::Template;
use crate::resumes::job_fetch::JobPosting;
use crate::resumes::service::CreateResumeRequest;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct TailorRequest {
    pub user_id: Uuid,
    pub max_bullets: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub user_id: Uuid,
    pub status: String,
}

/// Query string of GET and body of POST on `/pdf`.
#[derive(Debug, Deserialize)]
pub struct PdfRequest {
    pub user_id: Uuid,
    pub template: Option<String>,
    pub locale: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ParseUrlRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ResumeListResponse {
    pub resumes: Vec<Resume>,
}

#[derive(Debug, Serialize)]
pub struct ParseUrlResponse {
    pub posting: JobPosting,
}

impl PdfRequest {
    fn template(&self) -> Result<Template, AppError> {
        self.template
            .as_deref()
            .map(str::parse)
            .transpose()
            .map(Option::unwrap_or_default)
    }

    /// `None` lets the resume's target language decide.
    fn locale(&self) -> Result<Option<Locale>, AppError> {
        match self.locale.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
            None => Ok(None),
            Some(code) => Locale::parse(code).map(Some).ok_or_else(|| {
                AppError::Validation(format!(
                    "unsupported locale '{code}', expected one of {}",
                    Locale::SUPPORTED_CODES.join(", ")
                ))
            }),
        }
    }
}

fn pdf_response(document: PdfDocument) -> Response {
    let cache_status = if document.cached { "HIT" } else { "MISS" };
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", document.filename),
            ),
            (HeaderName::from_static("x-cache"), cache_status.to_string()),
        ],
        document.bytes,
    )
        .into_response()
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    Json(request): Json<CreateResumeRequest>,
) -> Result<(StatusCode, Json<Resume>), AppError> {
    let resume = state.resumes.create_resume(request).await?;
    Ok((StatusCode::CREATED, Json(resume)))
}

/// GET /api/v1/resumes?user_id=
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<ResumeListResponse>, AppError> {
    let resumes = state.resumes.list_resumes(query.user_id).await?;
    Ok(Json(ResumeListResponse { resumes }))
}

/// GET /api/v1/resumes/:id?user_id=
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Resume>, AppError> {
    let resume = state.resumes.get_resume(query.user_id, resume_id).await?;
    Ok(Json(resume))
}

/// DELETE /api/v1/resumes/:id?user_id=
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Query(query): Query<UserQuery>,
) -> Result<StatusCode, AppError> {
    state.resumes.delete_resume(query.user_id, resume_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/resumes/:id/tailor
///
/// Runs the tailoring pipeline; responds with the updated resume.
pub async fn handle_tailor_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(request): Json<TailorRequest>,
) -> Result<Json<Resume>, AppError> {
    let resume = state
        .tailoring
        .tailor_resume(request.user_id, resume_id, request.max_bullets)
        .await?;
    Ok(Json(resume))
}

/// PATCH /api/v1/resumes/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(request): Json<StatusRequest>,
) -> Result<Json<Resume>, AppError> {
    let next: ResumeStatus = request.status.parse()?;
    let resume = state
        .resumes
        .update_status(request.user_id, resume_id, next)
        .await?;
    Ok(Json(resume))
}

/// GET /api/v1/resumes/:id/pdf?user_id=&template=&locale=
///
/// Cache-first download; never changes the resume.
pub async fn handle_download_pdf(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Query(query): Query<PdfRequest>,
) -> Result<Response, AppError> {
    let document = state
        .documents
        .download_pdf(query.user_id, resume_id, query.template()?, query.locale()?)
        .await?;
    Ok(pdf_response(document))
}

/// POST /api/v1/resumes/:id/pdf
///
/// Fresh render; stores it and records `pdf_url` on the resume.
pub async fn handle_generate_pdf(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(request): Json<PdfRequest>,
) -> Result<Response, AppError> {
    let document = state
        .documents
        .generate_pdf(request.user_id, resume_id, request.template()?, request.locale()?)
        .await?;
    Ok(pdf_response(document))
}

/// POST /api/v1/jobs/parse-url
pub async fn handle_parse_job_url(
    State(state): State<AppState>,
    Json(request): Json<ParseUrlRequest>,
) -> Result<Json<ParseUrlResponse>, AppError> {
    let posting = state.resumes.parse_job_url(&request.url).await?;
    Ok(Json(ParseUrlResponse { posting }))
}
