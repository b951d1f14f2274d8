use std::sync::Arc;

use crate::delivery::DocumentService;
use crate::resumes::ResumeService;
use crate::tailoring::TailoringService;

/// Shared application state injected into all route handlers via Axum extractors.
/// Each service holds its ports as `Arc<dyn ...>`, wired in `main`.
#[derive(Clone)]
pub struct AppState {
    pub resumes: Arc<ResumeService>,
    pub tailoring: Arc<TailoringService>,
    pub documents: Arc<DocumentService>,
}
