//! Persistence ports. The tailoring and delivery code only sees these traits;
//! `postgres` holds the sqlx adapters wired in `main`.

pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Bullet, Education, Experience, Project, Resume, Skill, SpokenLanguage, User};

pub use postgres::{PgContentLibrary, PgResumeRepository};

#[async_trait]
pub trait ResumeRepository: Send + Sync {
    async fn insert(&self, resume: &Resume) -> Result<(), AppError>;
    async fn find(&self, id: Uuid) -> Result<Option<Resume>, AppError>;
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Resume>, AppError>;
    /// Overwrites every mutable field. No version check: last write wins.
    async fn save(&self, resume: &Resume) -> Result<(), AppError>;
    /// Returns false when nothing was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

/// Read-only view over a user's career facts.
#[async_trait]
pub trait ContentLibrary: Send + Sync {
    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, AppError>;
    /// Every bullet across all of the user's experiences.
    async fn bullets_for_user(&self, user_id: Uuid) -> Result<Vec<Bullet>, AppError>;
    /// Order of the result is unspecified.
    async fn bullets_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Bullet>, AppError>;
    async fn find_experience(&self, id: Uuid) -> Result<Option<Experience>, AppError>;
    async fn skills_for_user(&self, user_id: Uuid) -> Result<Vec<Skill>, AppError>;
    async fn education_for_user(&self, user_id: Uuid) -> Result<Vec<Education>, AppError>;
    async fn projects_for_user(&self, user_id: Uuid) -> Result<Vec<Project>, AppError>;
    async fn languages_for_user(&self, user_id: Uuid) -> Result<Vec<SpokenLanguage>, AppError>;
}

/// Loads a resume and checks that `user_id` owns it.
pub async fn load_owned_resume(
    repo: &dyn ResumeRepository,
    user_id: Uuid,
    resume_id: Uuid,
) -> Result<Resume, AppError> {
    let resume = repo
        .find(resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;
    if resume.user_id != user_id {
        return Err(AppError::Forbidden);
    }
    Ok(resume)
}
