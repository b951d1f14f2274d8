use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    Bullet, Education, Experience, MatchScore, Project, Resume, ResumeContent, Skill,
    SpokenLanguage, User,
};
use crate::repository::{ContentLibrary, ResumeRepository};

/// Row shape of the `resumes` table.
#[derive(Debug, FromRow)]
struct ResumeRow {
    id: Uuid,
    user_id: Uuid,
    job_description: String,
    job_title: Option<String>,
    company_name: Option<String>,
    job_url: Option<String>,
    target_language: Option<String>,
    selected_bullets: Vec<Uuid>,
    generated_content: Option<Json<ResumeContent>>,
    score: i16,
    pdf_url: Option<String>,
    notes: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ResumeRow> for Resume {
    type Error = AppError;

    fn try_from(row: ResumeRow) -> Result<Self, Self::Error> {
        Ok(Resume {
            id: row.id,
            user_id: row.user_id,
            job_description: row.job_description,
            job_title: row.job_title,
            company_name: row.company_name,
            job_url: row.job_url,
            target_language: row.target_language,
            selected_bullets: row.selected_bullets,
            generated_content: row.generated_content.map(|Json(content)| content),
            score: MatchScore::new(row.score as i64)?,
            pdf_url: row.pdf_url,
            notes: row.notes,
            status: row.status.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Clone)]
pub struct PgResumeRepository {
    pool: PgPool,
}

impl PgResumeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeRepository for PgResumeRepository {
    async fn insert(&self, resume: &Resume) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO resumes
                (id, user_id, job_description, job_title, company_name, job_url,
                 target_language, selected_bullets, generated_content, score,
                 pdf_url, notes, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(resume.id)
        .bind(resume.user_id)
        .bind(&resume.job_description)
        .bind(&resume.job_title)
        .bind(&resume.company_name)
        .bind(&resume.job_url)
        .bind(&resume.target_language)
        .bind(&resume.selected_bullets)
        .bind(resume.generated_content.as_ref().map(Json))
        .bind(resume.score.value() as i16)
        .bind(&resume.pdf_url)
        .bind(&resume.notes)
        .bind(resume.status.as_str())
        .bind(resume.created_at)
        .bind(resume.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Resume>, AppError> {
        sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Resume::try_from)
            .transpose()
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Resume>, AppError> {
        sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Resume::try_from)
        .collect()
    }

    async fn save(&self, resume: &Resume) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE resumes SET
                job_title = $2,
                company_name = $3,
                job_url = $4,
                target_language = $5,
                selected_bullets = $6,
                generated_content = $7,
                score = $8,
                pdf_url = $9,
                notes = $10,
                status = $11,
                updated_at = $12
            WHERE id = $1
            "#,
        )
        .bind(resume.id)
        .bind(&resume.job_title)
        .bind(&resume.company_name)
        .bind(&resume.job_url)
        .bind(&resume.target_language)
        .bind(&resume.selected_bullets)
        .bind(resume.generated_content.as_ref().map(Json))
        .bind(resume.score.value() as i16)
        .bind(&resume.pdf_url)
        .bind(&resume.notes)
        .bind(resume.status.as_str())
        .bind(resume.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Resume {} not found", resume.id)));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Clone)]
pub struct PgContentLibrary {
    pool: PgPool,
}

impl PgContentLibrary {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentLibrary for PgContentLibrary {
    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn bullets_for_user(&self, user_id: Uuid) -> Result<Vec<Bullet>, AppError> {
        Ok(sqlx::query_as::<_, Bullet>(
            r#"
            SELECT b.*
            FROM bullets b
            JOIN experiences e ON e.id = b.experience_id
            WHERE b.user_id = $1
            ORDER BY e.start_date DESC, b.created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn bullets_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Bullet>, AppError> {
        Ok(sqlx::query_as::<_, Bullet>("SELECT * FROM bullets WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_experience(&self, id: Uuid) -> Result<Option<Experience>, AppError> {
        Ok(sqlx::query_as::<_, Experience>("SELECT * FROM experiences WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn skills_for_user(&self, user_id: Uuid) -> Result<Vec<Skill>, AppError> {
        Ok(sqlx::query_as::<_, Skill>(
            "SELECT * FROM skills WHERE user_id = $1 ORDER BY sort_order, name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn education_for_user(&self, user_id: Uuid) -> Result<Vec<Education>, AppError> {
        Ok(sqlx::query_as::<_, Education>(
            "SELECT * FROM education WHERE user_id = $1 ORDER BY sort_order, start_date DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn projects_for_user(&self, user_id: Uuid) -> Result<Vec<Project>, AppError> {
        Ok(sqlx::query_as::<_, Project>(
            "SELECT * FROM projects WHERE user_id = $1 ORDER BY sort_order, name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn languages_for_user(&self, user_id: Uuid) -> Result<Vec<SpokenLanguage>, AppError> {
        Ok(sqlx::query_as::<_, SpokenLanguage>(
            "SELECT * FROM spoken_languages WHERE user_id = $1 ORDER BY sort_order, name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }
}
