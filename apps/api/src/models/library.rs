//! Content-library records. Read-only inputs to tailoring and rendering;
//! their own CRUD lives outside this service.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Experience {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub organization: String,
    pub location: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_current: bool,
}

/// A single achievement sentence attached to an experience.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Bullet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub experience_id: Uuid,
    pub content: String,
    pub keywords: Vec<String>,
    /// 0.0 – 1.0
    pub impact_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Skill {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    /// Free text; the renderer knows Languages, Frameworks, Tools, Databases, Cloud, Other.
    pub category: String,
}

/// Education dates are free text ("2019-09", "Sep 2019", ...) formatted at render time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Education {
    pub id: Uuid,
    pub user_id: Uuid,
    pub institution: String,
    pub degree: String,
    pub field_of_study: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub gpa: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub technologies: Vec<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SpokenLanguage {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub proficiency: String,
}
