//! Resume aggregate and its status lifecycle.
//!
//! ```text
//! draft → generated → reviewed → submitted → interview → accepted
//!                                          ↘ rejected
//! ```
//! `rejected` and `accepted` are terminal.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::score::MatchScore;

// ────────────────────────────────────────────────────────────────────────────
// Status machine
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeStatus {
    #[default]
    Draft,
    Generated,
    Reviewed,
    Submitted,
    Interview,
    Rejected,
    Accepted,
}

impl ResumeStatus {
    pub const ALL: [ResumeStatus; 7] = [
        ResumeStatus::Draft,
        ResumeStatus::Generated,
        ResumeStatus::Reviewed,
        ResumeStatus::Submitted,
        ResumeStatus::Interview,
        ResumeStatus::Rejected,
        ResumeStatus::Accepted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResumeStatus::Draft => "draft",
            ResumeStatus::Generated => "generated",
            ResumeStatus::Reviewed => "reviewed",
            ResumeStatus::Submitted => "submitted",
            ResumeStatus::Interview => "interview",
            ResumeStatus::Rejected => "rejected",
            ResumeStatus::Accepted => "accepted",
        }
    }

    /// The allowed edge set. Self-transitions are not edges.
    pub fn can_transition_to(self, next: ResumeStatus) -> bool {
        use ResumeStatus::*;
        matches!(
            (self, next),
            (Draft, Generated)
                | (Generated, Reviewed)
                | (Reviewed, Submitted)
                | (Submitted, Interview)
                | (Submitted, Rejected)
                | (Interview, Accepted)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ResumeStatus::Rejected | ResumeStatus::Accepted)
    }
}

impl fmt::Display for ResumeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResumeStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResumeStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| AppError::Validation(format!("unknown resume status '{s}'")))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Generated content
// ────────────────────────────────────────────────────────────────────────────

/// Both texts are kept so the user can compare or revert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailoredBullet {
    pub bullet_id: Uuid,
    pub original_content: String,
    pub tailored_content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailoredExperience {
    pub experience_id: Uuid,
    pub title: String,
    pub organization: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_current: bool,
    pub bullets: Vec<TailoredBullet>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordAnalysis {
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeContent {
    pub summary: String,
    pub experiences: Vec<TailoredExperience>,
    pub skills: Vec<String>,
    pub analysis: Option<KeywordAnalysis>,
}

impl ResumeContent {
    pub fn bullet_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.experiences
            .iter()
            .flat_map(|exp| exp.bullets.iter().map(|b| b.bullet_id))
    }

    pub fn bullet_count(&self) -> usize {
        self.experiences.iter().map(|exp| exp.bullets.len()).sum()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Aggregate
// ────────────────────────────────────────────────────────────────────────────

/// Job context supplied by the user when a resume is created.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobContext {
    pub job_description: String,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub job_url: Option<String>,
    pub target_language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resume {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_description: String,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub job_url: Option<String>,
    pub target_language: Option<String>,
    pub selected_bullets: Vec<Uuid>,
    pub generated_content: Option<ResumeContent>,
    pub score: MatchScore,
    pub pdf_url: Option<String>,
    pub notes: Option<String>,
    pub status: ResumeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resume {
    /// A fresh draft for a submitted job description.
    pub fn new(user_id: Uuid, job: JobContext) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            job_description: job.job_description,
            job_title: job.job_title,
            company_name: job.company_name,
            job_url: job.job_url,
            target_language: job.target_language,
            selected_bullets: Vec::new(),
            generated_content: None,
            score: MatchScore::zero(),
            pdf_url: None,
            notes: None,
            status: ResumeStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    /// True iff content exists, whatever the status.
    pub fn can_generate_pdf(&self) -> bool {
        self.generated_content.is_some()
    }

    /// Moves along one allowed edge; on failure the resume is untouched.
    pub fn transition_to(&mut self, next: ResumeStatus) -> Result<(), AppError> {
        if !self.status.can_transition_to(next) {
            return Err(AppError::InvalidStatusTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.touch();
        Ok(())
    }

    /// Fills unset job title/company. Explicit user input is never overwritten.
    pub fn backfill_job_details(&mut self, title: &str, company: &str) {
        if is_blank(self.job_title.as_deref()) && !title.trim().is_empty() {
            self.job_title = Some(title.trim().to_string());
        }
        if is_blank(self.company_name.as_deref()) && !company.trim().is_empty() {
            self.company_name = Some(company.trim().to_string());
        }
    }

    /// Overwrites the result of a tailoring run. A draft becomes `generated`;
    /// later statuses are kept.
    pub fn apply_tailoring(
        &mut self,
        selected_bullets: Vec<Uuid>,
        content: ResumeContent,
        score: MatchScore,
    ) -> Result<(), AppError> {
        let selected: HashSet<Uuid> = selected_bullets.iter().copied().collect();
        if let Some(stray) = content.bullet_ids().find(|id| !selected.contains(id)) {
            return Err(AppError::Internal(anyhow::anyhow!(
                "tailored bullet {stray} is not among the selected bullets"
            )));
        }

        self.selected_bullets = selected_bullets;
        self.generated_content = Some(content);
        self.score = score;
        if self.status == ResumeStatus::Draft {
            self.status = ResumeStatus::Generated;
        }
        self.touch();
        Ok(())
    }

    /// Records a freshly rendered document; `generated` advances to `reviewed`.
    pub fn record_pdf(&mut self, pdf_url: String) {
        self.pdf_url = Some(pdf_url);
        if self.status == ResumeStatus::Generated {
            self.status = ResumeStatus::Reviewed;
        }
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(|v| v.trim().is_empty()).unwrap_or(true)
}
