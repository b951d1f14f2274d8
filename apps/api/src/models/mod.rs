pub mod library;
pub mod resume;
pub mod score;
pub mod user;

pub use library::{Bullet, Education, Experience, Project, Skill, SpokenLanguage};
pub use resume::{
    JobContext, KeywordAnalysis, Resume, ResumeContent, ResumeStatus, TailoredBullet,
    TailoredExperience,
};
pub use score::MatchScore;
pub use user::User;
