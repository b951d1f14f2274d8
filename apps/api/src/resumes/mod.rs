pub mod handlers;
pub mod job_fetch;
pub mod service;

pub use job_fetch::HttpJobPostingFetcher;
pub use service::ResumeService;
