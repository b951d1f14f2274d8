pub mod capabilities;
pub mod llm;
pub mod lock;
pub mod orchestrator;
pub mod prompts;
pub mod scoring;
pub mod selection;
pub mod style;

pub use capabilities::MatchScorer;
pub use llm::{LlmMatchScorer, LlmResumeAi};
pub use lock::RedisTailorLock;
pub use orchestrator::{TailoringService, TailoringSettings};
pub use scoring::KeywordMatchScorer;
