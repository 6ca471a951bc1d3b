pub mod orchestrator;
pub mod types;

pub use orchestrator::TurnOrchestrator;
pub use types::{ANONYMOUS_USER, ChatResponse, Citation, UserContext};
