mod errors;
mod orchestrator;

pub use errors::AuthError;
pub use orchestrator::{AuthOrchestrator, AuthSuccess, UserSummary};
