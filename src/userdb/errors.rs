use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    /// Unique-constraint violation, raised when two requests race to create
    /// the same email. Recovered by the resolver, never surfaced.
    #[error("Unique constraint conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Password hash error: {0}")]
    Password(String),
}
