use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to create token: {0}")]
    TokenCreation(String),

    #[error("Invalid or expired token")]
    InvalidToken,
}
