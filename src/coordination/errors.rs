use thiserror::Error;

use crate::oauth2::OAuth2Error;
use crate::session::SessionError;
use crate::storage::StorageError;
use crate::userdb::UserError;

/// Top-level error for authentication flows.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The callback state did not validate: missing, expired, already
    /// consumed, bound to another session, or simply wrong.
    #[error("State token mismatch")]
    CsrfStateMismatch,

    #[error("Invalid username or password")]
    CredentialsInvalid,

    #[error(transparent)]
    OAuth2(#[from] OAuth2Error),

    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// A message safe to show to an end user.
    ///
    /// Provider-side failures carry upstream response bodies in their
    /// `Display` output, so they collapse to a generic line here; the
    /// detail stays in the logs.
    pub fn client_message(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "Invalid request",
            AuthError::CsrfStateMismatch => "Authentication request could not be verified",
            AuthError::CredentialsInvalid => "Invalid username or password",
            AuthError::OAuth2(_) => "Google authentication failed",
            AuthError::User(_) | AuthError::Storage(_) => "Authentication temporarily unavailable",
            AuthError::Session(SessionError::InvalidToken) => "Invalid or expired session",
            AuthError::Session(_) => "Authentication temporarily unavailable",
        }
    }
}
