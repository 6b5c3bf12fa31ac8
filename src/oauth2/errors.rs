use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum OAuth2Error {
    #[error("Token exchange error: {0}")]
    TokenExchange(String),

    #[error("Fetch user info error: {0}")]
    FetchUserInfo(String),

    #[error("Id token verification error: {0}")]
    Verification(String),

    #[error("Id token audience mismatch, expected: {expected}, actual: {actual}")]
    AudienceMismatch { expected: String, actual: String },

    #[error("Serde error: {0}")]
    Serde(String),
}
