use std::env;
use thiserror::Error;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
const GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

/// Configuration for the authentication core.
///
/// Loaded from the environment with [`AuthConfig::from_env`], or constructed
/// directly by callers that manage configuration some other way. The struct
/// is passed into [`crate::AuthOrchestrator`] rather than read from globals
/// so several differently-configured instances can coexist in one process.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// OAuth2 client id registered with the identity provider.
    pub client_id: String,
    /// OAuth2 client secret.
    pub client_secret: String,
    /// Redirect URI registered for the authorization-code flow.
    pub redirect_uri: String,
    /// Authorization endpoint.
    pub auth_url: String,
    /// Token-exchange endpoint.
    pub token_url: String,
    /// User-info endpoint.
    pub userinfo_url: String,
    /// ID-token introspection endpoint.
    pub tokeninfo_url: String,
    /// Scopes requested in the authorization-code flow.
    pub scope: String,
    /// Secret used to sign session tokens (HS256).
    pub jwt_secret: String,
    /// Issuer claim embedded in session tokens.
    pub jwt_issuer: String,
    /// Session token lifetime in seconds.
    pub token_lifetime_secs: u64,
    /// TTL for anti-forgery state tokens in seconds.
    pub csrf_ttl_secs: u64,
    /// Clock-skew leeway for token verification. Zero unless configured.
    pub clock_skew_secs: u64,
    /// Deadline for outbound provider calls in seconds.
    pub request_timeout_secs: u64,
}

impl AuthConfig {
    /// Load configuration from the environment, honoring a `.env` file.
    ///
    /// Client id, client secret, redirect URI, and signing secret are
    /// required; endpoints default to Google's and the remaining knobs have
    /// conservative defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            client_id: require("OAUTH2_GOOGLE_CLIENT_ID")?,
            client_secret: require("OAUTH2_GOOGLE_CLIENT_SECRET")?,
            redirect_uri: require("OAUTH2_REDIRECT_URI")?,
            auth_url: env_or("OAUTH2_AUTH_URL", GOOGLE_AUTH_URL),
            token_url: env_or("OAUTH2_TOKEN_URL", GOOGLE_TOKEN_URL),
            userinfo_url: env_or("OAUTH2_USERINFO_URL", GOOGLE_USERINFO_URL),
            tokeninfo_url: env_or("OAUTH2_TOKENINFO_URL", GOOGLE_TOKENINFO_URL),
            scope: env_or("OAUTH2_SCOPE", "openid email profile"),
            jwt_secret: require("AUTH_JWT_SECRET")?,
            jwt_issuer: env_or("AUTH_JWT_ISSUER", "oauth2-login"),
            token_lifetime_secs: env_u64("AUTH_TOKEN_LIFETIME", 3600)?,
            csrf_ttl_secs: env_u64("OAUTH2_CSRF_TTL", 300)?,
            clock_skew_secs: env_u64("AUTH_CLOCK_SKEW", 0)?,
            request_timeout_secs: env_u64("OAUTH2_REQUEST_TIMEOUT", 30)?,
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_u64(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(name) {
        Ok(v) => v
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name, v.clone())),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> AuthConfig {
    AuthConfig {
        client_id: "test-client-id".to_string(),
        client_secret: "test-client-secret".to_string(),
        redirect_uri: "https://app.example.com/oauth2/callback".to_string(),
        auth_url: GOOGLE_AUTH_URL.to_string(),
        token_url: GOOGLE_TOKEN_URL.to_string(),
        userinfo_url: GOOGLE_USERINFO_URL.to_string(),
        tokeninfo_url: GOOGLE_TOKENINFO_URL.to_string(),
        scope: "openid email profile".to_string(),
        jwt_secret: "test-signing-secret".to_string(),
        jwt_issuer: "oauth2-login".to_string(),
        token_lifetime_secs: 3600,
        csrf_ttl_secs: 300,
        clock_skew_secs: 0,
        request_timeout_secs: 30,
    }
}
