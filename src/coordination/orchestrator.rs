use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use url::Url;

use crate::config::AuthConfig;
use crate::csrf::CsrfStateStore;
use crate::oauth2::{IdentityProvider, ProviderClient};
use crate::session::{SessionClaims, TokenIssuer};
use crate::storage::CacheStore;
use crate::userdb::{AuthProvider, IdentityResolver, User, UserRepository};

use super::errors::AuthError;

/// Outcome of a successful authentication, whatever the flow.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSuccess {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserSummary,
}

/// The subset of a user record returned to callers on login.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub picture_url: Option<String>,
    pub provider: AuthProvider,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            picture_url: user.picture_url.clone(),
            provider: user.provider,
        }
    }
}

/// Front door of the authentication core.
///
/// Owns the wiring between the state store, the provider client, the
/// identity resolver, and the token issuer, and sequences the three login
/// flows over them. Collaborators are injected, so tests and embedders can
/// substitute the provider transport and both stores.
pub struct AuthOrchestrator {
    config: AuthConfig,
    provider: ProviderClient,
    csrf: CsrfStateStore,
    resolver: IdentityResolver,
    issuer: TokenIssuer,
}

impl AuthOrchestrator {
    pub fn new(
        config: AuthConfig,
        provider: Arc<dyn IdentityProvider>,
        cache: Arc<dyn CacheStore>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        let issuer = TokenIssuer::new(
            &config.jwt_secret,
            config.jwt_issuer.clone(),
            config.token_lifetime_secs,
            config.clock_skew_secs,
        );
        Self {
            provider: ProviderClient::new(provider, config.client_id.clone()),
            csrf: CsrfStateStore::new(cache, config.csrf_ttl_secs),
            resolver: IdentityResolver::new(users),
            issuer,
            config,
        }
    }

    /// Password login against a local account.
    ///
    /// Unknown email, wrong password, and non-local accounts all surface as
    /// the same [`AuthError::CredentialsInvalid`].
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthSuccess, AuthError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                "Username and password are required".to_string(),
            ));
        }

        let user = self
            .resolver
            .validate_local_credentials(username, password)
            .await?
            .ok_or(AuthError::CredentialsInvalid)?;

        tracing::info!(email = %user.email, "Password login succeeded");
        self.succeed(&user)
    }

    /// Begin the authorization-code flow for a session.
    ///
    /// Issues a fresh state token bound to `session_id` and returns the
    /// provider authorization URL to redirect the user to.
    pub async fn initiate_oauth2(&self, session_id: &str) -> Result<String, AuthError> {
        if session_id.is_empty() {
            return Err(AuthError::Validation("Session id is required".to_string()));
        }

        let state = self.csrf.issue(session_id).await?;

        let mut url = Url::parse(&self.config.auth_url)
            .map_err(|e| AuthError::Validation(format!("Bad authorization URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", &self.config.scope)
            .append_pair("state", &state)
            .append_pair("access_type", "offline")
            .append_pair("prompt", "consent");

        tracing::debug!(session_id, "Initiated authorization-code flow");
        Ok(url.to_string())
    }

    /// Complete the authorization-code flow.
    ///
    /// The state is validated and consumed before any provider call is made;
    /// a replayed or foreign state never costs a token exchange.
    pub async fn handle_oauth2_callback(
        &self,
        session_id: &str,
        code: &str,
        state: &str,
    ) -> Result<AuthSuccess, AuthError> {
        if code.is_empty() {
            return Err(AuthError::Validation(
                "Authorization code is required".to_string(),
            ));
        }
        if state.is_empty() {
            return Err(AuthError::Validation("State is required".to_string()));
        }

        if !self.csrf.validate_and_consume(session_id, state).await? {
            return Err(AuthError::CsrfStateMismatch);
        }

        let tokens = self.provider.exchange_code(code).await?;
        let identity = self.provider.fetch_profile(&tokens.access_token).await?;
        let user = self.resolver.resolve_or_create(&identity).await?;

        tracing::info!(email = %user.email, "Authorization-code login succeeded");
        self.succeed(&user)
    }

    /// Log in with a client-supplied ID token (one-tap style).
    ///
    /// The token is introspected at the provider and its audience must match
    /// this application's client id.
    pub async fn login_with_id_token(&self, id_token: &str) -> Result<AuthSuccess, AuthError> {
        if id_token.is_empty() {
            return Err(AuthError::Validation("Id token is required".to_string()));
        }

        let identity = self.provider.verify_id_token(id_token).await?;
        let user = self.resolver.resolve_or_create(&identity).await?;

        tracing::info!(email = %user.email, "Id-token login succeeded");
        self.succeed(&user)
    }

    /// Verify a previously issued session token and return its claims.
    pub fn verify_session_token(&self, token: &str) -> Result<SessionClaims, AuthError> {
        Ok(self.issuer.verify(token)?)
    }

    fn succeed(&self, user: &User) -> Result<AuthSuccess, AuthError> {
        let session = self.issuer.issue(user)?;
        Ok(AuthSuccess {
            token: session.token,
            expires_at: session.expires_at,
            user: UserSummary::from(user),
        })
    }
}
