use async_trait::async_trait;
use std::time::Duration;

use crate::config::AuthConfig;

use super::errors::OAuth2Error;
use super::types::{GoogleUserInfo, IdTokenInfo, OidcTokenResponse};

/// The identity provider's three fixed HTTP endpoints.
///
/// One trait covers all outbound calls so a deterministic stub can stand in
/// for the provider in tests; the audience check happens above this
/// boundary, in [`super::ProviderClient`].
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    /// POST the authorization code to the token endpoint.
    async fn exchange_code(&self, code: &str) -> Result<OidcTokenResponse, OAuth2Error>;

    /// GET the user-info endpoint with a bearer token.
    async fn fetch_userinfo(&self, access_token: &str) -> Result<GoogleUserInfo, OAuth2Error>;

    /// GET the token-introspection endpoint with an ID token.
    async fn introspect_id_token(&self, id_token: &str) -> Result<IdTokenInfo, OAuth2Error>;
}

/// Real provider client over reqwest.
///
/// One `reqwest::Client` serves all three calls with a single configured
/// deadline; a timeout surfaces as the same failure category as a non-2xx
/// response.
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    token_url: String,
    userinfo_url: String,
    tokeninfo_url: String,
}

impl HttpIdentityProvider {
    pub fn new(config: &AuthConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(32)
            .build()
            .expect("Failed to create reqwest client");

        Self {
            client,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            token_url: config.token_url.clone(),
            userinfo_url: config.userinfo_url.clone(),
            tokeninfo_url: config.tokeninfo_url.clone(),
        }
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn exchange_code(&self, code: &str) -> Result<OidcTokenResponse, OAuth2Error> {
        let response = self
            .client
            .post(&self.token_url)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| OAuth2Error::TokenExchange(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, body, "Token exchange returned non-success status");
            return Err(OAuth2Error::TokenExchange(status.to_string()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| OAuth2Error::TokenExchange(e.to_string()))?;
        serde_json::from_str(&body)
            .map_err(|e| OAuth2Error::Serde(format!("Failed to deserialize token response: {e}")))
    }

    async fn fetch_userinfo(&self, access_token: &str) -> Result<GoogleUserInfo, OAuth2Error> {
        let response = self
            .client
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| OAuth2Error::FetchUserInfo(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(%status, "Userinfo endpoint returned non-success status");
            return Err(OAuth2Error::FetchUserInfo(status.to_string()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| OAuth2Error::FetchUserInfo(e.to_string()))?;
        serde_json::from_str(&body)
            .map_err(|e| OAuth2Error::Serde(format!("Failed to deserialize userinfo: {e}")))
    }

    async fn introspect_id_token(&self, id_token: &str) -> Result<IdTokenInfo, OAuth2Error> {
        let response = self
            .client
            .get(&self.tokeninfo_url)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| OAuth2Error::Verification(e.to_string()))?;

        // The introspection endpoint answers 4xx for invalid, expired, or
        // tampered tokens.
        let status = response.status();
        if !status.is_success() {
            tracing::error!(%status, "Tokeninfo endpoint rejected id token");
            return Err(OAuth2Error::Verification(status.to_string()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| OAuth2Error::Verification(e.to_string()))?;
        serde_json::from_str(&body)
            .map_err(|e| OAuth2Error::Serde(format!("Failed to deserialize tokeninfo: {e}")))
    }
}
