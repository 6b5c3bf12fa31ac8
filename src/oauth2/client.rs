use std::sync::Arc;

use super::errors::OAuth2Error;
use super::http::IdentityProvider;
use super::types::ExternalIdentity;

/// Tokens returned by a successful authorization-code exchange.
#[derive(Debug, Clone)]
pub struct ProviderTokens {
    pub access_token: String,
    pub id_token: Option<String>,
    pub refresh_token: Option<String>,
}

/// Provider-facing operations of the authentication core.
///
/// Wraps an [`IdentityProvider`] and applies the checks that must not be
/// bypassable by substituting the transport: most importantly the audience
/// check on ID-token verification.
pub struct ProviderClient {
    provider: Arc<dyn IdentityProvider>,
    client_id: String,
}

impl ProviderClient {
    pub fn new(provider: Arc<dyn IdentityProvider>, client_id: String) -> Self {
        Self {
            provider,
            client_id,
        }
    }

    /// Exchange an authorization code for provider tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<ProviderTokens, OAuth2Error> {
        let response = self.provider.exchange_code(code).await?;
        Ok(ProviderTokens {
            access_token: response.access_token,
            id_token: response.id_token,
            refresh_token: response.refresh_token,
        })
    }

    /// Fetch the user's profile with an access token.
    pub async fn fetch_profile(
        &self,
        access_token: &str,
    ) -> Result<ExternalIdentity, OAuth2Error> {
        let userinfo = self.provider.fetch_userinfo(access_token).await?;
        tracing::debug!(email = %userinfo.email, "Fetched profile from provider");
        Ok(ExternalIdentity::from(userinfo))
    }

    /// Verify a client-supplied ID token and map it to an identity.
    ///
    /// The audience claim must equal this application's client id. A token
    /// issued for any other application is rejected even when the provider
    /// reports it as otherwise valid; there is no lenient mode.
    pub async fn verify_id_token(&self, id_token: &str) -> Result<ExternalIdentity, OAuth2Error> {
        let info = self.provider.introspect_id_token(id_token).await?;

        if info.aud != self.client_id {
            tracing::warn!(
                expected = %self.client_id,
                actual = %info.aud,
                "Id token audience mismatch"
            );
            return Err(OAuth2Error::AudienceMismatch {
                expected: self.client_id.clone(),
                actual: info.aud,
            });
        }

        Ok(ExternalIdentity::from(info))
    }
}
