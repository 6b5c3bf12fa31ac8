use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::userdb::User;

use super::errors::SessionError;

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    /// Subject: the local user id.
    pub sub: String,
    pub email: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// A freshly issued session token.
#[derive(Debug, Clone)]
pub struct SessionToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies stateless session tokens (HS256).
///
/// Tokens are issued fresh on every successful authentication and are
/// verifiable without a store lookup. Verification rejects a bad signature,
/// a wrong issuer, or an expired lifetime; leeway is zero unless the caller
/// configured a clock skew.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    lifetime_secs: u64,
    leeway_secs: u64,
}

impl TokenIssuer {
    pub fn new(secret: &str, issuer: String, lifetime_secs: u64, leeway_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
            issuer,
            lifetime_secs,
            leeway_secs,
        }
    }

    /// Build and sign a token for an authenticated user.
    pub fn issue(&self, user: &User) -> Result<SessionToken, SessionError> {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: user.id.clone(),
            email: user.email.clone(),
            iss: self.issuer.clone(),
            iat: now,
            exp: now + self.lifetime_secs as i64,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| SessionError::TokenCreation(e.to_string()))?;

        Ok(SessionToken {
            token,
            expires_at: claims.expires_at(),
        })
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, SessionError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;
        validation.set_issuer(&[&self.issuer]);

        let data = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|_| SessionError::InvalidToken)?;
        Ok(data.claims)
    }
}
