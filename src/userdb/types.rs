use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::UserError;

/// Which login method owns a user row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Google,
    Local,
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Google => "google",
            AuthProvider::Local => "local",
        }
    }
}

impl fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthProvider {
    type Err = UserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(AuthProvider::Google),
            "local" => Ok(AuthProvider::Local),
            other => Err(UserError::Storage(format!("Unknown auth provider: {other}"))),
        }
    }
}

/// A local user record.
///
/// Email is the natural key: one row per email regardless of which login
/// method created it. Created on first successful external login; display
/// name, picture, provider, and last_login_at are refreshed on every
/// subsequent login. Never deleted by this crate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub picture_url: Option<String>,
    pub provider: AuthProvider,
    /// Argon2id PHC string; present only for provider = local.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_provider_round_trips_through_str() {
        for provider in [AuthProvider::Google, AuthProvider::Local] {
            assert_eq!(provider.as_str().parse::<AuthProvider>().unwrap(), provider);
        }
    }

    #[test]
    fn test_auth_provider_rejects_unknown_name() {
        assert!("github".parse::<AuthProvider>().is_err());
    }

    #[test]
    fn test_user_serialization_omits_absent_password_hash() {
        let user = User {
            id: "u1".to_string(),
            email: "a@x.com".to_string(),
            display_name: "A".to_string(),
            picture_url: None,
            provider: AuthProvider::Google,
            password_hash: None,
            created_at: Utc::now(),
            last_login_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(json.contains("\"provider\":\"google\""));
    }
}
