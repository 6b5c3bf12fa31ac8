use serde::{Deserialize, Serialize};

pub const GOOGLE_ISSUER: &str = "https://accounts.google.com";

/// Token-endpoint response for the authorization-code grant.
#[derive(Debug, Clone, Deserialize)]
pub struct OidcTokenResponse {
    pub access_token: String,
    pub expires_in: Option<i64>,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
    pub token_type: Option<String>,
    pub id_token: Option<String>,
}

// The user data we get back from the userinfo endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleUserInfo {
    pub id: String,
    pub email: String,
    pub name: String,
    pub verified_email: Option<bool>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub picture: Option<String>,
    pub locale: Option<String>,
}

/// Claims returned by the token-introspection endpoint.
///
/// Google's tokeninfo endpoint renders numeric and boolean claims as
/// strings; only the claims this crate acts on are modeled.
#[derive(Debug, Clone, Deserialize)]
pub struct IdTokenInfo {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub email: String,
    pub azp: Option<String>,
    pub email_verified: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub exp: Option<String>,
    pub iat: Option<String>,
}

/// Canonical identity of a user at the external provider.
///
/// Produced only by [`crate::ProviderClient`] after a successful exchange
/// or verification; immutable for the rest of the flow.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalIdentity {
    pub external_id: String,
    pub email: String,
    pub display_name: String,
    pub picture_url: Option<String>,
    pub issuer: String,
}

impl From<GoogleUserInfo> for ExternalIdentity {
    fn from(info: GoogleUserInfo) -> Self {
        Self {
            external_id: info.id,
            email: info.email,
            display_name: info.name,
            picture_url: info.picture,
            issuer: GOOGLE_ISSUER.to_string(),
        }
    }
}

impl From<IdTokenInfo> for ExternalIdentity {
    fn from(info: IdTokenInfo) -> Self {
        let display_name = info.name.unwrap_or_else(|| info.email.clone());
        Self {
            external_id: info.sub,
            email: info.email,
            display_name,
            picture_url: info.picture,
            issuer: info.iss,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_google_user_info_deserialization() {
        let json_data = json!({
            "id": "123456789",
            "email": "test@example.com",
            "verified_email": true,
            "name": "Test User",
            "given_name": "Test",
            "family_name": "User",
            "picture": "https://example.com/pic.jpg",
            "locale": "en"
        });

        let user_info: GoogleUserInfo = serde_json::from_value(json_data).unwrap();
        assert_eq!(user_info.email, "test@example.com");
        assert_eq!(user_info.name, "Test User");
    }

    #[test]
    fn test_google_user_info_missing_required_fields() {
        let json_data = json!({
            "id": "123456789",
            "picture": "https://example.com/pic.jpg"
        });

        let user_info: Result<GoogleUserInfo, _> = serde_json::from_value(json_data);
        assert!(user_info.is_err());
    }

    #[test]
    fn test_oidc_token_response_without_id_token() {
        let json_data = json!({
            "access_token": "ya29.access_token_value",
            "expires_in": 3599,
            "scope": "openid email profile",
            "token_type": "Bearer"
        });

        let response: OidcTokenResponse = serde_json::from_value(json_data).unwrap();
        assert_eq!(response.access_token, "ya29.access_token_value");
        assert!(response.id_token.is_none());
    }

    #[test]
    fn test_id_token_info_string_rendered_claims() {
        let json_data = json!({
            "iss": "https://accounts.google.com",
            "sub": "110248495921238986420",
            "aud": "client-id.apps.googleusercontent.com",
            "email": "a@x.com",
            "email_verified": "true",
            "exp": "1609462800",
            "iat": "1609459200"
        });

        let info: IdTokenInfo = serde_json::from_value(json_data).unwrap();
        assert_eq!(info.aud, "client-id.apps.googleusercontent.com");
        assert_eq!(info.email_verified.as_deref(), Some("true"));
    }

    #[test]
    fn test_external_identity_from_userinfo() {
        let info = GoogleUserInfo {
            id: "123".to_string(),
            email: "a@x.com".to_string(),
            name: "A".to_string(),
            verified_email: Some(true),
            given_name: None,
            family_name: None,
            picture: Some("https://example.com/pic.jpg".to_string()),
            locale: None,
        };

        let identity = ExternalIdentity::from(info);
        assert_eq!(identity.external_id, "123");
        assert_eq!(identity.issuer, GOOGLE_ISSUER);
    }

    #[test]
    fn test_external_identity_from_tokeninfo_falls_back_to_email() {
        let info = IdTokenInfo {
            iss: GOOGLE_ISSUER.to_string(),
            sub: "456".to_string(),
            aud: "client-id".to_string(),
            email: "b@x.com".to_string(),
            azp: None,
            email_verified: None,
            name: None,
            picture: None,
            exp: None,
            iat: None,
        };

        let identity = ExternalIdentity::from(info);
        assert_eq!(identity.display_name, "b@x.com");
    }
}
