mod client;
mod errors;
mod http;
mod types;

pub use client::{ProviderClient, ProviderTokens};
pub use errors::OAuth2Error;
pub use http::{HttpIdentityProvider, IdentityProvider};
pub use types::{GOOGLE_ISSUER, ExternalIdentity, GoogleUserInfo, IdTokenInfo, OidcTokenResponse};
