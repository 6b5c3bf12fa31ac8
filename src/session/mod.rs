mod errors;
mod token;

pub use errors::SessionError;
pub use token::{SessionClaims, SessionToken, TokenIssuer};
