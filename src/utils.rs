use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use ring::rand::SecureRandom;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum UtilError {
    #[error("Crypto error: {0}")]
    Crypto(String),
}

/// Generate `len` random bytes from the system CSPRNG, base64url-encoded.
///
/// 32 bytes gives the 256 bits of entropy required for anti-forgery state.
pub fn gen_random_string(len: usize) -> Result<String, UtilError> {
    let rng = ring::rand::SystemRandom::new();
    let mut bytes = vec![0u8; len];
    rng.fill(&mut bytes)
        .map_err(|_| UtilError::Crypto("Failed to generate random bytes".to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}
