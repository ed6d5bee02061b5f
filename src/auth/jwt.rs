//! JWT token verification
//!
//! Verifies tokens issued by the calling platform and extracts the upstream
//! API key they carry.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::error::RelayError;

/// Claim set the relay relies on
///
/// Only `key` is required; any other claims the platform adds are ignored.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Upstream API key for this caller
    pub key: String,
}

pub struct JwtService {
    decoding_key: DecodingKey,
    validation: Validation,
}

// Custom Debug implementation to hide sensitive keys
impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService").field("decoding_key", &"<hidden>").finish()
    }
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        // exp and nbf are still checked when the platform sets them
        validation.required_spec_claims.clear();
        validation.validate_aud = false;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verify the signature and decode the claim set
    pub fn get_claims(&self, token: &str) -> Result<Claims, RelayError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| {
                log::warn!("Rejected inbound token: {}", e);
                RelayError::authorization_failed()
            })?;

        if claims.key.is_empty() {
            log::warn!("Rejected inbound token: empty key claim");
            return Err(RelayError::authorization_failed());
        }

        Ok(claims)
    }
}
