//! HS256 bearer token issuance and verification.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use stockroom_core::UserId;

use crate::claims::{validate_claims, AuthClaims};
use crate::Role;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("No token, authorization denied")]
    MissingToken,

    #[error("Token is not valid")]
    InvalidToken,

    #[error("token issuance failed: {0}")]
    Issuance(String),
}

/// Symmetric token codec shared by the login operation and the request gate.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a token embedding `{user_id, role}` with the fixed TTL.
    pub fn issue(&self, user_id: UserId, role: Role, now: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = AuthClaims::new(user_id, role, now);
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Issuance(e.to_string()))
    }

    /// Resolve an opaque token to its claims.
    ///
    /// Signature failures and malformed tokens collapse into `InvalidToken`;
    /// expiry is checked against the supplied `now` (deterministic in tests)
    /// rather than the decoder's clock.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<AuthClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let data = jsonwebtoken::decode::<AuthClaims>(token, &self.decoding, &validation)
            .map_err(|_| AuthError::InvalidToken)?;

        validate_claims(&data.claims, now).map_err(|_| AuthError::InvalidToken)?;
        Ok(data.claims)
    }
}
