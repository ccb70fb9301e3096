// Token codec
//
// HS256-signed claims with a bounded validity window. Tokens are stateless:
// there is no revocation list, and possession of a valid, unexpired token is
// sufficient proof of identity until natural expiry. Rotating the secret
// invalidates everything outstanding.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Identity claims carried inside a bearer token. Never mutated after issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Owning user id
    pub sub: Uuid,
    pub email: String,
    /// Issued-at, seconds since epoch
    pub iat: i64,
    /// Expiry, seconds since epoch
    pub exp: i64,
}

/// Token validation failures. Signature problems are detected before the
/// expiry check ever runs, so a forged-but-stale token reads as forged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("token signature invalid")]
    SignatureInvalid,
    #[error("token malformed")]
    Malformed,
}

pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: chrono::Duration,
}

impl TokenCodec {
    pub fn new(secret: &str, lifetime: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            lifetime: chrono::Duration::from_std(lifetime)
                .unwrap_or_else(|_| chrono::Duration::hours(24)),
        }
    }

    /// Encode claims for `user_id`, valid from `now` for the configured
    /// lifetime.
    pub fn issue(&self, user_id: Uuid, email: &str, now: DateTime<Utc>) -> anyhow::Result<String> {
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Verify the signature, then check the validity window against `now`
    /// (the caller's wall clock; skew is not compensated).
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below against the caller-supplied clock.
        validation.validate_exp = false;

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|err| {
            match err.kind() {
                ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
                _ => TokenError::Malformed,
            }
        })?;

        if data.claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }
        Ok(data.claims)
    }
}
