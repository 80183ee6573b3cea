//! JWT issuance and verification (HS256, process-wide secret).

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use trackline_core::UserId;

/// Claims carried by an access token: the subject id and expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the authenticated user's id.
    pub sub: i64,
    /// Expiry as unix seconds.
    pub exp: i64,
}

impl Claims {
    pub fn subject(&self) -> UserId {
        UserId::new(self.sub)
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to encode token: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),

    /// Bad signature, malformed claims, or expired.
    #[error("invalid token")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

/// Signs and verifies access tokens with a single shared secret.
///
/// Constructed once at startup from configuration and injected wherever
/// tokens are minted or checked.
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_minutes: i64,
}

impl TokenSigner {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_minutes,
        }
    }

    /// Token lifetime in minutes, echoed in the login response.
    pub fn ttl_minutes(&self) -> i64 {
        self.ttl_minutes
    }

    /// Mint a token for the given subject, expiring `ttl_minutes` from now.
    pub fn issue(&self, subject: UserId) -> Result<String, TokenError> {
        let expires_at = Utc::now() + Duration::minutes(self.ttl_minutes);
        let claims = Claims {
            sub: subject.as_i64(),
            exp: expires_at.timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(TokenError::Encode)
    }

    /// Decode and verify a token, including its expiry.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }
}
