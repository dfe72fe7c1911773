use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::TokenError;

/// Signed content of a bearer token.
///
/// Field names follow the registered JWT claim names. Timestamps are Unix
/// seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenPayload {
    /// Subject (identity identifier)
    pub sub: String,

    /// Username of the subject at issue time
    pub username: String,

    /// Issued at
    pub iat: i64,

    /// Expiration time
    pub exp: i64,
}

impl TokenPayload {
    /// Create a payload issued at `now` and valid for `ttl`.
    ///
    /// # Errors
    /// * `EncodingFailed` - `now + ttl` is outside the representable range
    pub fn new(
        subject: impl ToString,
        username: impl Into<String>,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, TokenError> {
        let expires_at = now.checked_add_signed(ttl).ok_or_else(|| {
            TokenError::EncodingFailed(format!("expiry out of range for ttl {}", ttl))
        })?;

        Ok(Self {
            sub: subject.to_string(),
            username: username.into(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        })
    }

    /// Check if the token is expired.
    ///
    /// A token is still valid during the second named by `exp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp > self.exp
    }
}
