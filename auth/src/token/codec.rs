use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use hmac::Hmac;
use hmac::Mac;
use sha2::Sha256;

use super::errors::TokenError;
use super::payload::TokenPayload;

type HmacSha256 = Hmac<Sha256>;

/// Bearer token codec.
///
/// Tokens are `base64url(payload JSON) "." base64url(HMAC-SHA256(payload JSON))`,
/// both parts unpadded. Nothing about issued tokens is stored: a token is valid
/// as long as its signature matches and it has not expired.
#[derive(Clone)]
pub struct TokenCodec {
    secret: Vec<u8>,
    ttl: Duration,
}

impl TokenCodec {
    /// Create a codec signing with `secret` and issuing tokens valid for `ttl`.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes)
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            secret: secret.to_vec(),
            ttl,
        }
    }

    /// Lifetime of issued tokens.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Issue a token for an identity, valid from now for the configured TTL.
    ///
    /// # Errors
    /// * `EncodingFailed` - Payload serialization or signing failed
    pub fn issue(&self, subject: impl ToString, username: &str) -> Result<String, TokenError> {
        self.issue_at(subject, username, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        subject: impl ToString,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let payload = TokenPayload::new(subject, username, now, self.ttl)?;
        self.encode(&payload)
    }

    /// Sign an arbitrary payload.
    ///
    /// # Errors
    /// * `EncodingFailed` - Payload serialization or signing failed
    pub fn encode(&self, payload: &TokenPayload) -> Result<String, TokenError> {
        let payload_bytes =
            serde_json::to_vec(payload).map_err(|e| TokenError::EncodingFailed(e.to_string()))?;

        let mut mac = self.mac()?;
        mac.update(&payload_bytes);
        let signature = mac.finalize().into_bytes();

        Ok(format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(&payload_bytes),
            URL_SAFE_NO_PAD.encode(signature)
        ))
    }

    /// Verify a token against the current time.
    ///
    /// # Returns
    /// Decoded payload
    ///
    /// # Errors
    /// * `Malformed` - Token is not two base64url segments carrying a payload
    /// * `InvalidSignature` - Signature does not match the payload
    /// * `Expired` - Current time is past `exp`
    pub fn verify(&self, token: &str) -> Result<TokenPayload, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenPayload, TokenError> {
        let (encoded_payload, encoded_signature) = token
            .split_once('.')
            .ok_or_else(|| TokenError::Malformed("missing signature segment".to_string()))?;

        if encoded_payload.is_empty()
            || encoded_signature.is_empty()
            || encoded_signature.contains('.')
        {
            return Err(TokenError::Malformed("unexpected segment count".to_string()));
        }

        let payload_bytes = URL_SAFE_NO_PAD
            .decode(encoded_payload)
            .map_err(|e| TokenError::Malformed(format!("payload: {}", e)))?;
        let signature = URL_SAFE_NO_PAD
            .decode(encoded_signature)
            .map_err(|e| TokenError::Malformed(format!("signature: {}", e)))?;

        let mut mac = self.mac()?;
        mac.update(&payload_bytes);
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::InvalidSignature)?;

        let payload: TokenPayload = serde_json::from_slice(&payload_bytes)
            .map_err(|e| TokenError::Malformed(format!("payload: {}", e)))?;

        if payload.is_expired(now.timestamp()) {
            return Err(TokenError::Expired);
        }

        Ok(payload)
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}
