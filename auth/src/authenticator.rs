use tokio::task;

use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::settings::AuthSettings;
use crate::token::TokenCodec;
use crate::token::TokenError;
use crate::token::TokenPayload;

/// Authentication coordinator combining password hashing and token handling.
///
/// Password work is CPU-bound and runs on the blocking thread pool, so the
/// async methods here never stall the executor while a hash is computed.
#[derive(Debug, Clone)]
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_codec: TokenCodec,
}

impl Authenticator {
    /// Create a new authenticator from validated settings.
    pub fn new(settings: &AuthSettings) -> Self {
        Self {
            password_hasher: settings.password_hasher().clone(),
            token_codec: TokenCodec::new(settings.secret(), settings.token_ttl()),
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `HashingFailed` - Hashing operation failed
    /// * `WorkerFailed` - The blocking task panicked or was cancelled
    pub async fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        let hasher = self.password_hasher.clone();
        let password = password.to_owned();

        task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| PasswordError::WorkerFailed(e.to_string()))?
    }

    /// Verify a password against a stored hash.
    ///
    /// # Returns
    /// True if the password matches; false on mismatch or a malformed hash
    ///
    /// # Errors
    /// * `WorkerFailed` - The blocking task panicked or was cancelled
    pub async fn verify_password(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<bool, PasswordError> {
        let hasher = self.password_hasher.clone();
        let password = password.to_owned();
        let stored_hash = stored_hash.to_owned();

        task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .map_err(|e| PasswordError::WorkerFailed(e.to_string()))
    }

    /// Issue a bearer token for an identity.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token generation failed
    pub fn issue_token(&self, subject: impl ToString, username: &str) -> Result<String, TokenError> {
        self.token_codec.issue(subject, username)
    }

    /// Validate and decode a bearer token.
    ///
    /// # Errors
    /// * `Malformed`, `InvalidSignature`, `Expired` - see [`TokenCodec::verify`]
    pub fn validate_token(&self, token: &str) -> Result<TokenPayload, TokenError> {
        self.token_codec.verify(token)
    }

    pub fn token_codec(&self) -> &TokenCodec {
        &self.token_codec
    }
}
