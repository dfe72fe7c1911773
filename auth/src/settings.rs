use std::fmt;

use chrono::Duration;
use thiserror::Error;

use crate::password::HashingCost;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Error for invalid authentication settings.
#[derive(Debug, Clone, Error)]
pub enum SettingsError {
    #[error("Signing secret too short: minimum {min} bytes, got {actual}")]
    SecretTooShort { min: usize, actual: usize },

    #[error("Token lifetime must be positive and at most one year, got {0} seconds")]
    InvalidTokenTtl(i64),

    #[error("Invalid hashing cost: {0}")]
    HashingCost(#[from] PasswordError),
}

/// Process-wide authentication settings.
///
/// Built once at start-up and shared read-only by every component that signs,
/// verifies or hashes. The secret is never printed by `Debug`.
#[derive(Clone)]
pub struct AuthSettings {
    secret: Vec<u8>,
    token_ttl: Duration,
    password_hasher: PasswordHasher,
}

impl AuthSettings {
    pub const MIN_SECRET_LENGTH: usize = 32;
    pub const MAX_TOKEN_TTL_SECONDS: i64 = 365 * 24 * 60 * 60;

    /// Validate and build settings.
    ///
    /// # Arguments
    /// * `secret` - Token signing secret, at least 32 bytes
    /// * `token_ttl` - Lifetime of issued tokens
    /// * `hashing_cost` - Argon2 work parameters
    ///
    /// # Errors
    /// * `SecretTooShort` - Secret is shorter than 32 bytes
    /// * `InvalidTokenTtl` - TTL is zero, negative or longer than one year
    /// * `HashingCost` - Argon2 rejected the parameters
    pub fn new(
        secret: impl Into<Vec<u8>>,
        token_ttl: Duration,
        hashing_cost: HashingCost,
    ) -> Result<Self, SettingsError> {
        let secret = secret.into();
        if secret.len() < Self::MIN_SECRET_LENGTH {
            return Err(SettingsError::SecretTooShort {
                min: Self::MIN_SECRET_LENGTH,
                actual: secret.len(),
            });
        }

        if token_ttl <= Duration::zero()
            || token_ttl > Duration::seconds(Self::MAX_TOKEN_TTL_SECONDS)
        {
            return Err(SettingsError::InvalidTokenTtl(token_ttl.num_seconds()));
        }

        Ok(Self {
            secret,
            token_ttl,
            password_hasher: PasswordHasher::with_cost(hashing_cost)?,
        })
    }

    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    pub fn password_hasher(&self) -> &PasswordHasher {
        &self.password_hasher
    }
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("password_hasher", &self.password_hasher)
            .finish()
    }
}
