//! Authentication utilities library
//!
//! Provides reusable authentication infrastructure for services:
//! - Password hashing (Argon2id, configurable cost)
//! - Signed, time-bounded bearer tokens (HMAC-SHA256)
//! - Authentication coordination on top of both
//!
//! Each service defines its own authentication traits and adapts these implementations.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! ```
//!
//! ## Bearer Tokens
//! ```
//! use auth::TokenCodec;
//! use chrono::Duration;
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(1));
//! let token = codec.issue("user123", "alice").unwrap();
//! let payload = codec.verify(&token).unwrap();
//! assert_eq!(payload.sub, "user123");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{AuthSettings, Authenticator, HashingCost};
//! use chrono::Duration;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let settings = AuthSettings::new(
//!     "secret_key_at_least_32_bytes_long!",
//!     Duration::hours(1),
//!     HashingCost::default(),
//! )
//! .unwrap();
//! let auth = Authenticator::new(&settings);
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").await.unwrap();
//!
//! // Login: verify and issue token
//! assert!(auth.verify_password("password123", &hash).await.unwrap());
//! let token = auth.issue_token("user123", "alice").unwrap();
//!
//! // Validate token
//! let payload = auth.validate_token(&token).unwrap();
//! assert_eq!(payload.username, "alice");
//! # });
//! ```

pub mod authenticator;
pub mod password;
pub mod settings;
pub mod token;

// Re-export commonly used items
pub use authenticator::Authenticator;
pub use password::HashingCost;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use settings::AuthSettings;
pub use settings::SettingsError;
pub use token::TokenCodec;
pub use token::TokenError;
pub use token::TokenPayload;
