use auth::TokenError;
use thiserror::Error;

/// Reasons an authentication or authorization check fails.
///
/// The variants are for logging and tests. Callers only ever see the coarse
/// outcome: `UnknownUser` and `BadCredentials` both read "login failed", the
/// token variants read "unauthorized", `OwnershipMismatch` reads "forbidden".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Unknown user")]
    UnknownUser,

    #[error("Bad credentials")]
    BadCredentials,

    #[error("Missing bearer token")]
    MissingToken,

    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    #[error("Token subject no longer exists: {0}")]
    UnknownSubject(String),

    #[error("Authenticated identity does not own the resource")]
    OwnershipMismatch,

    #[error("Internal failure: {0}")]
    Internal(String),
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed(reason) => AuthError::MalformedToken(reason),
            TokenError::InvalidSignature => AuthError::InvalidSignature,
            TokenError::Expired => AuthError::Expired,
            TokenError::EncodingFailed(reason) => AuthError::Internal(reason),
        }
    }
}

impl From<auth::PasswordError> for AuthError {
    fn from(err: auth::PasswordError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
