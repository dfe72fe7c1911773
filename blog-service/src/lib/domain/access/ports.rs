use async_trait::async_trait;

use super::models::AuthResult;

/// A way of turning credentials into an authenticated identity.
///
/// Failures are returned as values; an implementation never panics on bad
/// input and never retries.
#[async_trait]
pub trait AuthStrategy: Send + Sync + 'static {
    /// What the caller presents, e.g. login credentials or request headers.
    type Credentials: Send + Sync + ?Sized;

    /// Authenticate the presented credentials.
    ///
    /// # Returns
    /// The authenticated identity, or the reason it could not be established
    async fn authenticate(&self, credentials: &Self::Credentials) -> AuthResult;
}
