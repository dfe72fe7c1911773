use std::future::Future;
use std::sync::Arc;

use super::errors::AuthError;
use super::models::AuthResult;
use super::models::AuthenticatedContext;
use super::ports::AuthStrategy;
use crate::domain::user::models::UserId;

/// Guard in front of protected operations.
///
/// The wrapped operation runs only once the strategy has authenticated the
/// caller, and receives the resulting identity. Ownership of a resource is
/// checked separately with [`ensure_owner`] once the resource is loaded.
pub struct AuthorizationGate<S>
where
    S: AuthStrategy + ?Sized,
{
    strategy: Arc<S>,
}

impl<S> AuthorizationGate<S>
where
    S: AuthStrategy + ?Sized,
{
    pub fn new(strategy: Arc<S>) -> Self {
        Self { strategy }
    }

    /// Authentication gate on its own.
    pub async fn authenticate(&self, credentials: &S::Credentials) -> AuthResult {
        self.strategy.authenticate(credentials).await
    }

    /// Run `operation` with the caller's identity if authentication succeeds.
    ///
    /// # Errors
    /// The strategy's [`AuthError`] converted into `E`, or whatever the
    /// operation itself returns
    pub async fn guard<F, Fut, T, E>(
        &self,
        credentials: &S::Credentials,
        operation: F,
    ) -> Result<T, E>
    where
        F: FnOnce(AuthenticatedContext) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<AuthError>,
    {
        let context = self.authenticate(credentials).await?;
        operation(context).await
    }
}

/// Ownership gate: the authenticated identity must be the recorded owner.
///
/// # Errors
/// * `OwnershipMismatch` - `owner_id` belongs to someone else
pub fn ensure_owner(context: &AuthenticatedContext, owner_id: &UserId) -> Result<(), AuthError> {
    if context.user_id == *owner_id {
        Ok(())
    } else {
        Err(AuthError::OwnershipMismatch)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;
    use std::sync::atomic::Ordering;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::user::models::Username;

    /// Strategy that accepts exactly one password.
    struct FixedStrategy {
        context: AuthenticatedContext,
    }

    #[async_trait]
    impl AuthStrategy for FixedStrategy {
        type Credentials = str;

        async fn authenticate(&self, credentials: &str) -> AuthResult {
            if credentials == "open sesame" {
                Ok(self.context.clone())
            } else {
                Err(AuthError::InvalidSignature)
            }
        }
    }

    fn context() -> AuthenticatedContext {
        AuthenticatedContext {
            user_id: UserId::new(),
            username: Username::new("alice".to_string()).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_guard_runs_operation_with_identity() {
        let expected = context();
        let gate = AuthorizationGate::new(Arc::new(FixedStrategy {
            context: expected.clone(),
        }));

        let result: Result<UserId, AuthError> = gate
            .guard("open sesame", |context| async move { Ok(context.user_id) })
            .await;

        assert_eq!(result, Ok(expected.user_id));
    }

    #[tokio::test]
    async fn test_guard_short_circuits_on_failure() {
        let gate = AuthorizationGate::new(Arc::new(FixedStrategy { context: context() }));
        let ran = AtomicBool::new(false);

        let result: Result<(), AuthError> = gate
            .guard("wrong", |_| async {
                ran.store(true, Ordering::SeqCst);
                Ok(())
            })
            .await;

        assert_eq!(result, Err(AuthError::InvalidSignature));
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_gate_over_trait_object() {
        let strategy: Arc<dyn AuthStrategy<Credentials = str>> =
            Arc::new(FixedStrategy { context: context() });
        let gate = AuthorizationGate::new(strategy);

        assert!(gate.authenticate("open sesame").await.is_ok());
        assert!(gate.authenticate("nope").await.is_err());
    }

    #[test]
    fn test_ensure_owner() {
        let context = context();

        assert_eq!(ensure_owner(&context, &context.user_id), Ok(()));
        assert_eq!(
            ensure_owner(&context, &UserId::new()),
            Err(AuthError::OwnershipMismatch)
        );
    }
}
