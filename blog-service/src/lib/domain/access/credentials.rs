use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use tokio::sync::OnceCell;

use super::errors::AuthError;
use super::models::AuthResult;
use super::models::AuthenticatedContext;
use super::models::LoginCredentials;
use super::ports::AuthStrategy;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;

const DECOY_PASSWORD: &str = "decoy-password-for-unknown-users";

/// Username/password strategy used at login.
///
/// Looks the user up once and verifies the password once. Unknown usernames
/// are verified against a decoy hash so both failures cost the same. Nothing
/// about the caller is kept between calls; the caller turns a success into a
/// token.
pub struct CredentialVerifier<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    decoy_hash: OnceCell<String>,
}

impl<UR> CredentialVerifier<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
            decoy_hash: OnceCell::new(),
        }
    }

    /// Run one password verification whose outcome is discarded.
    async fn verify_decoy(&self, password: &str) -> Result<(), AuthError> {
        let decoy_hash = self
            .decoy_hash
            .get_or_try_init(|| self.authenticator.hash_password(DECOY_PASSWORD))
            .await?;

        self.authenticator
            .verify_password(password, decoy_hash)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl<UR> AuthStrategy for CredentialVerifier<UR>
where
    UR: UserRepository,
{
    type Credentials = LoginCredentials;

    async fn authenticate(&self, credentials: &LoginCredentials) -> AuthResult {
        // A name that fails validation cannot belong to anyone
        let username = match Username::new(credentials.username.clone()) {
            Ok(username) => username,
            Err(_) => {
                self.verify_decoy(&credentials.password).await?;
                return Err(AuthError::UnknownUser);
            }
        };

        let user = self
            .repository
            .find_by_username(&username)
            .await
            .map_err(|e| AuthError::Internal(format!("Identity lookup failed: {}", e)))?;

        let Some(user) = user else {
            self.verify_decoy(&credentials.password).await?;
            return Err(AuthError::UnknownUser);
        };

        let matches = self
            .authenticator
            .verify_password(&credentials.password, &user.password_hash)
            .await?;

        if !matches {
            return Err(AuthError::BadCredentials);
        }

        Ok(AuthenticatedContext::from(&user))
    }
}

#[cfg(test)]
mod tests {
    use auth::AuthSettings;
    use auth::HashingCost;
    use chrono::Utc;
    use mockall::mock;

    use super::*;
    use crate::domain::user::errors::UserError;
    use crate::domain::user::models::User;
    use crate::domain::user::models::UserId;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;
            async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, UserError>;
            async fn delete(&self, id: &UserId) -> Result<(), UserError>;
        }
    }

    fn authenticator() -> Arc<Authenticator> {
        let cost = HashingCost {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        };
        let settings = AuthSettings::new(
            "test-secret-key-for-token-signing-32b",
            chrono::Duration::hours(1),
            cost,
        )
        .unwrap();
        Arc::new(Authenticator::new(&settings))
    }

    async fn alice(authenticator: &Authenticator) -> User {
        User {
            id: UserId::new(),
            username: Username::new("alice".to_string()).unwrap(),
            password_hash: authenticator.hash_password("correct").await.unwrap(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let authenticator = authenticator();
        let user = alice(&authenticator).await;
        let user_id = user.id;

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .withf(|username| username.as_str() == "alice")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let verifier = CredentialVerifier::new(Arc::new(repository), authenticator);

        let context = verifier
            .authenticate(&LoginCredentials::new("alice", "correct"))
            .await
            .expect("Authentication should succeed");

        assert_eq!(context.user_id, user_id);
        assert_eq!(context.username.as_str(), "alice");
    }

    #[tokio::test]
    async fn test_authenticate_bad_credentials() {
        let authenticator = authenticator();
        let user = alice(&authenticator).await;

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let verifier = CredentialVerifier::new(Arc::new(repository), authenticator);

        let result = verifier
            .authenticate(&LoginCredentials::new("alice", "wrong"))
            .await;

        assert_eq!(result, Err(AuthError::BadCredentials));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_user() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));

        let verifier = CredentialVerifier::new(Arc::new(repository), authenticator());

        let result = verifier
            .authenticate(&LoginCredentials::new("nobody", "correct"))
            .await;

        assert_eq!(result, Err(AuthError::UnknownUser));
        // Unknown users pay for a password verification too
        assert!(verifier.decoy_hash.get().is_some());
    }

    #[tokio::test]
    async fn test_authenticate_invalid_username_skips_lookup() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_find_by_username().times(0);

        let verifier = CredentialVerifier::new(Arc::new(repository), authenticator());

        let result = verifier
            .authenticate(&LoginCredentials::new("a b", "correct"))
            .await;

        assert_eq!(result, Err(AuthError::UnknownUser));
        assert!(verifier.decoy_hash.get().is_some());
    }

    #[tokio::test]
    async fn test_known_user_does_not_build_decoy() {
        let authenticator = authenticator();
        let user = alice(&authenticator).await;

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let verifier = CredentialVerifier::new(Arc::new(repository), authenticator);

        let result = verifier
            .authenticate(&LoginCredentials::new("alice", "wrong"))
            .await;

        assert_eq!(result, Err(AuthError::BadCredentials));
        assert!(verifier.decoy_hash.get().is_none());
    }

    #[tokio::test]
    async fn test_authenticate_malformed_stored_hash() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_find_by_username().times(1).returning(|_| {
            Ok(Some(User {
                id: UserId::new(),
                username: Username::new("alice".to_string()).unwrap(),
                password_hash: "not-a-phc-string".to_string(),
                created_at: Utc::now(),
            }))
        });

        let verifier = CredentialVerifier::new(Arc::new(repository), authenticator());

        let result = verifier
            .authenticate(&LoginCredentials::new("alice", "correct"))
            .await;

        assert_eq!(result, Err(AuthError::BadCredentials));
    }

    #[tokio::test]
    async fn test_authenticate_repository_failure() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Err(UserError::DatabaseError("connection refused".to_string())));

        let verifier = CredentialVerifier::new(Arc::new(repository), authenticator());

        let result = verifier
            .authenticate(&LoginCredentials::new("alice", "correct"))
            .await;

        assert!(matches!(result, Err(AuthError::Internal(_))));
    }
}
