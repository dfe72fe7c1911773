use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use http::header;
use http::HeaderMap;

use super::errors::AuthError;
use super::models::AuthResult;
use super::models::AuthenticatedContext;
use super::ports::AuthStrategy;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;

/// Bearer token strategy used on protected requests.
///
/// Every call verifies the token and re-reads its subject from the repository,
/// so a deleted account stops authenticating even while its tokens are
/// unexpired. Validated tokens are not cached.
pub struct RequestAuthenticator<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> RequestAuthenticator<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively. A missing header, a header that
/// is not valid text or a different scheme all count as no token.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    match value.trim().split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => Ok(token.trim()),
        _ => Err(AuthError::MissingToken),
    }
}

#[async_trait]
impl<UR> AuthStrategy for RequestAuthenticator<UR>
where
    UR: UserRepository,
{
    type Credentials = HeaderMap;

    async fn authenticate(&self, headers: &HeaderMap) -> AuthResult {
        let token = extract_bearer_token(headers)?;

        let payload = self.authenticator.validate_token(token)?;

        let user_id = UserId::from_string(&payload.sub)
            .map_err(|e| AuthError::MalformedToken(format!("subject: {}", e)))?;

        let user = self
            .repository
            .find_by_id(&user_id)
            .await
            .map_err(|e| AuthError::Internal(format!("Identity lookup failed: {}", e)))?
            .ok_or_else(|| AuthError::UnknownSubject(payload.sub.clone()))?;

        Ok(AuthenticatedContext::from(&user))
    }
}

#[cfg(test)]
mod tests {
    use auth::AuthSettings;
    use auth::HashingCost;
    use auth::TokenPayload;
    use chrono::Duration;
    use chrono::Utc;
    use http::HeaderValue;
    use mockall::mock;

    use super::*;
    use crate::domain::user::errors::UserError;
    use crate::domain::user::models::User;
    use crate::domain::user::models::Username;

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
        let settings = AuthSettings::new(
            "test-secret-key-for-token-signing-32b",
            Duration::hours(1),
            HashingCost::default(),
        )
        .unwrap();
        Arc::new(Authenticator::new(&settings))
    }

    fn alice() -> User {
        User {
            id: UserId::new(),
            username: Username::new("alice".to_string()).unwrap(),
            password_hash: "$argon2id$test_hash".to_string(),
            created_at: Utc::now(),
        }
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        headers
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token(&bearer("abc.def")), Ok("abc.def"));

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("bearer abc.def"));
        assert_eq!(extract_bearer_token(&headers), Ok("abc.def"));
    }

    #[test]
    fn test_extract_bearer_token_missing() {
        assert_eq!(
            extract_bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingToken)
        );

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));
        assert_eq!(extract_bearer_token(&headers), Err(AuthError::MissingToken));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer"));
        assert_eq!(extract_bearer_token(&headers), Err(AuthError::MissingToken));
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let authenticator = authenticator();
        let user = alice();
        let user_id = user.id;
        let token = authenticator
            .issue_token(user.id, user.username.as_str())
            .unwrap();

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_id()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let strategy = RequestAuthenticator::new(Arc::new(repository), authenticator);

        let context = strategy
            .authenticate(&bearer(&token))
            .await
            .expect("Authentication should succeed");

        assert_eq!(context.user_id, user_id);
        assert_eq!(context.username.as_str(), "alice");
    }

    #[tokio::test]
    async fn test_authenticate_missing_token() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_find_by_id().times(0);

        let strategy = RequestAuthenticator::new(Arc::new(repository), authenticator());

        let result = strategy.authenticate(&HeaderMap::new()).await;
        assert_eq!(result, Err(AuthError::MissingToken));
    }

    #[tokio::test]
    async fn test_authenticate_expired_token() {
        let authenticator = authenticator();
        let token = authenticator
            .token_codec()
            .issue_at(UserId::new(), "alice", Utc::now() - Duration::hours(2))
            .unwrap();

        let mut repository = MockTestUserRepository::new();
        repository.expect_find_by_id().times(0);

        let strategy = RequestAuthenticator::new(Arc::new(repository), authenticator);

        let result = strategy.authenticate(&bearer(&token)).await;
        assert_eq!(result, Err(AuthError::Expired));
    }

    #[tokio::test]
    async fn test_authenticate_foreign_signature() {
        let other = auth::TokenCodec::new(b"another-secret-key-of-at-least-32-bytes", Duration::hours(1));
        let token = other.issue(UserId::new(), "alice").unwrap();

        let mut repository = MockTestUserRepository::new();
        repository.expect_find_by_id().times(0);

        let strategy = RequestAuthenticator::new(Arc::new(repository), authenticator());

        let result = strategy.authenticate(&bearer(&token)).await;
        assert_eq!(result, Err(AuthError::InvalidSignature));
    }

    #[tokio::test]
    async fn test_authenticate_malformed_token() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_find_by_id().times(0);

        let strategy = RequestAuthenticator::new(Arc::new(repository), authenticator());

        let result = strategy.authenticate(&bearer("not-a-token")).await;
        assert!(matches!(result, Err(AuthError::MalformedToken(_))));
    }

    #[tokio::test]
    async fn test_authenticate_non_uuid_subject() {
        let authenticator = authenticator();
        let payload = TokenPayload::new("42", "alice", Utc::now(), Duration::hours(1)).unwrap();
        let token = authenticator.token_codec().encode(&payload).unwrap();

        let mut repository = MockTestUserRepository::new();
        repository.expect_find_by_id().times(0);

        let strategy = RequestAuthenticator::new(Arc::new(repository), authenticator);

        let result = strategy.authenticate(&bearer(&token)).await;
        assert!(matches!(result, Err(AuthError::MalformedToken(_))));
    }

    #[tokio::test]
    async fn test_authenticate_deleted_subject() {
        let authenticator = authenticator();
        let user_id = UserId::new();
        let token = authenticator.issue_token(user_id, "alice").unwrap();

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let strategy = RequestAuthenticator::new(Arc::new(repository), authenticator);

        let result = strategy.authenticate(&bearer(&token)).await;
        assert_eq!(result, Err(AuthError::UnknownSubject(user_id.to_string())));
    }

    #[tokio::test]
    async fn test_authenticate_repository_failure() {
        let authenticator = authenticator();
        let token = authenticator.issue_token(UserId::new(), "alice").unwrap();

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Err(UserError::DatabaseError("connection refused".to_string())));

        let strategy = RequestAuthenticator::new(Arc::new(repository), authenticator);

        let result = strategy.authenticate(&bearer(&token)).await;
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }
}
