use std::fmt;

use serde::Deserialize;

use super::errors::AuthError;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;

/// Identity attached to one authenticated request.
///
/// A sanitized view of [`User`]: it never carries the password hash and is
/// dropped with the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedContext {
    pub user_id: UserId,
    pub username: Username,
}

impl From<&User> for AuthenticatedContext {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
        }
    }
}

/// Outcome of an authentication strategy.
pub type AuthResult = Result<AuthenticatedContext, AuthError>;

/// Username and password submitted at login.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
