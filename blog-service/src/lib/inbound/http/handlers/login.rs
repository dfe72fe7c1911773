use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::access::errors::AuthError;
use crate::access::models::AuthenticatedContext;
use crate::access::models::LoginCredentials;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<LoginCredentials>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let context = state
        .credential_verifier
        .authenticate(&credentials)
        .await
        .map_err(|e| {
            tracing::info!(username = %credentials.username, reason = %e, "Credential verification failed");
            ApiError::from(e)
        })?;

    let token = state
        .authenticator
        .issue_token(context.user_id, context.username.as_str())
        .map_err(AuthError::from)?;

    tracing::info!(user_id = %context.user_id, "Login succeeded");

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData {
            message: "Login successful".to_string(),
            token,
            user: (&context).into(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub message: String,
    pub token: String,
    pub user: LoginUserData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginUserData {
    pub id: String,
    pub username: String,
}

impl From<&AuthenticatedContext> for LoginUserData {
    fn from(context: &AuthenticatedContext) -> Self {
        Self {
            id: context.user_id.to_string(),
            username: context.username.as_str().to_string(),
        }
    }
}
