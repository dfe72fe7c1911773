use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::create_user::UserData;
use super::ApiError;
use super::ApiSuccess;
use crate::access::models::AuthenticatedContext;
use crate::inbound::http::router::AppState;

pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(context): Extension<AuthenticatedContext>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    state
        .user_service
        .get_user(&context.user_id)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

pub async fn delete_current_user(
    State(state): State<AppState>,
    Extension(context): Extension<AuthenticatedContext>,
) -> Result<StatusCode, ApiError> {
    state
        .user_service
        .delete_user(&context.user_id)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::NO_CONTENT)
}
