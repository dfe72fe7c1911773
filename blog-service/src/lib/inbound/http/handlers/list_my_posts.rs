use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::create_post::PostData;
use super::ApiError;
use super::ApiSuccess;
use crate::access::models::AuthenticatedContext;
use crate::inbound::http::router::AppState;

pub async fn list_my_posts(
    State(state): State<AppState>,
    Extension(context): Extension<AuthenticatedContext>,
) -> Result<ApiSuccess<Vec<PostData>>, ApiError> {
    state
        .post_service
        .list_by_owner(&context.user_id)
        .await
        .map_err(ApiError::from)
        .map(|posts| ApiSuccess::new(StatusCode::OK, posts.iter().map(PostData::from).collect()))
}
