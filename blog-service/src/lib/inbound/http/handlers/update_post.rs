use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;

use super::create_post::PostData;
use super::create_post::PostRequestBody;
use super::ApiError;
use super::ApiSuccess;
use crate::access::models::AuthenticatedContext;
use crate::inbound::http::router::AppState;
use crate::post::errors::PostError;
use crate::post::models::PostId;
use crate::post::models::UpdatePostCommand;

pub async fn update_post(
    State(state): State<AppState>,
    Extension(context): Extension<AuthenticatedContext>,
    Path(post_id): Path<String>,
    Json(body): Json<PostRequestBody>,
) -> Result<ApiSuccess<PostData>, ApiError> {
    let post_id = PostId::from_string(&post_id).map_err(PostError::from)?;
    let command = UpdatePostCommand::new(body.title, body.content)?;

    state
        .post_service
        .update_post(&context, &post_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref post| ApiSuccess::new(StatusCode::OK, post.into()))
}
