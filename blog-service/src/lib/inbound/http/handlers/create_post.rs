use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::access::models::AuthenticatedContext;
use crate::post::models::CreatePostCommand;
use crate::post::models::Post;
use crate::inbound::http::router::AppState;

pub async fn create_post(
    State(state): State<AppState>,
    Extension(context): Extension<AuthenticatedContext>,
    Json(body): Json<PostRequestBody>,
) -> Result<ApiSuccess<PostData>, ApiError> {
    let command = CreatePostCommand::new(body.title, body.content)?;

    state
        .post_service
        .create_post(&context, command)
        .await
        .map_err(ApiError::from)
        .map(|ref post| ApiSuccess::new(StatusCode::CREATED, post.into()))
}

/// Title and content of a post; missing fields read as empty and are rejected
/// by the command constructors
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PostRequestBody {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostData {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Post> for PostData {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.to_string(),
            owner_id: post.owner_id.to_string(),
            title: post.title.clone(),
            content: post.content.clone(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}
