use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::create_post::PostData;
use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::post::models::Author;
use crate::post::models::FeedEntry;

pub async fn list_feed(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<FeedEntryData>>, ApiError> {
    state
        .post_service
        .list_feed()
        .await
        .map_err(ApiError::from)
        .map(|entries| {
            ApiSuccess::new(
                StatusCode::OK,
                entries.iter().map(FeedEntryData::from).collect(),
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedEntryData {
    #[serde(flatten)]
    pub post: PostData,
    pub author: Option<AuthorData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorData {
    pub id: String,
    pub username: String,
}

impl From<&Author> for AuthorData {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id.to_string(),
            username: author.username.as_str().to_string(),
        }
    }
}

impl From<&FeedEntry> for FeedEntryData {
    fn from(entry: &FeedEntry) -> Self {
        Self {
            post: PostData::from(&entry.post),
            author: entry.author.as_ref().map(AuthorData::from),
        }
    }
}
