use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::post::errors::PostError;
use crate::domain::post::errors::PostIdError;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;

/// Blog post entity, owned by the user who wrote it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub owner_id: UserId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Post unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PostId(pub Uuid);

impl PostId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a post ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, PostIdError> {
        Uuid::parse_str(s)
            .map(PostId)
            .map_err(|e| PostIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for PostId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Public view of a post's author
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: UserId,
    pub username: Username,
}

impl From<&User> for Author {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

/// Post as listed in the public feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub post: Post,
    pub author: Option<Author>,
}

fn require_text(title: String, content: String) -> Result<(String, String), PostError> {
    if title.trim().is_empty() || content.trim().is_empty() {
        return Err(PostError::MissingContent);
    }
    Ok((title, content))
}

/// Command to publish a new post
#[derive(Debug)]
pub struct CreatePostCommand {
    pub title: String,
    pub content: String,
}

impl CreatePostCommand {
    /// # Errors
    /// * `MissingContent` - Title or content is blank
    pub fn new(title: String, content: String) -> Result<Self, PostError> {
        let (title, content) = require_text(title, content)?;
        Ok(Self { title, content })
    }
}

/// Command to replace the title and content of an existing post
#[derive(Debug)]
pub struct UpdatePostCommand {
    pub title: String,
    pub content: String,
}

impl UpdatePostCommand {
    /// # Errors
    /// * `MissingContent` - Title or content is blank
    pub fn new(title: String, content: String) -> Result<Self, PostError> {
        let (title, content) = require_text(title, content)?;
        Ok(Self { title, content })
    }
}
