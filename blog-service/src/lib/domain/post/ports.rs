use async_trait::async_trait;

use crate::domain::access::models::AuthenticatedContext;
use crate::domain::post::errors::PostError;
use crate::domain::post::models::CreatePostCommand;
use crate::domain::post::models::FeedEntry;
use crate::domain::post::models::Post;
use crate::domain::post::models::PostId;
use crate::domain::post::models::UpdatePostCommand;
use crate::domain::user::models::UserId;

/// Port for post domain service operations.
#[async_trait]
pub trait PostServicePort: Send + Sync + 'static {
    /// Most recent posts of all users, newest first, with their authors.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_feed(&self) -> Result<Vec<FeedEntry>, PostError>;

    /// Posts owned by one user, newest first.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<Post>, PostError>;

    /// Publish a post owned by the authenticated user.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create_post(
        &self,
        context: &AuthenticatedContext,
        command: CreatePostCommand,
    ) -> Result<Post, PostError>;

    /// Replace title and content of a post owned by the authenticated user.
    ///
    /// # Errors
    /// * `NotFound` - Post does not exist
    /// * `Access(OwnershipMismatch)` - Post belongs to another user
    /// * `DatabaseError` - Database operation failed
    async fn update_post(
        &self,
        context: &AuthenticatedContext,
        id: &PostId,
        command: UpdatePostCommand,
    ) -> Result<Post, PostError>;
}

/// Persistence operations for posts.
#[async_trait]
pub trait PostRepository: Send + Sync + 'static {
    /// Persist new post to storage.
    async fn create(&self, post: Post) -> Result<Post, PostError>;

    /// Retrieve post by identifier.
    ///
    /// # Returns
    /// Optional post entity (None if not found)
    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostError>;

    /// Retrieve the `limit` most recently created posts, newest first.
    async fn list_recent(&self, limit: u32) -> Result<Vec<Post>, PostError>;

    /// Retrieve all posts of one owner, newest first.
    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<Post>, PostError>;

    /// Update existing post in storage.
    ///
    /// # Errors
    /// * `NotFound` - Post does not exist
    async fn update(&self, post: Post) -> Result<Post, PostError>;
}
