use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::access::gate::ensure_owner;
use crate::domain::access::models::AuthenticatedContext;
use crate::domain::post::errors::PostError;
use crate::domain::post::models::Author;
use crate::domain::post::models::CreatePostCommand;
use crate::domain::post::models::FeedEntry;
use crate::domain::post::models::Post;
use crate::domain::post::models::PostId;
use crate::domain::post::models::UpdatePostCommand;
use crate::domain::post::ports::PostRepository;
use crate::domain::post::ports::PostServicePort;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;

/// Domain service implementation for post operations.
pub struct PostService<PR, UR>
where
    PR: PostRepository,
    UR: UserRepository,
{
    posts: Arc<PR>,
    users: Arc<UR>,
    feed_size: u32,
}

impl<PR, UR> PostService<PR, UR>
where
    PR: PostRepository,
    UR: UserRepository,
{
    /// Create a new post service with injected dependencies.
    ///
    /// # Arguments
    /// * `posts` - Post persistence implementation
    /// * `users` - User persistence, used to resolve feed authors
    /// * `feed_size` - Number of posts in the public feed
    pub fn new(posts: Arc<PR>, users: Arc<UR>, feed_size: u32) -> Self {
        Self {
            posts,
            users,
            feed_size,
        }
    }
}

#[async_trait]
impl<PR, UR> PostServicePort for PostService<PR, UR>
where
    PR: PostRepository,
    UR: UserRepository,
{
    async fn list_feed(&self) -> Result<Vec<FeedEntry>, PostError> {
        let posts = self.posts.list_recent(self.feed_size).await?;

        let mut owner_ids: Vec<UserId> = posts.iter().map(|post| post.owner_id).collect();
        owner_ids.sort_by_key(|id| id.0);
        owner_ids.dedup();

        let authors: HashMap<UserId, Author> = self
            .users
            .find_by_ids(&owner_ids)
            .await
            .map_err(|e| PostError::DatabaseError(e.to_string()))?
            .iter()
            .map(|user| (user.id, Author::from(user)))
            .collect();

        Ok(posts
            .into_iter()
            .map(|post| {
                let author = authors.get(&post.owner_id).cloned();
                FeedEntry { post, author }
            })
            .collect())
    }

    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<Post>, PostError> {
        self.posts.list_by_owner(owner_id).await
    }

    async fn create_post(
        &self,
        context: &AuthenticatedContext,
        command: CreatePostCommand,
    ) -> Result<Post, PostError> {
        let now = Utc::now();
        let post = Post {
            id: PostId::new(),
            owner_id: context.user_id,
            title: command.title,
            content: command.content,
            created_at: now,
            updated_at: now,
        };

        let created = self.posts.create(post).await?;
        tracing::info!(post_id = %created.id, owner_id = %created.owner_id, "Post created");

        Ok(created)
    }

    async fn update_post(
        &self,
        context: &AuthenticatedContext,
        id: &PostId,
        command: UpdatePostCommand,
    ) -> Result<Post, PostError> {
        let mut post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(PostError::NotFound(id.to_string()))?;

        if let Err(e) = ensure_owner(context, &post.owner_id) {
            tracing::warn!(
                post_id = %post.id,
                owner_id = %post.owner_id,
                user_id = %context.user_id,
                "Rejected update of a post owned by another user"
            );
            return Err(e.into());
        }

        post.title = command.title;
        post.content = command.content;
        post.updated_at = Utc::now();

        self.posts.update(post).await
    }
}
