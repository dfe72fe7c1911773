use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::post::errors::PostError;
use crate::domain::post::models::Post;
use crate::domain::post::models::PostId;
use crate::domain::post::ports::PostRepository;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    // Insertion order breaks ties between posts created at the same instant
    posts: Vec<Post>,
}

/// Process-local store backing both repositories.
///
/// Users and posts share one lock so that deleting a user removes their
/// posts atomically, as the foreign key cascade does in Postgres.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<'a>(posts: impl DoubleEndedIterator<Item = &'a Post>) -> Vec<Post> {
    let mut posts: Vec<Post> = posts.rev().cloned().collect();
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    posts
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut tables = self.tables.write().await;

        if tables
            .users
            .values()
            .any(|existing| existing.username == user.username)
        {
            return Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ));
        }

        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.tables.read().await.users.get(id).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|user| user.username == *username)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, UserError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.users.get(id).cloned())
            .collect())
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let mut tables = self.tables.write().await;

        if tables.users.remove(id).is_none() {
            return Err(UserError::NotFound(id.to_string()));
        }
        tables.posts.retain(|post| post.owner_id != *id);

        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn create(&self, post: Post) -> Result<Post, PostError> {
        self.tables.write().await.posts.push(post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostError> {
        Ok(self
            .tables
            .read()
            .await
            .posts
            .iter()
            .find(|post| post.id == *id)
            .cloned())
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<Post>, PostError> {
        let tables = self.tables.read().await;
        let mut posts = newest_first(tables.posts.iter());
        posts.truncate(limit as usize);
        Ok(posts)
    }

    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<Post>, PostError> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables.posts.iter().filter(|post| post.owner_id == *owner_id),
        ))
    }

    async fn update(&self, post: Post) -> Result<Post, PostError> {
        let mut tables = self.tables.write().await;

        let stored = tables
            .posts
            .iter_mut()
            .find(|stored| stored.id == post.id)
            .ok_or_else(|| PostError::NotFound(post.id.to_string()))?;
        *stored = post.clone();

        Ok(post)
    }
}
