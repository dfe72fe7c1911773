use thiserror::Error;

use crate::domain::access::errors::AuthError;

/// Error for PostId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PostIdError {
    #[error("Invalid post ID format: {0}")]
    InvalidFormat(String),
}

/// Top-level error for all post-related operations
#[derive(Debug, Clone, Error)]
pub enum PostError {
    #[error("Invalid post ID: {0}")]
    InvalidPostId(#[from] PostIdError),

    #[error("Title and post content are required")]
    MissingContent,

    #[error("Post not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Access(#[from] AuthError),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
