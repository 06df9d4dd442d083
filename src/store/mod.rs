//! Persistence gateway for posts and comments.
//!
//! Handlers talk to storage only through [`Store`]. Each method is one
//! atomic operation from the caller's point of view; nothing here retries.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Comment, NewComment, NewPost, Post, PostId};

mod memory;

pub use memory::MemoryStore;

pub type Result<T> = std::result::Result<T, StoreError>;

/// A store shared by every request handler.
pub type SharedStore = Arc<dyn Store>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a post and return it with its assigned id.
    async fn insert(&self, fields: NewPost) -> Result<Post>;

    /// All posts, ascending by id.
    async fn find(&self) -> Result<Vec<Post>>;

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>>;

    /// Comments whose `post_id` is `post_id`, ascending by id.
    async fn find_post_comments(&self, post_id: PostId) -> Result<Vec<Comment>>;

    /// Insert a comment. Does not check that the post exists.
    async fn insert_comment(&self, comment: NewComment) -> Result<Comment>;

    /// Overwrite title and contents. Returns the number of posts changed (0 or 1).
    async fn update(&self, id: PostId, fields: NewPost) -> Result<u64>;

    /// Delete a post. Returns the number of posts removed (0 or 1).
    async fn remove(&self, id: PostId) -> Result<u64>;
}
