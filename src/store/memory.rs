//! In-process store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Result, Store};
use crate::model::{Comment, CommentId, NewComment, NewPost, Post, PostId};

/// Keeps posts and comments in ordered maps behind one lock.
///
/// Ids start at 1 and are never reused, even after a delete. Removing a post
/// leaves its comments in place.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    posts: BTreeMap<PostId, Post>,
    comments: BTreeMap<CommentId, Comment>,
    last_post_id: PostId,
    last_comment_id: CommentId,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert(&self, fields: NewPost) -> Result<Post> {
        let mut tables = self.inner.write().await;
        tables.last_post_id += 1;
        let post = Post::new(tables.last_post_id, fields);
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find(&self) -> Result<Vec<Post>> {
        Ok(self.inner.read().await.posts.values().cloned().collect())
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>> {
        Ok(self.inner.read().await.posts.get(&id).cloned())
    }

    async fn find_post_comments(&self, post_id: PostId) -> Result<Vec<Comment>> {
        let tables = self.inner.read().await;
        Ok(tables.comments.values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment> {
        let mut tables = self.inner.write().await;
        tables.last_comment_id += 1;
        let comment = Comment::new(tables.last_comment_id, comment);
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn update(&self, id: PostId, fields: NewPost) -> Result<u64> {
        let mut tables = self.inner.write().await;
        match tables.posts.get_mut(&id) {
            Some(post) => {
                post.title = fields.title;
                post.contents = fields.contents;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn remove(&self, id: PostId) -> Result<u64> {
        let removed = self.inner.write().await.posts.remove(&id);
        Ok(u64::from(removed.is_some()))
    }
}
