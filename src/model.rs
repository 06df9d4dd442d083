//! Records stored by the API, the request bodies that create them, and the
//! validated inputs handed to the store.

use serde::{Deserialize, Serialize};
use validator::Validate;

pub type PostId = u64;
pub type CommentId = u64;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub contents: String,
}

/// A comment attached to a post through `post_id`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub text: String,
}

/// Body of a create-post or update-post request.
///
/// Fields are optional so a missing key reaches validation instead of
/// failing deserialization.
#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct PostFields {
    #[validate(
        required(message = "\"title\" is required"),
        length(min = 1, message = "\"title\" is not allowed to be empty")
    )]
    pub title: Option<String>,

    #[validate(
        required(message = "\"contents\" is required"),
        length(min = 1, message = "\"contents\" is not allowed to be empty")
    )]
    pub contents: Option<String>,
}

/// Body of a create-comment request. The post id comes from the path.
#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct CommentFields {
    #[validate(
        required(message = "\"text\" is required"),
        length(min = 1, message = "\"text\" is not allowed to be empty")
    )]
    pub text: Option<String>,
}

/// The writable fields of a post, used for both insert and update.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewPost {
    pub title: String,
    pub contents: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewComment {
    pub post_id: PostId,
    pub text: String,
}

impl Post {
    pub(crate) fn new(id: PostId, fields: NewPost) -> Self {
        Self { id, title: fields.title, contents: fields.contents }
    }
}

impl Comment {
    pub(crate) fn new(id: CommentId, new: NewComment) -> Self {
        Self { id, post_id: new.post_id, text: new.text }
    }
}
