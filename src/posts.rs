//! Route handlers for `/api/posts`.
//!
//! Every handler runs the same linear pipeline: validate the input, make the
//! store calls, map the outcome to a status and a JSON body. Storage errors
//! are logged and answered with a fixed message; their text never reaches
//! the client.
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | `POST` | `/` | 201 created post |
//! | `GET` | `/` | 200 all posts |
//! | `GET` | `/{id}` | 200 post |
//! | `PUT` | `/{id}` | 200 updated post |
//! | `DELETE` | `/{id}` | 200 deleted post |
//! | `GET` | `/{id}/comments` | 200 comments of the post |
//! | `POST` | `/{id}/comments` | 201 created comment |

use serde_json::json;
use tracing::{error, info};

use crate::handler::with_state;
use crate::method::Method;
use crate::model::{NewComment, PostId};
use crate::request::Request;
use crate::response::{IntoResponse, Json, Response};
use crate::router::Router;
use crate::status::Status;
use crate::store::SharedStore;
use crate::validate;

/// Where [`routes`] is mounted by [`app`](crate::app).
pub const MOUNT: &str = "/api/posts";

const POST_NOT_FOUND: &str = "The post with the specified ID does not exist.";

/// The posts router, with paths relative to [`MOUNT`].
pub fn routes(store: SharedStore) -> Router {
    Router::new()
        .on(Method::Post,   "/",               with_state(store.clone(), create_post))
        .on(Method::Get,    "/",               with_state(store.clone(), list_posts))
        .on(Method::Get,    "/{id}",           with_state(store.clone(), get_post))
        .on(Method::Put,    "/{id}",           with_state(store.clone(), update_post))
        .on(Method::Delete, "/{id}",           with_state(store.clone(), delete_post))
        .on(Method::Get,    "/{id}/comments",  with_state(store.clone(), list_comments))
        .on(Method::Post,   "/{id}/comments",  with_state(store,         create_comment))
}

fn reply(status: Status, key: &str, message: impl Into<String>) -> Response {
    let message: String = message.into();
    (status, Json(json!({ key: message }))).into_response()
}

/// The `{id}` segment as a post id. Anything that is not a `u64` cannot
/// name a stored post.
fn post_id(req: &Request) -> Option<PostId> {
    req.param("id")?.parse().ok()
}

// POST /api/posts
async fn create_post(store: SharedStore, req: Request) -> Response {
    let fields = match validate::post_fields(req.body()) {
        Ok(fields) => fields,
        Err(e) => return reply(Status::BadRequest, "errorMessage", e.message),
    };

    match store.insert(fields).await {
        Ok(post) => {
            info!(post_id = post.id, "post created");
            (Status::Created, Json(post)).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to insert post");
            reply(Status::InternalServerError, "error", "There was an error while saving the post to the database")
        }
    }
}

// POST /api/posts/{id}/comments
async fn create_comment(store: SharedStore, req: Request) -> Response {
    const SAVE_FAILED: &str = "There was an error while saving the comment to the database";

    let text = match validate::comment_text(req.body()) {
        Ok(text) => text,
        Err(e) => return reply(Status::BadRequest, "errorMessage", e.message),
    };
    let Some(post_id) = post_id(&req) else {
        return reply(Status::NotFound, "message", POST_NOT_FOUND);
    };

    match store.find_by_id(post_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return reply(Status::NotFound, "message", POST_NOT_FOUND),
        Err(e) => {
            error!(error = %e, post_id, "failed to look up post for comment");
            return reply(Status::InternalServerError, "error", SAVE_FAILED);
        }
    }

    match store.insert_comment(NewComment { post_id, text }).await {
        Ok(comment) => (Status::Created, Json(comment)).into_response(),
        Err(e) => {
            error!(error = %e, post_id, "failed to insert comment");
            reply(Status::InternalServerError, "error", SAVE_FAILED)
        }
    }
}

// GET /api/posts
async fn list_posts(store: SharedStore, _req: Request) -> Response {
    match store.find().await {
        Ok(posts) => Json(posts).into_response(),
        Err(e) => {
            error!(error = %e, "failed to list posts");
            reply(Status::InternalServerError, "error", "The posts information could not be retrieved.")
        }
    }
}

// GET /api/posts/{id}
async fn get_post(store: SharedStore, req: Request) -> Response {
    let Some(id) = post_id(&req) else {
        return reply(Status::NotFound, "message", POST_NOT_FOUND);
    };

    match store.find_by_id(id).await {
        Ok(Some(post)) => Json(post).into_response(),
        Ok(None) => reply(Status::NotFound, "message", POST_NOT_FOUND),
        Err(e) => {
            error!(error = %e, post_id = id, "failed to get post");
            reply(
                Status::InternalServerError,
                "error",
                "Internal server error. The posts information could not be retrieved.",
            )
        }
    }
}

// GET /api/posts/{id}/comments
async fn list_comments(store: SharedStore, req: Request) -> Response {
    const LOAD_FAILED: &str = "The comments information could not be retrieved.";

    let raw_id = req.param("id").unwrap_or_default();
    let post_missing = || reply(Status::NotFound, "message", format!("The post with the ID {raw_id} does not exist."));

    let Some(id) = post_id(&req) else {
        return post_missing();
    };

    match store.find_by_id(id).await {
        Ok(Some(_)) => {}
        Ok(None) => return post_missing(),
        Err(e) => {
            error!(error = %e, post_id = id, "failed to look up post for comments");
            return reply(Status::InternalServerError, "error", LOAD_FAILED);
        }
    }

    match store.find_post_comments(id).await {
        Ok(comments) if comments.is_empty() => {
            reply(Status::NotFound, "error", format!("Could not find any comments for post id {raw_id}."))
        }
        Ok(comments) => Json(comments).into_response(),
        Err(e) => {
            error!(error = %e, post_id = id, "failed to list comments");
            reply(Status::InternalServerError, "error", LOAD_FAILED)
        }
    }
}

// DELETE /api/posts/{id}
async fn delete_post(store: SharedStore, req: Request) -> Response {
    const REMOVE_FAILED: &str = "The post could not be removed";

    let Some(id) = post_id(&req) else {
        return reply(Status::NotFound, "message", POST_NOT_FOUND);
    };

    let post = match store.find_by_id(id).await {
        Ok(Some(post)) => post,
        Ok(None) => return reply(Status::NotFound, "message", POST_NOT_FOUND),
        Err(e) => {
            error!(error = %e, post_id = id, "failed to look up post for delete");
            return reply(Status::InternalServerError, "error", REMOVE_FAILED);
        }
    };

    // The response is the record read above, not a re-read.
    match store.remove(id).await {
        Ok(_) => {
            info!(post_id = id, "post deleted");
            Json(post).into_response()
        }
        Err(e) => {
            error!(error = %e, post_id = id, "failed to remove post");
            reply(Status::InternalServerError, "error", REMOVE_FAILED)
        }
    }
}

// PUT /api/posts/{id}
async fn update_post(store: SharedStore, req: Request) -> Response {
    const MODIFY_FAILED: &str = "The post information could not be modified.";

    let Ok(fields) = validate::post_fields(req.body()) else {
        return reply(Status::BadRequest, "errorMessage", "Please provide title and contents for the post.");
    };
    let Some(id) = post_id(&req) else {
        return reply(Status::NotFound, "message", POST_NOT_FOUND);
    };

    match store.update(id, fields).await {
        Ok(0) => return reply(Status::NotFound, "message", POST_NOT_FOUND),
        Ok(_) => {}
        Err(e) => {
            error!(error = %e, post_id = id, "failed to update post");
            return reply(Status::InternalServerError, "error", MODIFY_FAILED);
        }
    }

    match store.find_by_id(id).await {
        Ok(Some(post)) => Json(post).into_response(),
        // Removed between the update and the re-read.
        Ok(None) => reply(Status::NotFound, "message", POST_NOT_FOUND),
        Err(e) => {
            error!(error = %e, post_id = id, "failed to re-read updated post");
            reply(Status::InternalServerError, "error", MODIFY_FAILED)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::Value;

    use super::*;
    use crate::model::{Comment, NewPost, Post};
    use crate::store::{MemoryStore, Store, StoreError};

    /// Fails every call and counts how many were made.
    #[derive(Default)]
    struct BrokenStore {
        calls: AtomicUsize,
    }

    impl BrokenStore {
        fn fail<T>(&self) -> crate::store::Result<T> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::unavailable("disk on fire"))
        }
    }

    #[async_trait]
    impl Store for BrokenStore {
        async fn insert(&self, _: NewPost) -> crate::store::Result<Post> { self.fail() }
        async fn find(&self) -> crate::store::Result<Vec<Post>> { self.fail() }
        async fn find_by_id(&self, _: PostId) -> crate::store::Result<Option<Post>> { self.fail() }
        async fn find_post_comments(&self, _: PostId) -> crate::store::Result<Vec<Comment>> { self.fail() }
        async fn insert_comment(&self, _: NewComment) -> crate::store::Result<Comment> { self.fail() }
        async fn update(&self, _: PostId, _: NewPost) -> crate::store::Result<u64> { self.fail() }
        async fn remove(&self, _: PostId) -> crate::store::Result<u64> { self.fail() }
    }

    #[derive(Clone, Copy)]
    enum Fault {
        Error,
        /// `find_by_id` answers `None` as if the post had just been removed.
        Missing,
    }

    /// A [`MemoryStore`] whose named operations fail; every other call goes
    /// through to the real store.
    struct FaultyStore {
        inner: MemoryStore,
        faults: HashMap<&'static str, Fault>,
    }

    impl FaultyStore {
        async fn with_post(faults: &[(&'static str, Fault)]) -> Self {
            let inner = MemoryStore::new();
            inner.insert(NewPost { title: "A".into(), contents: "B".into() }).await.unwrap();
            Self { inner, faults: faults.iter().copied().collect() }
        }

        fn fault(&self, op: &str) -> crate::store::Result<Option<Fault>> {
            match self.faults.get(op) {
                Some(Fault::Error) => Err(StoreError::unavailable("disk on fire")),
                other => Ok(other.copied()),
            }
        }
    }

    #[async_trait]
    impl Store for FaultyStore {
        async fn insert(&self, fields: NewPost) -> crate::store::Result<Post> {
            self.fault("insert")?;
            self.inner.insert(fields).await
        }
        async fn find(&self) -> crate::store::Result<Vec<Post>> {
            self.fault("find")?;
            self.inner.find().await
        }
        async fn find_by_id(&self, id: PostId) -> crate::store::Result<Option<Post>> {
            if let Some(Fault::Missing) = self.fault("find_by_id")? {
                return Ok(None);
            }
            self.inner.find_by_id(id).await
        }
        async fn find_post_comments(&self, id: PostId) -> crate::store::Result<Vec<Comment>> {
            self.fault("find_post_comments")?;
            self.inner.find_post_comments(id).await
        }
        async fn insert_comment(&self, comment: NewComment) -> crate::store::Result<Comment> {
            self.fault("insert_comment")?;
            self.inner.insert_comment(comment).await
        }
        async fn update(&self, id: PostId, fields: NewPost) -> crate::store::Result<u64> {
            self.fault("update")?;
            self.inner.update(id, fields).await
        }
        async fn remove(&self, id: PostId) -> crate::store::Result<u64> {
            self.fault("remove")?;
            self.inner.remove(id).await
        }
    }

    async fn call(router: &Router, method: Method, path: &str, body: &str) -> (Status, Value) {
        let res = router
            .respond(Request::new(method, format!("{MOUNT}{path}")).with_body(body.to_owned()))
            .await;
        let status = res.status_code();
        let body = serde_json::from_slice(res.body()).unwrap_or(Value::Null);
        (status, body)
    }

    fn app(store: SharedStore) -> Router {
        Router::new().nest(MOUNT, routes(store))
    }

    #[tokio::test]
    async fn create_post_reports_first_validation_error() {
        let app = app(Arc::new(MemoryStore::new()));

        let (status, body) = call(&app, Method::Post, "", r#"{"contents":"B"}"#).await;
        assert_eq!(status, Status::BadRequest);
        assert_eq!(body, json!({ "errorMessage": "\"title\" is required" }));
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_store() {
        let store = Arc::new(BrokenStore::default());
        let app = app(store.clone());

        let (status, _) = call(&app, Method::Post, "", r#"{"title":"A"}"#).await;
        assert_eq!(status, Status::BadRequest);
        let (status, _) = call(&app, Method::Put, "/1", r#"{"contents":"B"}"#).await;
        assert_eq!(status, Status::BadRequest);
        let (status, _) = call(&app, Method::Post, "/1/comments", "{}").await;
        assert_eq!(status, Status::BadRequest);

        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn update_without_contents_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        let app = app(store.clone());
        call(&app, Method::Post, "", r#"{"title":"A","contents":"B"}"#).await;

        let (status, body) = call(&app, Method::Put, "/1", r#"{"title":"changed"}"#).await;
        assert_eq!(status, Status::BadRequest);
        assert_eq!(body["errorMessage"], "Please provide title and contents for the post.");

        let post = store.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(post.title, "A");
    }

    #[tokio::test]
    async fn update_returns_the_modified_record() {
        let app = app(Arc::new(MemoryStore::new()));
        call(&app, Method::Post, "", r#"{"title":"A","contents":"B"}"#).await;

        let (status, body) = call(&app, Method::Put, "/1", r#"{"title":"C","contents":"D"}"#).await;
        assert_eq!(status, Status::Ok);
        assert_eq!(body, json!({ "id": 1, "title": "C", "contents": "D" }));

        let (status, _) = call(&app, Method::Put, "/2", r#"{"title":"C","contents":"D"}"#).await;
        assert_eq!(status, Status::NotFound);
    }

    #[tokio::test]
    async fn comment_on_missing_post_is_not_found_and_not_stored() {
        let store = Arc::new(MemoryStore::new());
        let app = app(store.clone());

        let (status, body) = call(&app, Method::Post, "/5/comments", r#"{"text":"hi"}"#).await;
        assert_eq!(status, Status::NotFound);
        assert_eq!(body["message"], POST_NOT_FOUND);
        assert!(store.find_post_comments(5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn comments_listing_distinguishes_missing_post_from_no_comments() {
        let app = app(Arc::new(MemoryStore::new()));

        let (status, body) = call(&app, Method::Get, "/99999/comments", "").await;
        assert_eq!(status, Status::NotFound);
        assert_eq!(body["message"], "The post with the ID 99999 does not exist.");

        call(&app, Method::Post, "", r#"{"title":"A","contents":"B"}"#).await;
        let (status, body) = call(&app, Method::Get, "/1/comments", "").await;
        assert_eq!(status, Status::NotFound);
        assert_eq!(body["error"], "Could not find any comments for post id 1.");

        let (status, body) = call(&app, Method::Post, "/1/comments", r#"{"text":"first"}"#).await;
        assert_eq!(status, Status::Created);
        assert_eq!(body, json!({ "id": 1, "post_id": 1, "text": "first" }));

        let (status, body) = call(&app, Method::Get, "/1/comments", "").await;
        assert_eq!(status, Status::Ok);
        assert_eq!(body, json!([{ "id": 1, "post_id": 1, "text": "first" }]));
    }

    #[tokio::test]
    async fn non_numeric_id_is_not_found() {
        let app = app(Arc::new(MemoryStore::new()));

        for method in [Method::Get, Method::Delete] {
            let (status, body) = call(&app, method, "/abc", "").await;
            assert_eq!(status, Status::NotFound);
            assert_eq!(body["message"], POST_NOT_FOUND);
        }
    }

    #[tokio::test]
    async fn storage_failures_map_to_500_with_fixed_messages() {
        let app = app(Arc::new(BrokenStore::default()));
        let cases = [
            (Method::Post, "", r#"{"title":"A","contents":"B"}"#, "There was an error while saving the post to the database"),
            (Method::Get, "", "", "The posts information could not be retrieved."),
            (Method::Get, "/1", "", "Internal server error. The posts information could not be retrieved."),
            (Method::Get, "/1/comments", "", "The comments information could not be retrieved."),
            (Method::Post, "/1/comments", r#"{"text":"t"}"#, "There was an error while saving the comment to the database"),
            (Method::Delete, "/1", "", "The post could not be removed"),
            (Method::Put, "/1", r#"{"title":"A","contents":"B"}"#, "The post information could not be modified."),
        ];

        for (method, path, body, message) in cases {
            let (status, res) = call(&app, method, path, body).await;
            assert_eq!(status, Status::InternalServerError, "{method} {path}");
            assert_eq!(res, json!({ "error": message }), "{method} {path}");
            assert!(!res.to_string().contains("disk on fire"));
        }
    }

    #[tokio::test]
    async fn failure_after_the_post_lookup_maps_to_500() {
        let cases = [
            ("insert_comment", Method::Post, "/1/comments", r#"{"text":"t"}"#, "There was an error while saving the comment to the database"),
            ("remove", Method::Delete, "/1", "", "The post could not be removed"),
            ("find_by_id", Method::Put, "/1", r#"{"title":"C","contents":"D"}"#, "The post information could not be modified."),
        ];

        for (op, method, path, body, message) in cases {
            let store = Arc::new(FaultyStore::with_post(&[(op, Fault::Error)]).await);
            let app = app(store.clone());

            let (status, res) = call(&app, method, path, body).await;
            assert_eq!(status, Status::InternalServerError, "{op}");
            assert_eq!(res, json!({ "error": message }), "{op}");
        }
    }

    #[tokio::test]
    async fn failed_comment_insert_stores_nothing() {
        let store = Arc::new(FaultyStore::with_post(&[("insert_comment", Fault::Error)]).await);
        let app = app(store.clone());

        call(&app, Method::Post, "/1/comments", r#"{"text":"t"}"#).await;
        assert!(store.inner.find_post_comments(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_of_a_post_removed_before_the_reread_is_not_found() {
        let store = Arc::new(FaultyStore::with_post(&[("find_by_id", Fault::Missing)]).await);
        let app = app(store.clone());

        let (status, body) = call(&app, Method::Put, "/1", r#"{"title":"C","contents":"D"}"#).await;
        assert_eq!(status, Status::NotFound);
        assert_eq!(body, json!({ "message": POST_NOT_FOUND }));

        // The write itself went through.
        let post = store.inner.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(post.title, "C");
    }

    #[tokio::test]
    async fn empty_body_reports_the_first_missing_field() {
        let app = app(Arc::new(MemoryStore::new()));

        let (status, body) = call(&app, Method::Post, "", "").await;
        assert_eq!(status, Status::BadRequest);
        assert_eq!(body, json!({ "errorMessage": "\"title\" is required" }));

        let (status, body) = call(&app, Method::Post, "/1/comments", "").await;
        assert_eq!(status, Status::BadRequest);
        assert_eq!(body, json!({ "errorMessage": "\"text\" is required" }));
    }

    #[tokio::test]
    async fn trailing_slash_and_head_reach_the_same_handlers() {
        let app = app(Arc::new(MemoryStore::new()));

        let (status, body) = call(&app, Method::Post, "/", r#"{"title":"A","contents":"B"}"#).await;
        assert_eq!(status, Status::Created);
        assert_eq!(body["id"], 1);

        let (status, body) = call(&app, Method::Get, "/", "").await;
        assert_eq!(status, Status::Ok);
        assert_eq!(body, json!([{ "id": 1, "title": "A", "contents": "B" }]));

        let (status, _) = call(&app, Method::Head, "/1", "").await;
        assert_eq!(status, Status::Ok);
        let (status, _) = call(&app, Method::Head, "/2", "").await;
        assert_eq!(status, Status::NotFound);
    }
}
