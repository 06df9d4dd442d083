//! # postboard
//!
//! A small JSON API for posts and their comments.
//!
//! Each route validates its input, makes one or two calls to a [`Store`],
//! and answers with a status code and a JSON body. The HTTP layer is a thin
//! framework over hyper: radix-tree routing via [`matchit`], async handlers
//! erased behind a sealed [`Handler`] trait, and a server that drains
//! in-flight requests on SIGTERM / Ctrl-C.
//!
//! ## Routes
//!
//! | Method | Path | Success | Failure |
//! |---|---|---|---|
//! | `POST` | `/api/posts` | 201 post | 400, 500 |
//! | `GET` | `/api/posts` | 200 posts | 500 |
//! | `GET` | `/api/posts/{id}` | 200 post | 404, 500 |
//! | `PUT` | `/api/posts/{id}` | 200 post | 400, 404, 500 |
//! | `DELETE` | `/api/posts/{id}` | 200 deleted post | 404, 500 |
//! | `GET` | `/api/posts/{id}/comments` | 200 comments | 404, 500 |
//! | `POST` | `/api/posts/{id}/comments` | 201 comment | 400, 404, 500 |
//! | `GET` | `/` | 200 text | |
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use postboard::{Config, MemoryStore, Server, app};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), postboard::Error> {
//!     let config = Config::from_env()?;
//!     let router = app(Arc::new(MemoryStore::new()));
//!     Server::bind(config.addr()).await?.serve(router).await
//! }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod config;
pub mod health;
pub mod model;
pub mod posts;
pub mod store;
pub mod validate;

pub use config::Config;
pub use error::Error;
pub use handler::{Handler, with_state};
pub use method::Method;
pub use request::Request;
pub use response::{IntoResponse, Json, Response};
pub use router::Router;
pub use server::Server;
pub use status::Status;
pub use store::{MemoryStore, SharedStore, Store, StoreError};

/// The full application: the posts API under `/api/posts` and liveness at `/`.
pub fn app(store: SharedStore) -> Router {
    Router::new()
        .on(Method::Get, "/", health::liveness)
        .nest(posts::MOUNT, posts::routes(store))
}
