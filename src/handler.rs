//! Handler trait and type erasure.
//!
//! The router keeps handlers of different concrete types in one radix tree
//! per method, so each one is erased behind `Arc<dyn ErasedHandler>`:
//!
//! ```text
//! async fn get_post(req: Request) -> Response { … }
//!        ↓ router.on(Method::Get, "/{id}", get_post)
//! get_post.into_boxed_handler()        → Arc::new(FnHandler(get_post))
//!        ↓ at request time
//! handler.call(req)                    → Box::pin(async { get_post(req).await.into_response() })
//! ```
//!
//! Handlers that need shared state (the post store) are closures that own an
//! `Arc` and clone it into each call; see [`with_state`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A heap-allocated, type-erased future that resolves to a [`Response`].
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` rather than `pub(crate)` because it appears in the
/// return type of the public `Handler` trait's `into_boxed_handler` method.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

/// A type-erased handler shared across concurrent requests.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

/// Implemented for every valid route handler.
///
/// Satisfied automatically by any `Fn(Request) -> impl Future<Output = impl IntoResponse>`,
/// which covers plain `async fn name(req: Request)` items and closures
/// returning an `async` block. The trait is sealed.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}

/// Binds shared state to a two-argument handler, producing a [`Handler`].
///
/// ```rust
/// use std::sync::Arc;
/// use postboard::{Method, Request, Response, Router, with_state};
///
/// async fn count(hits: Arc<u64>, _req: Request) -> Response {
///     Response::text(hits.to_string())
/// }
///
/// let hits = Arc::new(0_u64);
/// let app = Router::new().on(Method::Get, "/hits", with_state(hits, count));
/// ```
pub fn with_state<S, F, Fut, R>(state: S, f: F) -> impl Handler
where
    S: Clone + Send + Sync + 'static,
    F: Fn(S, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    move |req: Request| f(state.clone(), req)
}
