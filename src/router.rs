//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. You register a path, you
//! get a handler. Sub-routers are mounted under a prefix with [`Router::nest`].

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;
use tracing::debug;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve).
/// Each registration returns `self` so calls chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    // Registration log, replayed when this router is nested into another.
    entries: Vec<(Method, String, BoxedHandler)>,
}

/// Outcome of matching a method + path pair.
pub(crate) enum Lookup {
    Found(BoxedHandler, HashMap<String, String>),
    MethodNotAllowed,
    NotFound,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), entries: Vec::new() }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them:
    ///
    /// ```rust
    /// # use postboard::{Method, Request, Response, Router};
    /// # async fn get_post(_: Request) -> Response { Response::text("") }
    /// # async fn create_post(_: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .on(Method::Get,  "/posts/{id}", get_post)
    ///     .on(Method::Post, "/posts",      create_post);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for `method`. Routes are static, so this is a startup bug.
    pub fn on(self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.add(method, path.to_owned(), handler.into_boxed_handler())
    }

    /// Mount every route of `other` under `prefix`.
    ///
    /// A route registered as `"/"` in `other` answers on `prefix` itself:
    ///
    /// ```rust
    /// # use postboard::{Method, Request, Response, Router};
    /// # async fn list(_: Request) -> Response { Response::text("") }
    /// let posts = Router::new().on(Method::Get, "/", list);
    /// let app = Router::new().nest("/api/posts", posts); // GET /api/posts
    /// ```
    pub fn nest(self, prefix: &str, other: Router) -> Self {
        let prefix = prefix.trim_end_matches('/');
        other.entries.into_iter().fold(self, |router, (method, path, handler)| {
            let full = match path.as_str() {
                "/" if !prefix.is_empty() => prefix.to_owned(),
                _ => format!("{prefix}{path}"),
            };
            router.add(method, full, handler)
        })
    }

    fn add(mut self, method: Method, path: String, handler: BoxedHandler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path.clone(), Arc::clone(&handler))
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self.entries.push((method, path, handler));
        self
    }

    /// Matching is lenient in two ways: a single trailing `/` is ignored, and
    /// `HEAD` falls back to the `GET` route of the same path.
    pub(crate) fn lookup(&self, method: Method, path: &str) -> Lookup {
        let paths: Vec<&str> = std::iter::once(path)
            .chain(path.strip_suffix('/').filter(|p| !p.is_empty()))
            .collect();
        let methods: &[Method] = match method {
            Method::Head => &[Method::Head, Method::Get],
            _ => std::slice::from_ref(&method),
        };

        for m in methods {
            let Some(tree) = self.routes.get(m) else { continue };
            if let Some(matched) = paths.iter().find_map(|p| tree.at(p).ok()) {
                let params = matched.params.iter()
                    .map(|(k, v)| (k.to_owned(), v.to_owned()))
                    .collect();
                return Lookup::Found(Arc::clone(matched.value), params);
            }
        }

        let other_method = self.routes.iter()
            .any(|(m, tree)| !methods.contains(m) && paths.iter().any(|p| tree.at(p).is_ok()));
        if other_method { Lookup::MethodNotAllowed } else { Lookup::NotFound }
    }

    /// Route one request and produce its response.
    ///
    /// Unknown paths answer `404`, known paths with an unregistered method
    /// answer `405`, both without a body.
    pub async fn respond(&self, mut req: Request) -> Response {
        match self.lookup(req.method, &req.path) {
            Lookup::Found(handler, params) => {
                req.params = params;
                handler.call(req).await
            }
            Lookup::MethodNotAllowed => {
                debug!(method = %req.method, path = %req.path, "method not allowed");
                Response::status(Status::MethodNotAllowed)
            }
            Lookup::NotFound => {
                debug!(method = %req.method, path = %req.path, "no route");
                Response::status(Status::NotFound)
            }
        }
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}
