//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;

use crate::method::Method;

/// An incoming HTTP request with its body fully read.
///
/// Path parameters are filled in by the [`Router`](crate::Router) once a
/// route has matched.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    /// A request with an empty body.
    ///
    /// The server builds requests from the wire; this constructor also lets
    /// a [`Router`](crate::Router) be driven directly.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: Bytes::new(),
            params: HashMap::new(),
        }
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn body(&self) -> &[u8] { &self.body }

    /// Returns a named path parameter.
    ///
    /// For a route `/posts/{id}`, `req.param("id")` on `/posts/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}
