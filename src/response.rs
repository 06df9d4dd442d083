//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! Build a [`Response`] in your handler and return it, or return anything that
//! implements [`IntoResponse`]: a [`Status`], a [`Json`] value, or a
//! `(Status, body)` pair.

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::HeaderValue;
use http_body_util::Full;
use serde::Serialize;
use tracing::error;

use crate::status::Status;

const JSON: &str = "application/json";
const TEXT: &str = "text/plain; charset=utf-8";

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// ```rust
/// use postboard::{Response, Status};
///
/// Response::json(br#"{"id":1}"#.to_vec());
/// Response::text("hello");
/// Response::status(Status::NotFound);
/// ```
#[derive(Debug)]
pub struct Response {
    pub(crate) body: Vec<u8>,
    pub(crate) content_type: Option<&'static str>,
    pub(crate) status: Status,
}

impl Response {
    /// `200 OK` — `application/json`.
    pub fn json(body: Vec<u8>) -> Self {
        Self { body, content_type: Some(JSON), status: Status::Ok }
    }

    /// `200 OK` — `text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        Self { body: body.into().into_bytes(), content_type: Some(TEXT), status: Status::Ok }
    }

    /// Response with no body.
    pub fn status(code: Status) -> Self {
        Self { body: Vec::new(), content_type: None, status: code }
    }

    pub fn status_code(&self) -> Status { self.status }
    pub fn body(&self) -> &[u8] { &self.body }
    pub fn content_type(&self) -> Option<&str> { self.content_type }

    /// Converts into the `http` response hyper writes to the wire.
    pub(crate) fn into_inner(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(Bytes::from(self.body)));
        *res.status_mut() = self.status.into();
        if let Some(content_type) = self.content_type {
            res.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        res
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Implement on your own types to return them directly from handlers.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response { Response::text(self) }
}

impl IntoResponse for String {
    fn into_response(self) -> Response { Response::text(self) }
}

/// Return a [`Status`] directly from a handler: `return Status::NotFound`
impl IntoResponse for Status {
    fn into_response(self) -> Response { Response::status(self) }
}

/// Overrides the status of any other response: `(Status::Created, Json(post))`.
impl<T: IntoResponse> IntoResponse for (Status, T) {
    fn into_response(self) -> Response {
        let mut res = self.1.into_response();
        res.status = self.0;
        res
    }
}

/// A value serialized as the JSON body of a `200 OK` response.
///
/// ```rust
/// use postboard::{IntoResponse, Json, Status};
///
/// let res = (Status::Created, Json(serde_json::json!({ "id": 1 }))).into_response();
/// assert_eq!(res.status_code(), Status::Created);
/// ```
#[derive(Debug)]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.0) {
            Ok(bytes) => Response::json(bytes),
            Err(e) => {
                error!(error = %e, "failed to serialize response body");
                Response::status(Status::InternalServerError)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_tuple_keeps_body_and_content_type() {
        let res = (Status::NotFound, Json(serde_json::json!({ "message": "gone" }))).into_response();

        assert_eq!(res.status_code(), Status::NotFound);
        assert_eq!(res.content_type(), Some("application/json"));
        assert_eq!(res.body(), br#"{"message":"gone"}"#);
    }

    #[test]
    fn into_inner_carries_status_and_content_type() {
        let res = (Status::Created, Json(serde_json::json!({ "id": 1 }))).into_response().into_inner();
        assert_eq!(res.status(), http::StatusCode::CREATED);
        assert_eq!(res.headers()["content-type"], "application/json");

        let res = Response::status(Status::MethodNotAllowed).into_inner();
        assert_eq!(res.status(), http::StatusCode::METHOD_NOT_ALLOWED);
        assert!(res.headers().get("content-type").is_none());
    }
}
