//! HTTP status codes as a typed enum.
//!
//! Use [`Status`] anywhere a status code is accepted: `Response::status()`,
//! a `(Status, body)` tuple, or as a bare handler return value.
//!
//! ```rust
//! use postboard::{IntoResponse, Response, Status};
//!
//! Response::status(Status::NotFound);
//!
//! let res = (Status::Created, Response::json(br#"{"id":1}"#.to_vec())).into_response();
//! assert_eq!(res.status_code().as_u16(), 201);
//! ```

/// The status codes the API answers with.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    // ── 2xx Success ───────────────────────────────────────────────────────────
    Ok,                  // 200
    Created,             // 201

    // ── 4xx Client errors ─────────────────────────────────────────────────────
    BadRequest,          // 400
    NotFound,            // 404
    MethodNotAllowed,    // 405

    // ── 5xx Server errors ─────────────────────────────────────────────────────
    InternalServerError, // 500
}

impl Status {
    pub fn as_u16(self) -> u16 {
        self.into()
    }
}

impl From<Status> for u16 {
    fn from(s: Status) -> u16 {
        match s {
            Status::Ok                  => 200,
            Status::Created             => 201,
            Status::BadRequest          => 400,
            Status::NotFound            => 404,
            Status::MethodNotAllowed    => 405,
            Status::InternalServerError => 500,
        }
    }
}

impl From<Status> for http::StatusCode {
    fn from(s: Status) -> http::StatusCode {
        // Every variant maps to a registered code.
        http::StatusCode::from_u16(s.into()).unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_http_status_code() {
        assert_eq!(http::StatusCode::from(Status::Created), http::StatusCode::CREATED);
        assert_eq!(http::StatusCode::from(Status::MethodNotAllowed), http::StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(Status::InternalServerError.as_u16(), 500);
    }
}
