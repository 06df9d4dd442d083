//! Liveness handler mounted at `/`.
//!
//! If the process can answer HTTP at all it is alive, so the handler has no
//! dependencies and never touches the store.

use crate::{Request, Response};

pub const LIVENESS_BODY: &str = "This is the server";

/// `200 OK`, `text/plain`.
pub async fn liveness(_req: Request) -> Response {
    Response::text(LIVENESS_BODY)
}
