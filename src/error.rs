//! Unified error type.

use thiserror::Error;

/// The error type returned by postboard's fallible infrastructure operations.
///
/// Application-level errors (400, 404, 500 from a failed store call) are
/// expressed as HTTP [`Response`](crate::Response) values, not as `Error`s.
/// This type surfaces failures that happen outside a request: reading the
/// configuration, binding to a port or accepting a connection.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
