//! Errors surfaced by query execution.
//!
//! Only endpoint failures are recoverable. A subject that does not exist is
//! not an error; it is reported through [`Lookup::Absent`](crate::Lookup).

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("SPARQL endpoint did not answer within {0:?}")]
    Timeout(Duration),

    #[error("transport error talking to SPARQL endpoint: {0}")]
    Transport(String),

    #[error("SPARQL endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed SPARQL endpoint response: {0}")]
    InvalidResponse(String),
}

impl Error {
    /// True for failures the caller may reasonably retry.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Timeout(_) | Error::Transport(_) => true,
            Error::Status { status, .. } => *status >= 500,
            Error::InvalidResponse(_) => false,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::InvalidResponse(e.to_string())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
