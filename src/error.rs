//! Error types surfaced by the multiget request/response pair.
//!
//! Three families are kept apart so callers can decide what to do with each:
//!
//! - [`UsageError`]: the caller misused the API (bad input, querying results too early).
//! - [`Error::Network`]: the exchange itself failed (connection, TLS, deadline).
//! - [`ProtocolError`]: the server answered, but not with something we can accept.
//!
//! Per-resource failures inside a `207 Multi-Status` are data, not errors: see
//! [`ResponseEntry::status`](crate::ResponseEntry::status).

use hyper::StatusCode;
use std::time::Duration;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("usage violation: {0}")]
    Usage(#[from] UsageError),

    #[error("network failure: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("protocol failure: {0}")]
    Protocol(#[from] ProtocolError),
}

impl Error {
    pub(crate) fn network(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Network(source.into())
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }
}

impl From<NetworkError> for Error {
    fn from(value: NetworkError) -> Self {
        Self::network(value)
    }
}

/// Local, immediate misuse of the API. Never worth retrying.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error("property {0} needs both a namespace and a local name")]
    InvalidProperty(String),

    #[error("invalid server authority: {0}")]
    InvalidAuthority(String),

    /// Results were queried while the request is still `Unsent` or `Sent`.
    #[error("no response available while the request is {state}")]
    NoResponse { state: &'static str },

    #[error("request has already been executed")]
    AlreadyExecuted,
}

/// Failures raised by the session itself rather than by the underlying transport.
#[derive(thiserror::Error, Debug)]
pub enum NetworkError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("unexpected HTTP status {status}")]
    UnexpectedStatus { status: StatusCode },

    #[error("response body is not well-formed XML at byte {position}: {message}")]
    MalformedXml { position: u64, message: String },

    #[error("expected a DAV:multistatus document, found {found}")]
    NotMultistatus { found: String },
}
