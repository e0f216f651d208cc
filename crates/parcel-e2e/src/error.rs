// Error types for parcel-e2e

use thiserror::Error;

/// Result type alias for parcel-e2e operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when driving the tracking backend
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP transport failure (connection refused, DNS, request timeout)
    ///
    /// During a wait these are treated as transient: the backend is
    /// eventually consistent and individual reads may fail while the
    /// resource is still materializing.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status
    ///
    /// Distinguished from "condition not yet true": an adapter probe that
    /// receives this outside a poll loop surfaces it to the caller.
    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A base or joined endpoint URL could not be parsed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A response was missing a field the adapter relies on
    #[error("Missing field '{path}' in response from {context}")]
    MissingField { path: String, context: String },

    /// Strict wait exhausted its budget
    ///
    /// The message carries the full diagnostic: resource identifier, the
    /// condition waited for, expected value, last observed value, and the
    /// timeout in seconds.
    #[error("Wait timeout: {0}")]
    WaitTimeout(String),

    /// The wait's cancellation token fired before the condition held
    #[error("Wait cancelled")]
    WaitCancelled,

    /// Invalid argument provided to an operation
    ///
    /// Configuration errors (malformed wait spec, a shipment reference with
    /// neither id nor uuid) surface immediately and are never retried.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Error with additional context
    #[error("{0}: {1}")]
    Context(String, #[source] Box<Error>),
}

impl Error {
    /// Adds context to the error
    pub fn context(self, msg: impl Into<String>) -> Self {
        Error::Context(msg.into(), Box::new(self))
    }
}
