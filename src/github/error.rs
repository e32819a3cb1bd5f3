//! Error types exposed by the GitHub gateway layer.

use thiserror::Error;

/// Errors surfaced while talking to GitHub or validating caller input.
///
/// Every public operation in the crate is total: failures are returned as a
/// variant of this enum, never allowed to escape as a panic or an unhandled
/// transport fault.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// No GitHub token is configured; upstream calls are short-circuited.
    #[error("no GitHub token configured")]
    MissingToken,

    /// A URL could not be parsed or constructed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// An owner, repository, or pull request number was empty or malformed.
    #[error("invalid pull request coordinates: {message}")]
    InvalidCoordinates {
        /// Which coordinate was rejected and why.
        message: String,
    },

    /// GitHub returned a non-success status for an authoritative call.
    #[error("{operation} failed with status {status}: {message}")]
    UpstreamStatus {
        /// The upstream operation that failed.
        operation: &'static str,
        /// HTTP status code returned by GitHub.
        status: u16,
        /// GitHub error message, when one was present in the body.
        message: String,
    },

    /// Request payload failed validation before any upstream call was made.
    #[error("{message}")]
    Validation {
        /// Description of the rejected input.
        message: String,
    },

    /// Every retrieval tier was attempted and none produced bytes.
    #[error("could not retrieve image content from any source")]
    NotRetrievable,

    /// A response body could not be decoded (JSON or base64).
    #[error("decode error: {message}")]
    Decode {
        /// Detail from the underlying decoder.
        message: String,
    },

    /// Networking failed while calling GitHub (timeout, connection error).
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// Configuration could not be loaded.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// Local I/O operation failed (socket bind, serve loop).
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}

impl GatewayError {
    /// The upstream HTTP status carried by this error, when there is one.
    ///
    /// Used by the binary image endpoint, which mirrors real upstream status
    /// codes instead of wrapping failures in a JSON envelope.
    #[must_use]
    pub const fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::UpstreamStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
