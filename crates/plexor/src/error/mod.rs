//! Errors raised by client commands.
//!
//! Validation failures ([`PlexorError::InvalidIdentifier`],
//! [`PlexorError::InvalidCursor`]) are always reported before a socket is
//! opened. Transport and framing failures abort the call; nothing is retried
//! and no partial body is ever returned. I/O errors are wrapped in `Arc` to
//! satisfy the `result_large_err` Clippy lint.

use std::io;
use std::string::FromUtf8Error;
use std::sync::Arc;

use thiserror::Error;

/// Errors arising from client commands.
#[derive(Debug, Error)]
pub enum PlexorError {
    /// An identifier contains characters other than ASCII letters, digits
    /// and underscores, or is empty.
    #[error("identifier '{identifier}' must be alphanumeric")]
    InvalidIdentifier {
        /// The rejected identifier as supplied by the caller.
        identifier: String,
    },

    /// A cursor is not a non-negative integer.
    #[error("cursor '{cursor}' for identifier '{identifier}' must be a non-negative integer")]
    InvalidCursor {
        /// Identifier the cursor was attached to.
        identifier: String,
        /// The rejected cursor text.
        cursor: String,
    },

    /// `logon` was called on a client that already carries credentials.
    #[error("client is already logged on as '{login}'")]
    AlreadyLoggedOn {
        /// Login of the existing session.
        login: String,
    },

    /// The event payload could not be encoded as JSON.
    #[error("failed to serialise event payload: {0}")]
    SerialisePayload(#[source] serde_json::Error),

    /// The server address did not resolve.
    #[error("failed to resolve server address {endpoint}: {source}")]
    Resolve {
        /// `host:port` that was looked up.
        endpoint: String,
        /// Underlying resolver error.
        #[source]
        source: Arc<io::Error>,
    },

    /// The TCP connection could not be established.
    #[error("failed to connect to server at {endpoint}: {source}")]
    Connect {
        /// `host:port` that was dialled.
        endpoint: String,
        /// Underlying socket error.
        #[source]
        source: Arc<io::Error>,
    },

    /// Writing the request failed.
    #[error("failed to send request: {0}")]
    SendRequest(#[source] Arc<io::Error>),

    /// Reading the response failed.
    #[error("failed to read response: {0}")]
    ReadResponse(#[source] Arc<io::Error>),

    /// The response does not start with an HTTP status line.
    #[error("response status line is malformed: {line:?}")]
    MalformedStatusLine {
        /// First line of the response header block.
        line: String,
    },

    /// The server answered with a status other than 200.
    #[error("request failed with status {status}")]
    RequestFailed {
        /// Status code reported by the server.
        status: u16,
    },

    /// The response headers carry no `Content-Length`.
    #[error("expected Content-Length in response was not found")]
    MissingContentLength,

    /// The body length differs from the declared `Content-Length`.
    #[error("declared content length {expected} does not match received body length {received}")]
    LengthMismatch {
        /// Length announced by the server.
        expected: usize,
        /// Length actually received.
        received: usize,
    },

    /// The response body is not valid UTF-8.
    #[error("response body is not valid UTF-8: {0}")]
    InvalidEncoding(#[source] FromUtf8Error),
}

impl PlexorError {
    /// Returns true for errors raised before any network activity.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidIdentifier { .. } | Self::InvalidCursor { .. } | Self::AlreadyLoggedOn { .. }
        )
    }
}
