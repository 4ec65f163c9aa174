//! Error types for the album API client.
//!
//! # Design
//! One variant per failure stage, so callers (and foreign callers reading
//! rendered messages) can tell a rejected cursor from a dead backend from a
//! garbled payload. Every per-request failure is recoverable; none of these
//! invalidate the client they came from.

use std::fmt;

/// Errors returned by [`LibraryClient`](crate::LibraryClient) operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The base URL handed to `connect` could not be used.
    Configuration(String),

    /// The cursor is not a valid resource identifier. No request was made.
    Decode(String),

    /// The request could not be completed: connection failure, timeout, or a
    /// non-success status from the server.
    Transport(String),

    /// The server answered, but the body was not a well-formed album payload.
    Parse(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Configuration(msg) => write!(f, "configuration error: {msg}"),
            ClientError::Decode(msg) => write!(f, "invalid cursor: {msg}"),
            ClientError::Transport(msg) => write!(f, "transport error: {msg}"),
            ClientError::Parse(msg) => write!(f, "malformed response: {msg}"),
        }
    }
}

impl std::error::Error for ClientError {}
