//! Error types for the client.
//!
//! - [`UploadError`] - everything that can stop an upload
//! - [`ApiError`] - failures of the list and delete requests
//!
//! Both map onto the same [`ErrorKind`] taxonomy, which is attached to the
//! warning logged for every failed operation.

use thiserror::Error;

/// Broad category of a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected before any request was made.
    Validation,
    /// The request never produced an HTTP response (network failure, abort).
    Transport,
    /// The server answered with a non-success status.
    Server,
    /// The server answered with a body that could not be understood.
    Parse,
}

/// Upload failures.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("Select files to upload")]
    EmptySelection,
    #[error("An upload is already in progress")]
    Busy,
    #[error("Network error while uploading files")]
    Network,
    #[error("Upload cancelled")]
    Aborted,
    /// The browser refused to build or send the request. The detail is for
    /// logs only and never shown.
    #[error("Could not start upload")]
    Transport(String),
    #[error("Server error: {0}")]
    Server(u16),
    #[error("Could not process server response")]
    InvalidResponse,
}

impl UploadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptySelection | Self::Busy => ErrorKind::Validation,
            Self::Network | Self::Aborted | Self::Transport(_) => ErrorKind::Transport,
            Self::Server(_) => ErrorKind::Server,
            Self::InvalidResponse => ErrorKind::Parse,
        }
    }
}

/// Failures of the file list and delete requests.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP error: {0}")]
    Http(u16),
    /// Server-provided error text (or a generic fallback).
    #[error("{0}")]
    Rejected(String),
    #[error("Could not process server response: {0}")]
    Parse(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) => ErrorKind::Transport,
            Self::Http(_) | Self::Rejected(_) => ErrorKind::Server,
            Self::Parse(_) => ErrorKind::Parse,
        }
    }
}
