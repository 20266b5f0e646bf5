//! Error types shared across the upload engine.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error for engine operations.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Illegal chunk size; rejected before any I/O or network call.
    #[error("{0}")]
    Validation(String),

    /// Malformed or incomplete resume record.
    #[error("resume record {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    /// Failure reported by the remote session (initiate/part/complete).
    #[error("remote session: {0}")]
    Remote(#[from] RemoteError),

    /// Local file I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Error from the remote multipart-upload protocol. Never retried here;
/// classification is only used for reporting.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Transport-level failure (connection, TLS, stalled upload).
    #[error(transparent)]
    Transport(#[from] curl::Error),

    /// Server answered with a non-2xx status.
    #[error("HTTP {code}: {body}")]
    Http { code: u32, body: String },

    /// Response arrived but did not carry what the protocol requires
    /// (e.g. a part response without a checksum).
    #[error("{0}")]
    Protocol(String),
}
