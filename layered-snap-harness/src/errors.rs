//! Error types for snapshot assertions.
//!
//! A content mismatch is not an error; it is reported through
//! [`SnapOutcome::Mismatch`](crate::SnapOutcome::Mismatch). The variants here
//! are infrastructure failures that abort a single assertion.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while capturing, reading or updating a snapshot.
#[derive(Debug, Error)]
pub enum SnapError {
    /// Writing the snapshot failed, on first capture or in update mode.
    #[error("failed to write snapshot {}: {source}", .path.display())]
    CaptureIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The snapshot exists but could not be read.
    #[error("failed to read snapshot {}: {source}", .path.display())]
    ReadIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// `snap.toml` could not be read or parsed.
    #[error("invalid snapshot config {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    /// The snapshot name cannot be derived from the given test identity.
    #[error("invalid snapshot identity: {message}")]
    InvalidIdentity { message: String },
}

/// Result type for snapshot operations.
pub type SnapResult<T> = Result<T, SnapError>;
