//! Sync error types for the canvas engine.
//!
//! [`SyncError`] is the explicit result of every store call. The coordinator
//! matches on [`SyncError::VersionConflict`] to decide whether a retry is
//! allowed; every other variant is terminal for the current interaction.

use flowsync_layout::LayoutError;
use flowsync_storage::StorageError;
use thiserror::Error;

/// Errors surfaced by graph API calls and canvas interactions.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The base version was stale; the store rejected the batch unapplied.
    #[error("version conflict: base version {base_version} is stale (current: {current_version:?})")]
    VersionConflict {
        base_version: u64,
        current_version: Option<u64>,
    },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The store answered with a non-conflict failure.
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("malformed response: {0}")]
    Decode(String),

    /// A mutation was attempted before the first fetch.
    #[error("graph has not been loaded")]
    NotLoaded,

    /// Auto-layout could not be computed.
    #[error("layout failed: {0}")]
    Layout(#[from] LayoutError),
}

impl SyncError {
    /// Returns `true` for the one error class the coordinator retries.
    pub fn is_conflict(&self) -> bool {
        matches!(self, SyncError::VersionConflict { .. })
    }
}

impl From<StorageError> for SyncError {
    fn from(err: StorageError) -> Self {
        match &err {
            StorageError::VersionConflict {
                base_version,
                current_version,
                ..
            } => SyncError::VersionConflict {
                base_version: *base_version,
                current_version: Some(*current_version),
            },
            StorageError::GraphNotFound(_) => SyncError::Rejected {
                status: 404,
                message: err.to_string(),
            },
            StorageError::GraphExists(_) | StorageError::InvalidOperation { .. } => {
                SyncError::Rejected {
                    status: 400,
                    message: err.to_string(),
                }
            }
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SyncError::Decode(err.to_string())
        } else {
            SyncError::Transport(err.to_string())
        }
    }
}
