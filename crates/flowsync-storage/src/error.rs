//! Storage error types for flowsync-storage.
//!
//! [`StorageError`] covers the failure modes of the graph document store:
//! unknown graphs, stale version tokens and operations the current document
//! cannot accept.

use thiserror::Error;

use flowsync_core::{CoreError, GraphKey};

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No graph is stored under the given key.
    #[error("graph not found: {0}")]
    GraphNotFound(GraphKey),

    /// A graph already exists under the given key.
    #[error("graph already exists: {0}")]
    GraphExists(GraphKey),

    /// The caller's base version is not the store's current version.
    #[error("version conflict on {key}: base version {base_version}, current version {current_version}")]
    VersionConflict {
        key: GraphKey,
        base_version: u64,
        current_version: u64,
    },

    /// An operation was rejected by the graph model.
    #[error("operation {operation} rejected: {source}")]
    InvalidOperation {
        operation: &'static str,
        #[source]
        source: CoreError,
    },
}

impl StorageError {
    /// Returns `true` for the stale-version rejection.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StorageError::VersionConflict { .. })
    }
}
