//! The graph API seam consumed by the sync engine.
//!
//! A [`GraphApi`] is bound to one graph document. Implementations return
//! [`SyncError::VersionConflict`] for a stale base version instead of
//! raising; the coordinator pattern-matches on it.

use std::future::Future;

use flowsync_core::{GraphOperation, GraphState};

use crate::error::SyncError;

/// Access to one remote, versioned graph document.
pub trait GraphApi {
    /// Fetches the authoritative snapshot.
    fn fetch_graph(&self) -> impl Future<Output = Result<GraphState, SyncError>> + Send;

    /// Applies `operations` as one ordered batch against `base_version`.
    fn apply_graph_operations(
        &self,
        base_version: u64,
        operations: &[GraphOperation],
    ) -> impl Future<Output = Result<GraphState, SyncError>> + Send;
}
