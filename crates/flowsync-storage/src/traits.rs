//! The [`GraphStore`] trait defining the contract of a graph document store.
//!
//! A store owns versioned graph documents. Every successful
//! [`GraphStore::apply_operations`] call bumps the document's version by
//! exactly one; a call whose `base_version` is not the current version is
//! rejected with [`StorageError::VersionConflict`] instead of being merged.

use flowsync_core::{GraphKey, GraphOperation, GraphState, WorkspaceId};

use crate::error::StorageError;
use crate::types::GraphSummary;

/// The storage contract for graph documents.
///
/// The trait is synchronous; async callers wrap a store in an async mutex.
pub trait GraphStore {
    /// Creates a new graph holding only its trigger node, at version 1.
    fn create_graph(&mut self, key: GraphKey, title: &str) -> Result<GraphState, StorageError>;

    /// Returns the current snapshot of a graph.
    fn fetch(&self, key: GraphKey) -> Result<GraphState, StorageError>;

    /// Applies an ordered operation batch atomically against `base_version`.
    fn apply_operations(
        &mut self,
        key: GraphKey,
        base_version: u64,
        operations: &[GraphOperation],
    ) -> Result<GraphState, StorageError>;

    /// Deletes a graph.
    fn delete_graph(&mut self, key: GraphKey) -> Result<(), StorageError>;

    /// Lists graphs in a workspace.
    fn list_graphs(&self, workspace: WorkspaceId) -> Result<Vec<GraphSummary>, StorageError>;
}
