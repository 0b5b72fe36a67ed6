//! In-memory implementation of [`GraphStore`].
//!
//! [`InMemoryStore`] is the reference document store used by the HTTP server,
//! by in-process canvas sessions and by tests.

use std::collections::HashMap;

use flowsync_core::{describe_batch, GraphKey, GraphOperation, GraphState, WorkspaceId};

use crate::document::GraphDocument;
use crate::error::StorageError;
use crate::traits::GraphStore;
use crate::types::GraphSummary;

/// In-memory implementation of [`GraphStore`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    graphs: HashMap<GraphKey, GraphDocument>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    fn get_stored(&self, key: GraphKey) -> Result<&GraphDocument, StorageError> {
        self.graphs.get(&key).ok_or(StorageError::GraphNotFound(key))
    }

    fn get_stored_mut(&mut self, key: GraphKey) -> Result<&mut GraphDocument, StorageError> {
        self.graphs
            .get_mut(&key)
            .ok_or(StorageError::GraphNotFound(key))
    }
}

impl GraphStore for InMemoryStore {
    fn create_graph(&mut self, key: GraphKey, title: &str) -> Result<GraphState, StorageError> {
        if self.graphs.contains_key(&key) {
            return Err(StorageError::GraphExists(key));
        }
        let doc = GraphDocument::new(key, title);
        let snapshot = doc.snapshot();
        self.graphs.insert(key, doc);
        Ok(snapshot)
    }

    fn fetch(&self, key: GraphKey) -> Result<GraphState, StorageError> {
        Ok(self.get_stored(key)?.snapshot())
    }

    fn apply_operations(
        &mut self,
        key: GraphKey,
        base_version: u64,
        operations: &[GraphOperation],
    ) -> Result<GraphState, StorageError> {
        let doc = self.get_stored_mut(key)?;
        let current_version = doc.version();
        if base_version != current_version {
            return Err(StorageError::VersionConflict {
                key,
                base_version,
                current_version,
            });
        }
        doc.apply_batch(operations)?;
        tracing::debug!(
            "graph {} applied {} at v{} -> v{}",
            key,
            describe_batch(operations),
            current_version,
            doc.version()
        );
        Ok(doc.snapshot())
    }

    fn delete_graph(&mut self, key: GraphKey) -> Result<(), StorageError> {
        self.graphs
            .remove(&key)
            .map(|_| ())
            .ok_or(StorageError::GraphNotFound(key))
    }

    fn list_graphs(&self, workspace: WorkspaceId) -> Result<Vec<GraphSummary>, StorageError> {
        let mut summaries: Vec<GraphSummary> = self
            .graphs
            .iter()
            .filter(|(key, _)| key.workspace_id == workspace)
            .map(|(key, doc)| GraphSummary {
                key: *key,
                title: doc.title().to_string(),
                version: doc.version(),
                node_count: doc.node_count(),
                edge_count: doc.edge_count(),
            })
            .collect();
        summaries.sort_by(|a, b| a.title.cmp(&b.title).then(a.key.graph_id.0.cmp(&b.key.graph_id.0)));
        Ok(summaries)
    }
}
