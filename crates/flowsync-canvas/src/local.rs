//! In-process [`GraphApi`] over a shared [`GraphStore`].

use std::sync::Arc;

use tokio::sync::Mutex;

use flowsync_core::{GraphKey, GraphOperation, GraphState};
use flowsync_storage::{GraphStore, InMemoryStore};

use crate::api::GraphApi;
use crate::error::SyncError;

/// Binds one graph of a shared store as a [`GraphApi`].
///
/// Several `LocalGraphApi` values may share the same store; each call takes
/// the store lock only for the duration of one store operation.
pub struct LocalGraphApi<S = InMemoryStore> {
    store: Arc<Mutex<S>>,
    key: GraphKey,
}

impl<S> LocalGraphApi<S> {
    pub fn new(store: Arc<Mutex<S>>, key: GraphKey) -> Self {
        LocalGraphApi { store, key }
    }

    pub fn key(&self) -> GraphKey {
        self.key
    }

    pub fn store(&self) -> &Arc<Mutex<S>> {
        &self.store
    }
}

impl<S> Clone for LocalGraphApi<S> {
    fn clone(&self) -> Self {
        LocalGraphApi {
            store: Arc::clone(&self.store),
            key: self.key,
        }
    }
}

impl<S: GraphStore + Send> GraphApi for LocalGraphApi<S> {
    async fn fetch_graph(&self) -> Result<GraphState, SyncError> {
        let store = self.store.lock().await;
        Ok(store.fetch(self.key)?)
    }

    async fn apply_graph_operations(
        &self,
        base_version: u64,
        operations: &[GraphOperation],
    ) -> Result<GraphState, SyncError> {
        let mut store = self.store.lock().await;
        Ok(store.apply_operations(self.key, base_version, operations)?)
    }
}
