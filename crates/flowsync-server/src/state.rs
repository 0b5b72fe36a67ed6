//! Application state shared by the axum handlers.
//!
//! The graph store sits behind `Arc<tokio::sync::Mutex<>>` so handlers await
//! the lock without blocking the runtime. Every operation batch is applied
//! under the lock, which is what makes the version check and the write one
//! atomic step.

use std::sync::Arc;

use tokio::sync::Mutex;

use flowsync_storage::InMemoryStore;

/// Shared application state for the HTTP server.
#[derive(Clone, Default)]
pub struct AppState {
    pub store: Arc<Mutex<InMemoryStore>>,
}

impl AppState {
    /// Creates state backed by an empty in-memory store.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Creates state around an existing store handle.
    pub fn with_store(store: Arc<Mutex<InMemoryStore>>) -> Self {
        AppState { store }
    }
}
