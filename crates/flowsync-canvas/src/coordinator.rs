//! Optimistic mutation coordinator.
//!
//! [`MutationCoordinator`] owns the cached authoritative snapshot of one open
//! graph and is the only path through which operations reach the store.
//! Each batch is sent against the cached version. A version conflict
//! triggers exactly one refetch and one re-issue of the same batch; a second
//! conflict, or any other failure, is returned to the caller without
//! touching the cache.
//!
//! Calls are serialized: the cache lives behind an async mutex that is held
//! for the whole apply/refetch/re-apply sequence, so a second submission
//! waits for the first and then builds on the version it produced.

use tokio::sync::Mutex;

use flowsync_core::{describe_batch, GraphOperation, GraphState};

use crate::api::GraphApi;
use crate::error::SyncError;

/// Single-writer coordinator for one graph session.
pub struct MutationCoordinator<A> {
    api: A,
    cache: Mutex<Option<GraphState>>,
}

impl<A: GraphApi> MutationCoordinator<A> {
    /// Creates a coordinator with an empty cache. Call [`Self::load`] before
    /// submitting operations.
    pub fn new(api: A) -> Self {
        MutationCoordinator {
            api,
            cache: Mutex::new(None),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Fetches the authoritative snapshot and caches it.
    pub async fn load(&self) -> Result<GraphState, SyncError> {
        let mut cache = self.cache.lock().await;
        let graph = self.api.fetch_graph().await?;
        tracing::debug!("loaded graph at v{}", graph.version);
        *cache = Some(graph.clone());
        Ok(graph)
    }

    /// Version of the cached snapshot, if loaded.
    pub async fn version(&self) -> Option<u64> {
        self.cache.lock().await.as_ref().map(|g| g.version)
    }

    pub async fn snapshot(&self) -> Option<GraphState> {
        self.cache.lock().await.clone()
    }

    /// Applies `operations` against the cached version, retrying once on a
    /// version conflict.
    ///
    /// On success the returned snapshot replaces the cache. On failure the
    /// cache is left exactly as it was.
    pub async fn apply_with_retry(
        &self,
        operations: &[GraphOperation],
    ) -> Result<GraphState, SyncError> {
        let mut cache = self.cache.lock().await;
        let base_version = cache.as_ref().map(|g| g.version).ok_or(SyncError::NotLoaded)?;

        let first = self.api.apply_graph_operations(base_version, operations).await;
        let graph = match first {
            Ok(graph) => graph,
            Err(err) if err.is_conflict() => {
                tracing::warn!(
                    "{} conflicted at v{}: {}; refetching once",
                    describe_batch(operations),
                    base_version,
                    err
                );
                let fresh = self.api.fetch_graph().await.map_err(|fetch_err| {
                    tracing::error!(
                        "refetch after conflict failed: {} (conflict: {})",
                        fetch_err,
                        err
                    );
                    fetch_err
                })?;
                self.api
                    .apply_graph_operations(fresh.version, operations)
                    .await
                    .map_err(|retry_err| {
                        tracing::error!(
                            "{} failed on retry at v{}: {}",
                            describe_batch(operations),
                            fresh.version,
                            retry_err
                        );
                        retry_err
                    })?
            }
            Err(err) => {
                tracing::warn!("{} failed: {}", describe_batch(operations), err);
                return Err(err);
            }
        };

        if operations.iter().any(GraphOperation::is_structural) {
            tracing::info!(
                "{} applied: v{} -> v{}",
                describe_batch(operations),
                base_version,
                graph.version
            );
        } else {
            tracing::debug!(
                "{} applied: v{} -> v{}",
                describe_batch(operations),
                base_version,
                graph.version
            );
        }
        *cache = Some(graph.clone());
        Ok(graph)
    }

    /// Replaces the cache with a fresh fetch, discarding local knowledge.
    pub async fn refresh(&self) -> Result<GraphState, SyncError> {
        self.load().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    use flowsync_core::{Position, Viewport};

    /// Fetch/apply results are popped in order; every call is logged.
    struct Scripted {
        fetches: StdMutex<Vec<Result<GraphState, SyncError>>>,
        applies: StdMutex<Vec<Result<GraphState, SyncError>>>,
        log: StdMutex<Vec<String>>,
    }

    impl Scripted {
        fn new(
            fetches: Vec<Result<GraphState, SyncError>>,
            applies: Vec<Result<GraphState, SyncError>>,
        ) -> Self {
            Scripted {
                fetches: StdMutex::new(fetches),
                applies: StdMutex::new(applies),
                log: StdMutex::new(Vec::new()),
            }
        }

        fn log(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }
    }

    impl GraphApi for Scripted {
        async fn fetch_graph(&self) -> Result<GraphState, SyncError> {
            self.log.lock().unwrap().push("fetch".to_string());
            self.fetches.lock().unwrap().remove(0)
        }

        async fn apply_graph_operations(
            &self,
            base_version: u64,
            _operations: &[GraphOperation],
        ) -> Result<GraphState, SyncError> {
            self.log.lock().unwrap().push(format!("apply@{base_version}"));
            self.applies.lock().unwrap().remove(0)
        }
    }

    fn graph(version: u64) -> GraphState {
        GraphState {
            version,
            nodes: Vec::new(),
            edges: Vec::new(),
            viewport: Viewport::default(),
        }
    }

    fn conflict(base: u64) -> SyncError {
        SyncError::VersionConflict {
            base_version: base,
            current_version: None,
        }
    }

    fn op() -> Vec<GraphOperation> {
        vec![GraphOperation::add_node("a", "A", Position::default())]
    }

    #[tokio::test]
    async fn apply_before_load_is_rejected() {
        let coordinator = MutationCoordinator::new(Scripted::new(vec![], vec![]));
        let err = coordinator.apply_with_retry(&op()).await.unwrap_err();
        assert!(matches!(err, SyncError::NotLoaded));
        assert!(coordinator.api().log().is_empty());
    }

    #[tokio::test]
    async fn success_updates_cached_version() {
        let coordinator =
            MutationCoordinator::new(Scripted::new(vec![Ok(graph(1))], vec![Ok(graph(2))]));
        coordinator.load().await.unwrap();
        let result = coordinator.apply_with_retry(&op()).await.unwrap();
        assert_eq!(result.version, 2);
        assert_eq!(coordinator.version().await, Some(2));
        assert_eq!(coordinator.api().log(), vec!["fetch", "apply@1"]);
    }

    #[tokio::test]
    async fn non_conflict_failure_is_not_retried() {
        let coordinator = MutationCoordinator::new(Scripted::new(
            vec![Ok(graph(1))],
            vec![Err(SyncError::Transport("down".to_string()))],
        ));
        coordinator.load().await.unwrap();
        let err = coordinator.apply_with_retry(&op()).await.unwrap_err();
        assert!(matches!(err, SyncError::Transport(_)));
        assert_eq!(coordinator.version().await, Some(1));
        assert_eq!(coordinator.api().log(), vec!["fetch", "apply@1"]);
    }

    #[tokio::test]
    async fn failed_refetch_surfaces_and_keeps_cache() {
        let coordinator = MutationCoordinator::new(Scripted::new(
            vec![Ok(graph(1)), Err(SyncError::Transport("down".to_string()))],
            vec![Err(conflict(1))],
        ));
        coordinator.load().await.unwrap();
        let err = coordinator.apply_with_retry(&op()).await.unwrap_err();
        assert!(matches!(err, SyncError::Transport(_)));
        assert_eq!(coordinator.version().await, Some(1));
        assert_eq!(coordinator.api().log(), vec!["fetch", "apply@1", "fetch"]);
    }
}
