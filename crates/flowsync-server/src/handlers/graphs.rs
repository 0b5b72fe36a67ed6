//! Graph handlers (create, list, fetch, apply, delete).

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use flowsync_core::{describe_batch, GraphId, GraphKey, GraphState, WorkspaceId};
use flowsync_storage::GraphStore;

use crate::error::ApiError;
use crate::schema::graphs::{
    ApplyOperationsRequest, CreateGraphRequest, CreateGraphResponse, GraphListResponse,
};
use crate::state::AppState;

const DEFAULT_TITLE: &str = "Untitled workflow";

fn graph_key(workspace_id: Uuid, graph_id: Uuid) -> GraphKey {
    GraphKey::new(WorkspaceId(workspace_id), GraphId(graph_id))
}

/// Lists the graphs of a workspace.
///
/// `GET /workspaces/{workspace_id}/graphs`
pub async fn list_graphs(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
) -> Result<Json<GraphListResponse>, ApiError> {
    let store = state.store.lock().await;
    let graphs = store.list_graphs(WorkspaceId(workspace_id))?;
    Ok(Json(GraphListResponse {
        graphs: graphs.into_iter().map(Into::into).collect(),
    }))
}

/// Creates a graph holding only its trigger.
///
/// `POST /workspaces/{workspace_id}/graphs`
pub async fn create_graph(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
    Json(req): Json<CreateGraphRequest>,
) -> Result<Json<CreateGraphResponse>, ApiError> {
    let key = GraphKey::generate(WorkspaceId(workspace_id));
    let title = req.title.as_deref().unwrap_or(DEFAULT_TITLE);
    let mut store = state.store.lock().await;
    let graph = store.create_graph(key, title)?;
    tracing::info!("created graph {}", key);
    Ok(Json(CreateGraphResponse {
        graph_id: key.graph_id,
        graph,
    }))
}

/// Returns the current snapshot.
///
/// `GET /workspaces/{workspace_id}/graphs/{graph_id}`
pub async fn get_graph(
    State(state): State<AppState>,
    Path((workspace_id, graph_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<GraphState>, ApiError> {
    let store = state.store.lock().await;
    let graph = store.fetch(graph_key(workspace_id, graph_id))?;
    Ok(Json(graph))
}

/// Applies an operation batch against `base_version`.
///
/// `POST /workspaces/{workspace_id}/graphs/{graph_id}/operations`
pub async fn apply_operations(
    State(state): State<AppState>,
    Path((workspace_id, graph_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<ApplyOperationsRequest>,
) -> Result<Json<GraphState>, ApiError> {
    let key = graph_key(workspace_id, graph_id);
    let mut store = state.store.lock().await;
    match store.apply_operations(key, req.base_version, &req.operations) {
        Ok(graph) => Ok(Json(graph)),
        Err(err) => {
            tracing::info!(
                "rejected {} on graph {}: {}",
                describe_batch(&req.operations),
                key,
                err
            );
            Err(err.into())
        }
    }
}

/// Deletes a graph.
///
/// `DELETE /workspaces/{workspace_id}/graphs/{graph_id}`
pub async fn delete_graph(
    State(state): State<AppState>,
    Path((workspace_id, graph_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut store = state.store.lock().await;
    store.delete_graph(graph_key(workspace_id, graph_id))?;
    Ok(Json(serde_json::json!({ "success": true })))
}
