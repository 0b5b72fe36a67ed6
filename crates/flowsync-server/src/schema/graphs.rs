//! Graph request/response types.

use serde::{Deserialize, Serialize};

use flowsync_core::{GraphId, GraphOperation, GraphState};
use flowsync_storage::GraphSummary;

/// Request to create a new graph.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateGraphRequest {
    /// Optional display title; defaults to "Untitled workflow".
    #[serde(default)]
    pub title: Option<String>,
}

/// Response from creating a graph.
#[derive(Debug, Clone, Serialize)]
pub struct CreateGraphResponse {
    pub graph_id: GraphId,
    pub graph: GraphState,
}

/// Request to apply an ordered operation batch.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplyOperationsRequest {
    /// Version the client last saw. Stale versions are rejected with 409.
    pub base_version: u64,
    pub operations: Vec<GraphOperation>,
}

/// Response for listing the graphs of a workspace.
#[derive(Debug, Clone, Serialize)]
pub struct GraphListResponse {
    pub graphs: Vec<GraphSummaryView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphSummaryView {
    pub graph_id: GraphId,
    pub title: String,
    pub version: u64,
    pub node_count: usize,
    pub edge_count: usize,
}

impl From<GraphSummary> for GraphSummaryView {
    fn from(summary: GraphSummary) -> Self {
        GraphSummaryView {
            graph_id: summary.key.graph_id,
            title: summary.title,
            version: summary.version,
            node_count: summary.node_count,
            edge_count: summary.edge_count,
        }
    }
}
