//! Storage-layer types for graph metadata.

use serde::{Deserialize, Serialize};

use flowsync_core::GraphKey;

/// Summary of a stored graph (for listing).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSummary {
    pub key: GraphKey,
    pub title: String,
    pub version: u64,
    pub node_count: usize,
    pub edge_count: usize,
}
