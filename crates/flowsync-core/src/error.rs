//! Core error types for flowsync-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering the
//! failure modes of the graph data model itself.

use thiserror::Error;

use crate::id::{EdgeId, NodeId};

/// Core errors produced by the flowsync-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A node id was not found in the graph.
    #[error("node not found: {id}")]
    NodeNotFound { id: NodeId },

    /// An edge id was not found in the graph.
    #[error("edge not found: {id}")]
    EdgeNotFound { id: EdgeId },

    /// An edge failed validation.
    #[error("invalid edge: {reason}")]
    InvalidEdge { reason: String },

    /// A node failed validation.
    #[error("invalid node: {reason}")]
    InvalidNode { reason: String },

    /// The trigger node cannot be deleted.
    #[error("trigger node {id} cannot be deleted")]
    TriggerUndeletable { id: NodeId },
}
