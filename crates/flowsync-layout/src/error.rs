//! Layout error types.

use flowsync_core::NodeId;
use thiserror::Error;

/// Errors produced while building the layout graph.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// An edge references a node that was not registered.
    #[error("edge endpoint {node} is not a layout node")]
    UnknownEndpoint { node: NodeId },

    /// The same node id was registered twice.
    #[error("duplicate layout node {id}")]
    DuplicateNode { id: NodeId },
}
