//! Graph document model shared by the flowsync store, server and canvas.
//!
//! - [`id`]: identifier newtypes and the trigger/selector id conventions
//! - [`node`]: server nodes, positions and the closed [`NodeKind`]
//! - [`edge`]: edges, source types and branch handles
//! - [`graph`]: the versioned [`GraphState`] snapshot
//! - [`ops`]: the [`GraphOperation`] mutation vocabulary

pub mod edge;
pub mod error;
pub mod graph;
pub mod id;
pub mod node;
pub mod ops;

pub use edge::{canonical_edge_id, effective_handle, GraphEdge, SourceHandle, SourceType};
pub use error::CoreError;
pub use graph::{GraphState, Viewport};
pub use id::{EdgeId, GraphId, GraphKey, NodeId, WorkspaceId};
pub use node::{GraphNode, NodeKind, Position, TRIGGER_NODE_TYPE};
pub use ops::{describe_batch, GraphOperation, NodePosition};
