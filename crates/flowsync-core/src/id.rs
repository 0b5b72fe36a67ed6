//! Identifier newtypes for graph documents and their entities.
//!
//! Node and edge ids are opaque strings assigned by the graph store. The
//! trigger node is the one exception with a well-known id shape
//! (`trigger-<graph_id>`), which is what lets a client decide whether an edge
//! source denotes the trigger without consulting the node list.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix carried by the trigger node id.
pub const TRIGGER_ID_PREFIX: &str = "trigger-";

/// Prefix carried by local-only selector node ids.
pub const SELECTOR_ID_PREFIX: &str = "selector-";

/// Workspace owning a set of graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkspaceId(pub Uuid);

/// A single workflow graph document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphId(pub Uuid);

/// Fully qualified address of a graph document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphKey {
    pub workspace_id: WorkspaceId,
    pub graph_id: GraphId,
}

impl GraphKey {
    pub fn new(workspace_id: WorkspaceId, graph_id: GraphId) -> Self {
        GraphKey {
            workspace_id,
            graph_id,
        }
    }

    /// Allocates a fresh graph id inside `workspace_id`.
    pub fn generate(workspace_id: WorkspaceId) -> Self {
        GraphKey::new(workspace_id, GraphId(Uuid::new_v4()))
    }

    /// The id the trigger node of this graph carries.
    pub fn trigger_node_id(&self) -> NodeId {
        NodeId::trigger(self.graph_id)
    }
}

/// Stable node identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    /// Id of the trigger node for `graph`.
    pub fn trigger(graph: GraphId) -> Self {
        NodeId(format!("{TRIGGER_ID_PREFIX}{}", graph.0))
    }

    /// Fresh id for a persisted action node.
    pub fn generate_action() -> Self {
        NodeId(Uuid::new_v4().to_string())
    }

    /// Fresh id for a local selector node.
    pub fn generate_selector() -> Self {
        NodeId(format!("{SELECTOR_ID_PREFIX}{}", Uuid::new_v4()))
    }

    /// Returns `true` if this id denotes a trigger node.
    pub fn denotes_trigger(&self) -> bool {
        self.0.starts_with(TRIGGER_ID_PREFIX)
    }

    /// Returns `true` if this id was allocated for a selector node.
    pub fn denotes_selector(&self) -> bool {
        self.0.starts_with(SELECTOR_ID_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Stable edge identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

impl EdgeId {
    pub fn new(id: impl Into<String>) -> Self {
        EdgeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for GraphKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.workspace_id, self.graph_id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

impl From<&str> for EdgeId {
    fn from(s: &str) -> Self {
        EdgeId(s.to_string())
    }
}
