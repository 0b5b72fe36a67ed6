//! Node types for graph documents.
//!
//! [`GraphNode`] is the server-side shape: an id, a free-form `type` string
//! (`"trigger"` or an action type such as `"send_email"`), a top-left
//! anchored [`Position`] and an opaque `data` payload. [`NodeKind`] is the
//! closed classification the sync engine works with.

use serde::{Deserialize, Serialize};

use crate::id::NodeId;

/// Server node type reserved for the trigger.
pub const TRIGGER_NODE_TYPE: &str = "trigger";

/// A canvas coordinate. Nodes are anchored at their top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }
}

/// Closed set of node kinds known to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// The single workflow entry point. Never deletable.
    Trigger,
    /// A persisted action step.
    Action,
    /// The in-progress connection selector. Local only.
    Selector,
}

impl NodeKind {
    /// Classifies a server node type string. Servers never hold selectors,
    /// so anything that is not the trigger is an action.
    pub fn from_server_type(node_type: &str) -> Self {
        if node_type == TRIGGER_NODE_TYPE {
            NodeKind::Trigger
        } else {
            NodeKind::Action
        }
    }

    /// Returns `true` if nodes of this kind may appear in a persisted graph.
    pub fn is_persistable(self) -> bool {
        match self {
            NodeKind::Trigger | NodeKind::Action => true,
            NodeKind::Selector => false,
        }
    }
}

/// A node as held by the graph store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    /// `"trigger"` or the action type.
    #[serde(rename = "type")]
    pub node_type: String,
    pub position: Position,
    /// Type-specific payload, opaque to the sync engine.
    #[serde(default)]
    pub data: serde_json::Value,
}

impl GraphNode {
    pub fn kind(&self) -> NodeKind {
        NodeKind::from_server_type(&self.node_type)
    }

    pub fn is_trigger(&self) -> bool {
        self.kind() == NodeKind::Trigger
    }

    /// Title stored in `data.title`, if any.
    pub fn title(&self) -> Option<&str> {
        self.data.get("title").and_then(|v| v.as_str())
    }
}
