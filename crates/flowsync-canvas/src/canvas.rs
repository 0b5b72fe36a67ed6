//! Local, renderable canvas state.
//!
//! Canvas nodes and edges mirror the authoritative snapshot plus the UI-only
//! pieces the store never sees: the `selected` flags and the ephemeral
//! selector node.

use serde::{Deserialize, Serialize};

use flowsync_core::{EdgeId, NodeId, NodeKind, Position, SourceHandle};

/// A node as rendered on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub position: Position,
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub selected: bool,
}

impl CanvasNode {
    /// The local-only selector placed where a dragged connection was dropped.
    pub fn selector(id: NodeId, position: Position) -> Self {
        CanvasNode {
            id,
            kind: NodeKind::Selector,
            position,
            data: serde_json::Value::Null,
            selected: false,
        }
    }

    pub fn is_trigger(&self) -> bool {
        self.kind == NodeKind::Trigger
    }
}

/// An edge as rendered on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<SourceHandle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub selected: bool,
}

impl CanvasEdge {
    pub fn touches(&self, node: &NodeId) -> bool {
        &self.source == node || &self.target == node
    }
}

/// Node and edge collections produced by projection or pruning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasSnapshot {
    pub nodes: Vec<CanvasNode>,
    pub edges: Vec<CanvasEdge>,
}
