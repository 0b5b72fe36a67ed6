//! The operation vocabulary for mutating a graph document.
//!
//! [`GraphOperation`] is the only unit of mutation a client may send: there
//! is no way to submit a raw node or edge snapshot. On the wire each
//! operation is `{"type": "<name>", "payload": {...}}`.

use serde::{Deserialize, Serialize};

use crate::edge::{effective_handle, SourceHandle, SourceType};
use crate::graph::Viewport;
use crate::id::NodeId;
use crate::node::Position;

/// Target position of one action in a `move_nodes` batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePosition {
    pub action_id: NodeId,
    pub x: f64,
    pub y: f64,
}

/// One atomic mutation intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum GraphOperation {
    /// Create an action node. The store assigns its id.
    AddNode {
        #[serde(rename = "type")]
        action_type: String,
        title: String,
        position_x: f64,
        position_y: f64,
    },
    /// Connect two existing nodes.
    AddEdge {
        source_id: NodeId,
        source_type: SourceType,
        target_id: NodeId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source_handle: Option<SourceHandle>,
    },
    /// Delete an action node and every edge touching it.
    DeleteNode { action_id: NodeId },
    /// Delete one edge, addressed by its endpoints and handle.
    DeleteEdge {
        source_id: NodeId,
        source_type: SourceType,
        target_id: NodeId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source_handle: Option<SourceHandle>,
    },
    /// Reposition a batch of action nodes.
    MoveNodes { positions: Vec<NodePosition> },
    UpdateTriggerPosition { x: f64, y: f64 },
    UpdateViewport { x: f64, y: f64, zoom: f64 },
}

impl GraphOperation {
    pub fn add_node(action_type: impl Into<String>, title: impl Into<String>, at: Position) -> Self {
        GraphOperation::AddNode {
            action_type: action_type.into(),
            title: title.into(),
            position_x: at.x,
            position_y: at.y,
        }
    }

    /// `add_edge` with the source type derived from `source` and the handle
    /// normalized for it.
    pub fn add_edge(source: NodeId, target: NodeId, handle: Option<SourceHandle>) -> Self {
        let source_type = SourceType::of(&source);
        GraphOperation::AddEdge {
            source_handle: effective_handle(source_type, handle),
            source_id: source,
            source_type,
            target_id: target,
        }
    }

    pub fn delete_edge(source: NodeId, target: NodeId, handle: Option<SourceHandle>) -> Self {
        let source_type = SourceType::of(&source);
        GraphOperation::DeleteEdge {
            source_handle: effective_handle(source_type, handle),
            source_id: source,
            source_type,
            target_id: target,
        }
    }

    pub fn delete_node(action_id: NodeId) -> Self {
        GraphOperation::DeleteNode { action_id }
    }

    pub fn update_trigger_position(at: Position) -> Self {
        GraphOperation::UpdateTriggerPosition { x: at.x, y: at.y }
    }

    pub fn update_viewport(viewport: Viewport) -> Self {
        GraphOperation::UpdateViewport {
            x: viewport.x,
            y: viewport.y,
            zoom: viewport.zoom,
        }
    }

    /// Wire name of the operation.
    pub fn name(&self) -> &'static str {
        match self {
            GraphOperation::AddNode { .. } => "add_node",
            GraphOperation::AddEdge { .. } => "add_edge",
            GraphOperation::DeleteNode { .. } => "delete_node",
            GraphOperation::DeleteEdge { .. } => "delete_edge",
            GraphOperation::MoveNodes { .. } => "move_nodes",
            GraphOperation::UpdateTriggerPosition { .. } => "update_trigger_position",
            GraphOperation::UpdateViewport { .. } => "update_viewport",
        }
    }

    /// Returns `true` for operations that change connectivity or membership,
    /// as opposed to positions and viewport.
    pub fn is_structural(&self) -> bool {
        match self {
            GraphOperation::AddNode { .. }
            | GraphOperation::AddEdge { .. }
            | GraphOperation::DeleteNode { .. }
            | GraphOperation::DeleteEdge { .. } => true,
            GraphOperation::MoveNodes { .. }
            | GraphOperation::UpdateTriggerPosition { .. }
            | GraphOperation::UpdateViewport { .. } => false,
        }
    }
}

/// Short human description of a batch, for logs.
pub fn describe_batch(operations: &[GraphOperation]) -> String {
    let names: Vec<&str> = operations.iter().map(GraphOperation::name).collect();
    format!("[{}]", names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::GraphId;
    use serde_json::json;

    #[test]
    fn add_node_wire_shape() {
        let op = GraphOperation::add_node("send_email", "Notify", Position::new(100.0, 100.0));
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(
            json,
            json!({
                "type": "add_node",
                "payload": {
                    "type": "send_email",
                    "title": "Notify",
                    "position_x": 100.0,
                    "position_y": 100.0
                }
            })
        );
    }

    #[test]
    fn add_edge_from_trigger_has_no_handle() {
        let trigger = NodeId::trigger(GraphId(uuid::Uuid::nil()));
        let op = GraphOperation::add_edge(trigger, NodeId::new("a1"), Some(SourceHandle::Error));
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["payload"]["source_type"], "trigger");
        assert!(json["payload"].get("source_handle").is_none());
    }

    #[test]
    fn add_edge_from_action_defaults_handle() {
        let op = GraphOperation::add_edge(NodeId::new("a1"), NodeId::new("a2"), None);
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["payload"]["source_type"], "udf");
        assert_eq!(json["payload"]["source_handle"], "success");
    }

    #[test]
    fn move_nodes_deserializes() {
        let op: GraphOperation = serde_json::from_value(json!({
            "type": "move_nodes",
            "payload": { "positions": [{ "action_id": "a1", "x": 1.0, "y": 2.0 }] }
        }))
        .unwrap();
        assert_eq!(
            op,
            GraphOperation::MoveNodes {
                positions: vec![NodePosition {
                    action_id: NodeId::new("a1"),
                    x: 1.0,
                    y: 2.0
                }]
            }
        );
        assert!(!op.is_structural());
    }

    #[test]
    fn describe_batch_lists_names() {
        let ops = vec![
            GraphOperation::delete_node(NodeId::new("a1")),
            GraphOperation::update_viewport(Viewport::default()),
        ];
        assert_eq!(describe_batch(&ops), "[delete_node, update_viewport]");
    }
}
