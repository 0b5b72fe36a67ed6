//! Derivation of graph operations from canvas interactions.
//!
//! Every function here is pure: it reads canvas state and returns the
//! operations to submit, leaving submission to the session.

use std::collections::HashSet;

use flowsync_core::{
    EdgeId, GraphOperation, GraphState, NodeId, NodeKind, NodePosition, Position, SourceHandle,
    Viewport,
};

use crate::canvas::{CanvasEdge, CanvasNode};
use crate::projector::prune;

/// The source end of a connection dragged onto empty canvas, held until the
/// user picks an action for the selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConnection {
    pub source: NodeId,
    pub handle: Option<SourceHandle>,
}

impl PendingConnection {
    pub fn new(source: NodeId, handle: Option<SourceHandle>) -> Self {
        PendingConnection { source, handle }
    }
}

/// `add_node` for a new action.
pub fn new_action(action_type: &str, title: &str, at: Position) -> GraphOperation {
    GraphOperation::add_node(action_type, title, at)
}

/// `add_edge` between two existing nodes.
pub fn connect(source: NodeId, target: NodeId, handle: Option<SourceHandle>) -> GraphOperation {
    GraphOperation::add_edge(source, target, handle)
}

/// `add_edge` completing a pending connection onto a freshly created node.
pub fn complete_connection(connection: PendingConnection, target: NodeId) -> GraphOperation {
    GraphOperation::add_edge(connection.source, target, connection.handle)
}

/// `delete_edge` per removed edge, limited to edges the user has selected.
///
/// Removal requests for unselected edges are suppressed; unknown ids are
/// logged and skipped without affecting the rest of the batch.
pub fn edge_deletions(edges: &[CanvasEdge], removed: &[EdgeId]) -> Vec<GraphOperation> {
    let mut seen = HashSet::new();
    removed
        .iter()
        .filter(|id| seen.insert(*id))
        .filter_map(|id| match edges.iter().find(|edge| &edge.id == id) {
            Some(edge) if edge.selected => Some(GraphOperation::delete_edge(
                edge.source.clone(),
                edge.target.clone(),
                edge.source_handle,
            )),
            Some(_) => {
                tracing::debug!("ignored removal of unselected edge {}", id);
                None
            }
            None => {
                tracing::warn!("skipped removal of unknown edge {}", id);
                None
            }
        })
        .collect()
}

/// Operations persisting the canvas positions after a drag.
///
/// All non-ephemeral action positions go into one `move_nodes`. An
/// `update_trigger_position` follows when the trigger sits somewhere other
/// than where `authoritative` has it.
pub fn drag_stop(
    nodes: &[CanvasNode],
    edges: &[CanvasEdge],
    authoritative: &GraphState,
) -> Vec<GraphOperation> {
    let pruned = prune(nodes, edges);
    let mut positions = Vec::new();
    let mut trigger_at = None;

    for node in &pruned.nodes {
        match node.kind {
            NodeKind::Action => positions.push(NodePosition {
                action_id: node.id.clone(),
                x: node.position.x,
                y: node.position.y,
            }),
            NodeKind::Trigger => trigger_at = Some(node.position),
            NodeKind::Selector => {}
        }
    }

    let mut operations = Vec::new();
    if !positions.is_empty() {
        operations.push(GraphOperation::MoveNodes { positions });
    }
    if let Some(at) = trigger_at {
        let stored = authoritative.trigger().map(|t| t.position);
        if stored != Some(at) {
            operations.push(GraphOperation::update_trigger_position(at));
        }
    }
    operations
}

/// `update_viewport` once panning or zooming settles.
pub fn viewport_settle(viewport: Viewport) -> GraphOperation {
    GraphOperation::update_viewport(viewport)
}
