//! Projection of the authoritative snapshot onto the canvas, and pruning of
//! local-only state before operations are derived from it.

use std::collections::HashSet;

use flowsync_core::{GraphEdge, GraphNode, GraphState, NodeId};

use crate::canvas::{CanvasEdge, CanvasNode, CanvasSnapshot};

/// Label some stores attach to trigger edges as a placeholder; never shown.
const TRIGGER_LABEL_PLACEHOLDER: &str = "Trigger";

/// Maps `graph` to canvas nodes and edges, carrying `selection` over by id.
///
/// The result holds exactly the snapshot's nodes and edges, in snapshot
/// order. Selected ids that no longer exist are dropped silently.
pub fn project(graph: &GraphState, selection: &HashSet<NodeId>) -> CanvasSnapshot {
    let nodes = graph
        .nodes
        .iter()
        .map(|node| project_node(node, selection))
        .collect();
    let edges = graph.edges.iter().map(project_edge).collect();
    CanvasSnapshot { nodes, edges }
}

fn project_node(node: &GraphNode, selection: &HashSet<NodeId>) -> CanvasNode {
    CanvasNode {
        id: node.id.clone(),
        kind: node.kind(),
        position: node.position,
        data: node.data.clone(),
        selected: selection.contains(&node.id),
    }
}

fn project_edge(edge: &GraphEdge) -> CanvasEdge {
    let label = edge
        .label
        .clone()
        .filter(|label| label != TRIGGER_LABEL_PLACEHOLDER);
    CanvasEdge {
        id: edge.id.clone(),
        source: edge.source.clone(),
        target: edge.target.clone(),
        source_handle: edge.source_handle,
        label,
        selected: false,
    }
}

/// Drops ephemeral nodes and every edge touching one of them.
pub fn prune(nodes: &[CanvasNode], edges: &[CanvasEdge]) -> CanvasSnapshot {
    let (kept, dropped): (Vec<&CanvasNode>, Vec<&CanvasNode>) = nodes
        .iter()
        .partition(|node| node.kind.is_persistable());

    let dropped: HashSet<&NodeId> = dropped.into_iter().map(|node| &node.id).collect();
    let edges = edges
        .iter()
        .filter(|edge| !dropped.contains(&edge.source) && !dropped.contains(&edge.target))
        .cloned()
        .collect();

    CanvasSnapshot {
        nodes: kept.into_iter().cloned().collect(),
        edges,
    }
}
