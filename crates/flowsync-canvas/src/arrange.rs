//! Bridges canvas state to the layout engine.

use std::collections::HashMap;

use flowsync_core::{NodeId, NodeKind, Position};
use flowsync_layout::{layout, LayoutConfig, LayoutDirection, LayoutEdge, LayoutNode};

use crate::canvas::{CanvasEdge, CanvasNode};
use crate::error::SyncError;
use crate::projector::prune;

/// Rendered node dimensions reported by the view, keyed by node id.
pub type NodeSizes = HashMap<NodeId, (f64, f64)>;

/// Lays out the pruned canvas and returns the new top-left position of every
/// persisted node, in canvas order.
pub fn arrange(
    nodes: &[CanvasNode],
    edges: &[CanvasEdge],
    sizes: &NodeSizes,
    direction: LayoutDirection,
    config: &LayoutConfig,
) -> Result<Vec<(NodeId, Position)>, SyncError> {
    let pruned = prune(nodes, edges);

    let layout_nodes: Vec<LayoutNode> = pruned
        .nodes
        .iter()
        .map(|node| {
            let base = match node.kind {
                NodeKind::Trigger => LayoutNode::trigger(node.id.clone()),
                NodeKind::Action | NodeKind::Selector => LayoutNode::new(node.id.clone()),
            };
            match sizes.get(&node.id) {
                Some(&(width, height)) => base.with_size(width, height),
                None => base,
            }
        })
        .collect();
    let layout_edges: Vec<LayoutEdge> = pruned
        .edges
        .iter()
        .map(|edge| LayoutEdge::new(edge.source.clone(), edge.target.clone()))
        .collect();

    let placed = layout(&layout_nodes, &layout_edges, direction, config)?;
    Ok(placed.into_iter().map(|p| (p.id, p.position)).collect())
}
