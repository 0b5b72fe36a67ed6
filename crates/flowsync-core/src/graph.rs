//! The authoritative graph snapshot.
//!
//! [`GraphState`] is what the store hands out on every fetch and every
//! successful mutation. Its `version` is the optimistic-concurrency token.

use serde::{Deserialize, Serialize};

use crate::edge::GraphEdge;
use crate::id::NodeId;
use crate::node::{GraphNode, Position};

/// Canvas pan/zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

/// Versioned snapshot of one workflow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphState {
    pub version: u64,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    #[serde(default)]
    pub viewport: Viewport,
}

impl GraphState {
    /// Returns the trigger node, if the snapshot has one.
    pub fn trigger(&self) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.is_trigger())
    }

    pub fn node(&self, id: &NodeId) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Position of `id` in this snapshot.
    pub fn position_of(&self, id: &NodeId) -> Option<Position> {
        self.node(id).map(|n| n.position)
    }

    /// Edges with `id` at either end.
    pub fn edges_touching<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges.iter().filter(move |e| e.touches(id))
    }
}
