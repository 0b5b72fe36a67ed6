//! Layered (rank/sweep) layout for workflow graphs.
//!
//! The pipeline:
//!   1. Cycle breaking: DFS back edges are dropped from the ranking graph.
//!   2. Rank assignment: longest path from sources over a topological order.
//!   3. Ordering within ranks: alternating barycenter sweeps, keeping the
//!      order with the fewest crossings.
//!   4. Coordinate assignment: center-anchored, every rank centered on the
//!      same axis.
//!   5. Anchor conversion to top-left, then the trigger gap (top-to-bottom
//!      only).
//!
//! The function is pure and deterministic: identical input produces
//! identical output, ties are always broken by input order.

use std::collections::{HashMap, HashSet};

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{depth_first_search, DfsEvent};
use petgraph::Direction;

use flowsync_core::{NodeId, Position};

use crate::config::{LayoutConfig, LayoutDirection};
use crate::error::LayoutError;

/// A node registered with the layout.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub id: NodeId,
    /// Rendered width, if the node has been measured.
    pub width: Option<f64>,
    /// Rendered height, if the node has been measured.
    pub height: Option<f64>,
    pub is_trigger: bool,
}

impl LayoutNode {
    pub fn new(id: NodeId) -> Self {
        LayoutNode {
            id,
            width: None,
            height: None,
            is_trigger: false,
        }
    }

    pub fn trigger(id: NodeId) -> Self {
        LayoutNode {
            is_trigger: true,
            ..LayoutNode::new(id)
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }
}

/// A source→target arc. Handles are irrelevant to layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutEdge {
    pub source: NodeId,
    pub target: NodeId,
}

impl LayoutEdge {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        LayoutEdge { source, target }
    }
}

/// A node with its computed top-left position.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode {
    pub id: NodeId,
    pub position: Position,
    pub width: f64,
    pub height: f64,
    pub rank: usize,
}

/// Computes positions for `nodes`, returned in input order.
pub fn layout(
    nodes: &[LayoutNode],
    edges: &[LayoutEdge],
    direction: LayoutDirection,
    config: &LayoutConfig,
) -> Result<Vec<PlacedNode>, LayoutError> {
    if nodes.is_empty() {
        return Ok(Vec::new());
    }

    let sizes: Vec<(f64, f64)> = nodes
        .iter()
        .map(|n| {
            (
                n.width.unwrap_or(config.default_width),
                n.height.unwrap_or(config.default_height),
            )
        })
        .collect();

    let graph = build_graph(nodes, edges)?;
    let ranks = assign_ranks(&graph);
    let mut rank_order = build_rank_buckets(&ranks);
    minimize_crossings(&mut rank_order, &graph, config.max_sweeps);
    let centers = assign_centers(&rank_order, &sizes, direction, config);

    let mut placed: Vec<PlacedNode> = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            let (w, h) = sizes[i];
            let center = centers[i];
            PlacedNode {
                id: node.id.clone(),
                position: Position::new(center.x - w / 2.0, center.y - h / 2.0),
                width: w,
                height: h,
                rank: ranks[i],
            }
        })
        .collect();

    if direction == LayoutDirection::TopToBottom {
        apply_trigger_gap(&mut placed, nodes, config.trigger_gap);
    }

    Ok(placed)
}

// ── Graph construction ───────────────────────────────────────────────

/// Ranking graph: node weights are input indices, back edges removed.
struct RankGraph {
    dag: DiGraph<usize, ()>,
}

fn build_graph(nodes: &[LayoutNode], edges: &[LayoutEdge]) -> Result<RankGraph, LayoutError> {
    let mut full: DiGraph<usize, ()> = DiGraph::with_capacity(nodes.len(), edges.len());
    let mut index_of: HashMap<&NodeId, NodeIndex> = HashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        let idx = full.add_node(i);
        if index_of.insert(&node.id, idx).is_some() {
            return Err(LayoutError::DuplicateNode {
                id: node.id.clone(),
            });
        }
    }

    let mut seen: HashSet<(NodeIndex, NodeIndex)> = HashSet::new();
    for edge in edges {
        let source = *index_of
            .get(&edge.source)
            .ok_or_else(|| LayoutError::UnknownEndpoint {
                node: edge.source.clone(),
            })?;
        let target = *index_of
            .get(&edge.target)
            .ok_or_else(|| LayoutError::UnknownEndpoint {
                node: edge.target.clone(),
            })?;
        // Parallel success/error arcs collapse to one; self loops never rank.
        if source != target && seen.insert((source, target)) {
            full.add_edge(source, target, ());
        }
    }

    let mut back_edges: HashSet<(NodeIndex, NodeIndex)> = HashSet::new();
    depth_first_search(&full, full.node_indices(), |event| {
        if let DfsEvent::BackEdge(u, v) = event {
            back_edges.insert((u, v));
        }
    });

    let mut dag = full.clone();
    dag.retain_edges(|g, e| match g.edge_endpoints(e) {
        Some(endpoints) => !back_edges.contains(&endpoints),
        None => true,
    });

    Ok(RankGraph { dag })
}

// ── Phase 1: Rank assignment ─────────────────────────────────────────

/// Longest-path layering: sources get rank 0, every other node one more
/// than its deepest predecessor.
fn assign_ranks(graph: &RankGraph) -> Vec<usize> {
    let n = graph.dag.node_count();
    let mut ranks = vec![0usize; n];
    // Back edges were removed, so the graph is acyclic.
    let order = toposort(&graph.dag, None).unwrap_or_else(|_| graph.dag.node_indices().collect());
    for idx in order {
        let rank = graph
            .dag
            .neighbors_directed(idx, Direction::Incoming)
            .map(|pred| ranks[pred.index()] + 1)
            .max()
            .unwrap_or(0);
        ranks[idx.index()] = rank;
    }
    ranks
}

// ── Phase 2: Ordering within ranks ───────────────────────────────────

fn build_rank_buckets(ranks: &[usize]) -> Vec<Vec<usize>> {
    let max_rank = ranks.iter().copied().max().unwrap_or(0);
    let mut buckets = vec![Vec::new(); max_rank + 1];
    for (v, &r) in ranks.iter().enumerate() {
        buckets[r].push(v);
    }
    buckets
}

fn neighbors(graph: &RankGraph, v: usize, dir: Direction) -> Vec<usize> {
    graph
        .dag
        .neighbors_directed(NodeIndex::new(v), dir)
        .map(|n| n.index())
        .collect()
}

/// Mean position of `neighbors` in `fixed`. Nodes without neighbours in the
/// fixed rank keep their current slot.
fn barycenter(current_slot: usize, fixed: &[usize], neighbors: &[usize]) -> f64 {
    let positions: Vec<usize> = neighbors
        .iter()
        .filter_map(|nb| fixed.iter().position(|x| x == nb))
        .collect();
    if positions.is_empty() {
        current_slot as f64
    } else {
        positions.iter().sum::<usize>() as f64 / positions.len() as f64
    }
}

fn sweep_rank(rank_order: &mut [Vec<usize>], graph: &RankGraph, r: usize, fixed: usize, dir: Direction) {
    let fixed_rank = rank_order[fixed].clone();
    let mut scored: Vec<(usize, f64)> = rank_order[r]
        .iter()
        .enumerate()
        .map(|(slot, &v)| (v, barycenter(slot, &fixed_rank, &neighbors(graph, v, dir))))
        .collect();
    scored.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
    rank_order[r] = scored.into_iter().map(|(v, _)| v).collect();
}

fn count_crossings(upper: &[usize], lower: &[usize], graph: &RankGraph) -> usize {
    let mut arcs: Vec<(usize, usize)> = Vec::new();
    for (i, &u) in upper.iter().enumerate() {
        for v in neighbors(graph, u, Direction::Outgoing) {
            if let Some(j) = lower.iter().position(|&x| x == v) {
                arcs.push((i, j));
            }
        }
    }
    let mut crossings = 0;
    for a in 0..arcs.len() {
        for b in (a + 1)..arcs.len() {
            let (a1, b1) = arcs[a];
            let (a2, b2) = arcs[b];
            if (a1 < a2 && b1 > b2) || (a1 > a2 && b1 < b2) {
                crossings += 1;
            }
        }
    }
    crossings
}

fn total_crossings(rank_order: &[Vec<usize>], graph: &RankGraph) -> usize {
    rank_order
        .windows(2)
        .map(|pair| count_crossings(&pair[0], &pair[1], graph))
        .sum()
}

/// Alternating down/up barycenter sweeps; stops at the first round that
/// does not improve and keeps the best order seen.
fn minimize_crossings(rank_order: &mut Vec<Vec<usize>>, graph: &RankGraph, max_sweeps: usize) {
    if rank_order.len() <= 1 {
        return;
    }
    let mut best = total_crossings(rank_order, graph);
    let mut best_order = rank_order.clone();

    for _ in 0..max_sweeps {
        if best == 0 {
            break;
        }
        for r in 1..rank_order.len() {
            sweep_rank(rank_order, graph, r, r - 1, Direction::Incoming);
        }
        for r in (0..rank_order.len() - 1).rev() {
            sweep_rank(rank_order, graph, r, r + 1, Direction::Outgoing);
        }
        let crossings = total_crossings(rank_order, graph);
        if crossings < best {
            best = crossings;
            best_order = rank_order.clone();
        } else {
            break;
        }
    }
    *rank_order = best_order;
}

// ── Phase 3: Coordinate assignment ───────────────────────────────────

/// Center-anchored coordinates for every node index.
fn assign_centers(
    rank_order: &[Vec<usize>],
    sizes: &[(f64, f64)],
    direction: LayoutDirection,
    config: &LayoutConfig,
) -> Vec<Position> {
    // (extent along the rank axis, extent along the order axis)
    let extent = |v: usize| -> (f64, f64) {
        let (w, h) = sizes[v];
        match direction {
            LayoutDirection::TopToBottom => (h, w),
            LayoutDirection::LeftToRight => (w, h),
        }
    };

    let mut centers = vec![Position::default(); sizes.len()];
    let mut rank_cursor = 0.0;
    for rank_nodes in rank_order {
        if rank_nodes.is_empty() {
            continue;
        }
        let thickness = rank_nodes
            .iter()
            .map(|&v| extent(v).0)
            .fold(0.0_f64, f64::max);
        let rank_center = rank_cursor + thickness / 2.0;

        let span: f64 = rank_nodes.iter().map(|&v| extent(v).1).sum::<f64>()
            + config.node_separation * (rank_nodes.len() - 1) as f64;
        let mut order_cursor = -span / 2.0;
        for &v in rank_nodes {
            let along = extent(v).1;
            let order_center = order_cursor + along / 2.0;
            order_cursor += along + config.node_separation;
            centers[v] = match direction {
                LayoutDirection::TopToBottom => Position::new(order_center, rank_center),
                LayoutDirection::LeftToRight => Position::new(rank_center, order_center),
            };
        }
        rank_cursor += thickness + config.rank_separation;
    }
    centers
}

// ── Phase 4: Trigger gap ─────────────────────────────────────────────

/// Pushes every non-trigger node placed below the trigger down by `gap`.
fn apply_trigger_gap(placed: &mut [PlacedNode], nodes: &[LayoutNode], gap: f64) {
    let Some(trigger_y) = nodes
        .iter()
        .position(|n| n.is_trigger)
        .map(|i| placed[i].position.y)
    else {
        return;
    };
    for (node, place) in nodes.iter().zip(placed.iter_mut()) {
        if !node.is_trigger && place.position.y > trigger_y {
            place.position.y += gap;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        NodeId::new(s)
    }

    fn edge(a: &str, b: &str) -> LayoutEdge {
        LayoutEdge::new(id(a), id(b))
    }

    fn find<'a>(placed: &'a [PlacedNode], name: &str) -> &'a PlacedNode {
        placed.iter().find(|p| p.id.as_str() == name).unwrap()
    }

    #[test]
    fn empty_input_yields_nothing() {
        let placed = layout(&[], &[], LayoutDirection::TopToBottom, &LayoutConfig::default()).unwrap();
        assert!(placed.is_empty());
    }

    #[test]
    fn chain_ranks_increase_downwards() {
        let nodes = vec![
            LayoutNode::trigger(id("t")),
            LayoutNode::new(id("a")),
            LayoutNode::new(id("b")),
        ];
        let edges = vec![edge("t", "a"), edge("a", "b")];
        let placed = layout(&nodes, &edges, LayoutDirection::TopToBottom, &LayoutConfig::default()).unwrap();
        let (t, a, b) = (find(&placed, "t"), find(&placed, "a"), find(&placed, "b"));
        assert_eq!((t.rank, a.rank, b.rank), (0, 1, 2));
        assert!(t.position.y < a.position.y);
        assert!(a.position.y < b.position.y);
        // Single-node ranks are centered on x = 0.
        assert_eq!(a.position.x, -a.width / 2.0);
    }

    #[test]
    fn center_anchor_converts_to_top_left() {
        let config = LayoutConfig::default();
        let nodes = vec![LayoutNode::new(id("solo")).with_size(100.0, 40.0)];
        let placed = layout(&nodes, &[], LayoutDirection::TopToBottom, &config).unwrap();
        // Center is (0, 20): top-left must be (-50, 0).
        assert_eq!(placed[0].position, Position::new(-50.0, 0.0));
    }

    #[test]
    fn unmeasured_nodes_use_default_size() {
        let config = LayoutConfig::default();
        let nodes = vec![LayoutNode::new(id("solo"))];
        let placed = layout(&nodes, &[], LayoutDirection::TopToBottom, &config).unwrap();
        assert_eq!(placed[0].width, config.default_width);
        assert_eq!(placed[0].height, config.default_height);
    }

    #[test]
    fn siblings_do_not_overlap() {
        let config = LayoutConfig::default();
        let nodes = vec![
            LayoutNode::trigger(id("t")),
            LayoutNode::new(id("a")),
            LayoutNode::new(id("b")),
            LayoutNode::new(id("c")),
        ];
        let edges = vec![edge("t", "a"), edge("t", "b"), edge("t", "c")];
        let placed = layout(&nodes, &edges, LayoutDirection::TopToBottom, &config).unwrap();
        let mut row: Vec<&PlacedNode> = placed.iter().filter(|p| p.rank == 1).collect();
        row.sort_by(|a, b| a.position.x.total_cmp(&b.position.x));
        for pair in row.windows(2) {
            let gap = pair[1].position.x - (pair[0].position.x + pair[0].width);
            assert_eq!(gap, config.node_separation);
        }
    }

    #[test]
    fn left_to_right_stacks_ranks_horizontally() {
        let nodes = vec![LayoutNode::new(id("a")), LayoutNode::new(id("b"))];
        let placed = layout(&nodes, &[edge("a", "b")], LayoutDirection::LeftToRight, &LayoutConfig::default()).unwrap();
        let (a, b) = (find(&placed, "a"), find(&placed, "b"));
        assert!(a.position.x < b.position.x);
        assert_eq!(a.position.y, b.position.y);
    }

    #[test]
    fn cycles_still_rank() {
        let nodes = vec![
            LayoutNode::new(id("a")),
            LayoutNode::new(id("b")),
            LayoutNode::new(id("c")),
        ];
        let edges = vec![edge("a", "b"), edge("b", "c"), edge("c", "a")];
        let placed = layout(&nodes, &edges, LayoutDirection::TopToBottom, &LayoutConfig::default()).unwrap();
        let ranks: Vec<usize> = placed.iter().map(|p| p.rank).collect();
        assert_eq!(ranks, vec![0, 1, 2]);
    }

    #[test]
    fn unknown_endpoint_is_rejected() {
        let nodes = vec![LayoutNode::new(id("a"))];
        let err = layout(&nodes, &[edge("a", "ghost")], LayoutDirection::TopToBottom, &LayoutConfig::default())
            .unwrap_err();
        assert!(matches!(err, LayoutError::UnknownEndpoint { .. }));
    }

    #[test]
    fn duplicate_node_is_rejected() {
        let nodes = vec![LayoutNode::new(id("a")), LayoutNode::new(id("a"))];
        let err = layout(&nodes, &[], LayoutDirection::TopToBottom, &LayoutConfig::default()).unwrap_err();
        assert!(matches!(err, LayoutError::DuplicateNode { .. }));
    }

    #[test]
    fn barycenter_reorders_to_remove_crossing() {
        // t1 -> b, t2 -> a with a registered before b would cross without sweeps.
        let nodes = vec![
            LayoutNode::new(id("t1")),
            LayoutNode::new(id("t2")),
            LayoutNode::new(id("a")),
            LayoutNode::new(id("b")),
        ];
        let edges = vec![edge("t1", "b"), edge("t2", "a")];
        let placed = layout(&nodes, &edges, LayoutDirection::TopToBottom, &LayoutConfig::default()).unwrap();
        let (t1, t2) = (find(&placed, "t1"), find(&placed, "t2"));
        let (a, b) = (find(&placed, "a"), find(&placed, "b"));
        assert_eq!(t1.position.x < t2.position.x, b.position.x < a.position.x);
    }
}
