//! Property and scenario tests for the layered layout.

use flowsync_core::NodeId;
use flowsync_layout::{layout, LayoutConfig, LayoutDirection, LayoutEdge, LayoutNode, PlacedNode};
use proptest::prelude::*;

fn nodes_for(count: usize) -> Vec<LayoutNode> {
    (0..count)
        .map(|i| {
            let id = NodeId::new(format!("n{i}"));
            if i == 0 {
                LayoutNode::trigger(id)
            } else {
                LayoutNode::new(id)
            }
        })
        .collect()
}

/// Arcs only run from lower to higher index, so the graph is a DAG.
fn dag_edges(count: usize, pairs: &[(usize, usize)]) -> Vec<LayoutEdge> {
    pairs
        .iter()
        .filter_map(|&(a, b)| {
            let (a, b) = (a % count, b % count);
            if a < b {
                Some(LayoutEdge::new(
                    NodeId::new(format!("n{a}")),
                    NodeId::new(format!("n{b}")),
                ))
            } else {
                None
            }
        })
        .collect()
}

fn placed<'a>(all: &'a [PlacedNode], id: &str) -> &'a PlacedNode {
    all.iter().find(|p| p.id.as_str() == id).unwrap()
}

proptest! {
    #[test]
    fn layout_is_deterministic(count in 1usize..12, pairs in prop::collection::vec((0usize..12, 0usize..12), 0..24)) {
        let nodes = nodes_for(count);
        let edges = dag_edges(count, &pairs);
        let config = LayoutConfig::default();
        let first = layout(&nodes, &edges, LayoutDirection::TopToBottom, &config).unwrap();
        let second = layout(&nodes, &edges, LayoutDirection::TopToBottom, &config).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn arcs_point_downwards(count in 2usize..12, pairs in prop::collection::vec((0usize..12, 0usize..12), 0..24)) {
        let nodes = nodes_for(count);
        let edges = dag_edges(count, &pairs);
        let all = layout(&nodes, &edges, LayoutDirection::TopToBottom, &LayoutConfig::default()).unwrap();
        for edge in &edges {
            let source = placed(&all, edge.source.as_str());
            let target = placed(&all, edge.target.as_str());
            prop_assert!(source.position.y < target.position.y);
        }
    }

    #[test]
    fn trigger_leads_every_node(count in 2usize..12, pairs in prop::collection::vec((0usize..12, 0usize..12), 0..24)) {
        let nodes = nodes_for(count);
        let edges = dag_edges(count, &pairs);
        let all = layout(&nodes, &edges, LayoutDirection::TopToBottom, &LayoutConfig::default()).unwrap();
        let trigger_y = placed(&all, "n0").position.y;
        prop_assert!(all.iter().all(|p| p.position.y >= trigger_y));
    }
}

#[test]
fn disconnected_node_below_trigger_shifts_by_exact_gap() {
    let nodes = vec![
        LayoutNode::trigger(NodeId::new("t")),
        LayoutNode::new(NodeId::new("a")),
        LayoutNode::new(NodeId::new("x")),
        LayoutNode::new(NodeId::new("d")),
    ];
    // x -> d is a component with no path from the trigger.
    let edges = vec![
        LayoutEdge::new(NodeId::new("t"), NodeId::new("a")),
        LayoutEdge::new(NodeId::new("x"), NodeId::new("d")),
    ];
    let without_gap = LayoutConfig {
        trigger_gap: 0.0,
        ..LayoutConfig::default()
    };
    let with_gap = LayoutConfig::default();

    let base = layout(&nodes, &edges, LayoutDirection::TopToBottom, &without_gap).unwrap();
    let shifted = layout(&nodes, &edges, LayoutDirection::TopToBottom, &with_gap).unwrap();

    let trigger_y = placed(&base, "t").position.y;
    assert!(placed(&base, "d").position.y > trigger_y);
    assert_eq!(
        placed(&shifted, "d").position.y - placed(&base, "d").position.y,
        with_gap.trigger_gap
    );
    // Nodes level with the trigger and the trigger itself stay put.
    assert_eq!(placed(&shifted, "t").position, placed(&base, "t").position);
    assert_eq!(placed(&shifted, "x").position, placed(&base, "x").position);
}

#[test]
fn left_to_right_skips_trigger_gap() {
    let nodes = vec![
        LayoutNode::trigger(NodeId::new("t")),
        LayoutNode::new(NodeId::new("a")),
        LayoutNode::new(NodeId::new("b")),
    ];
    let edges = vec![
        LayoutEdge::new(NodeId::new("t"), NodeId::new("a")),
        LayoutEdge::new(NodeId::new("t"), NodeId::new("b")),
    ];
    let without_gap = LayoutConfig {
        trigger_gap: 0.0,
        ..LayoutConfig::default()
    };
    let base = layout(&nodes, &edges, LayoutDirection::LeftToRight, &without_gap).unwrap();
    let other = layout(&nodes, &edges, LayoutDirection::LeftToRight, &LayoutConfig::default()).unwrap();
    assert_eq!(base, other);
}

#[test]
fn config_round_trips_through_json() {
    let json = serde_json::to_value(LayoutDirection::TopToBottom).unwrap();
    assert_eq!(json, "TB");
    let config: LayoutConfig = serde_json::from_value(serde_json::to_value(LayoutConfig::default()).unwrap()).unwrap();
    assert_eq!(config, LayoutConfig::default());
}
