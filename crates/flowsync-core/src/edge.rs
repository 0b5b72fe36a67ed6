//! Edge types and the rules tying an edge's source to its handle.
//!
//! An edge sourced at the trigger carries no handle. An edge sourced at an
//! action always lands on either the `success` or the `error` branch, with
//! `success` as the default when the caller did not pick one.

use serde::{Deserialize, Serialize};

use crate::id::{EdgeId, NodeId};

/// Whether an edge leaves the trigger or an action (`udf`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Trigger,
    Udf,
}

impl SourceType {
    /// Derives the source type from the source node id.
    pub fn of(source: &NodeId) -> Self {
        if source.denotes_trigger() {
            SourceType::Trigger
        } else {
            SourceType::Udf
        }
    }
}

/// Outgoing branch of an action node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceHandle {
    #[default]
    Success,
    Error,
}

impl SourceHandle {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceHandle::Success => "success",
            SourceHandle::Error => "error",
        }
    }
}

/// Normalizes a requested handle against the source type: dropped for the
/// trigger, defaulted to `success` for actions.
pub fn effective_handle(
    source_type: SourceType,
    requested: Option<SourceHandle>,
) -> Option<SourceHandle> {
    match source_type {
        SourceType::Trigger => None,
        SourceType::Udf => Some(requested.unwrap_or_default()),
    }
}

/// An edge as held by the graph store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default, rename = "sourceHandle", skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<SourceHandle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl GraphEdge {
    /// Builds an edge with the canonical id for its endpoints and handle.
    pub fn connect(source: NodeId, target: NodeId, source_handle: Option<SourceHandle>) -> Self {
        let handle = effective_handle(SourceType::of(&source), source_handle);
        GraphEdge {
            id: canonical_edge_id(&source, &target, handle),
            source,
            target,
            source_handle: handle,
            label: None,
        }
    }

    pub fn source_type(&self) -> SourceType {
        SourceType::of(&self.source)
    }

    /// Returns `true` if either endpoint is `node`.
    pub fn touches(&self, node: &NodeId) -> bool {
        &self.source == node || &self.target == node
    }

    /// Returns `true` if this edge connects `source` to `target` through
    /// the effective form of `handle`.
    pub fn matches(&self, source: &NodeId, target: &NodeId, handle: Option<SourceHandle>) -> bool {
        &self.source == source
            && &self.target == target
            && self.source_handle == effective_handle(SourceType::of(source), handle)
    }
}

/// Edge id derived from the endpoints, so the same connection always maps
/// to the same id.
pub fn canonical_edge_id(
    source: &NodeId,
    target: &NodeId,
    handle: Option<SourceHandle>,
) -> EdgeId {
    match handle {
        Some(h) => EdgeId(format!("{source}:{}->{target}", h.as_str())),
        None => EdgeId(format!("{source}->{target}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::GraphId;

    fn trigger() -> NodeId {
        NodeId::trigger(GraphId(uuid::Uuid::nil()))
    }

    #[test]
    fn source_type_follows_trigger_id() {
        assert_eq!(SourceType::of(&trigger()), SourceType::Trigger);
        assert_eq!(SourceType::of(&NodeId::new("a1")), SourceType::Udf);
    }

    #[test]
    fn trigger_edges_drop_handle() {
        let edge = GraphEdge::connect(trigger(), NodeId::new("a1"), Some(SourceHandle::Error));
        assert_eq!(edge.source_handle, None);
        assert_eq!(edge.source_type(), SourceType::Trigger);
    }

    #[test]
    fn action_edges_default_to_success() {
        let edge = GraphEdge::connect(NodeId::new("a1"), NodeId::new("a2"), None);
        assert_eq!(edge.source_handle, Some(SourceHandle::Success));
        assert_eq!(edge.id, EdgeId::new("a1:success->a2"));
    }

    #[test]
    fn success_and_error_branches_get_distinct_ids() {
        let ok = GraphEdge::connect(NodeId::new("a1"), NodeId::new("a2"), None);
        let err = GraphEdge::connect(NodeId::new("a1"), NodeId::new("a2"), Some(SourceHandle::Error));
        assert_ne!(ok.id, err.id);
        assert!(err.matches(&NodeId::new("a1"), &NodeId::new("a2"), Some(SourceHandle::Error)));
        assert!(!err.matches(&NodeId::new("a1"), &NodeId::new("a2"), None));
    }

    #[test]
    fn wire_shape_uses_source_handle_key() {
        let edge = GraphEdge::connect(NodeId::new("a1"), NodeId::new("a2"), Some(SourceHandle::Error));
        let json = serde_json::to_value(&edge).unwrap();
        assert_eq!(json["sourceHandle"], "error");
        assert!(json.get("label").is_none());
    }
}
