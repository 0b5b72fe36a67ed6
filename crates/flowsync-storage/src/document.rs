//! A single stored graph document and the rules for applying operations.
//!
//! [`GraphDocument`] keeps nodes and edges in insertion order so that every
//! snapshot of the same document lists them identically. Operation batches
//! are applied to a clone and swapped in only when every operation succeeds.

use indexmap::IndexMap;

use flowsync_core::{
    canonical_edge_id, CoreError, EdgeId, GraphEdge, GraphKey, GraphNode, GraphOperation,
    GraphState, NodeId, NodePosition, Position, SourceHandle, SourceType, Viewport,
    TRIGGER_NODE_TYPE,
};

use crate::error::StorageError;

/// Data stored for one graph.
#[derive(Debug, Clone)]
pub struct GraphDocument {
    title: String,
    version: u64,
    trigger_id: NodeId,
    nodes: IndexMap<NodeId, GraphNode>,
    edges: IndexMap<EdgeId, GraphEdge>,
    viewport: Viewport,
}

impl GraphDocument {
    /// Creates version 1 of a graph holding only its trigger at the origin.
    pub fn new(key: GraphKey, title: &str) -> Self {
        let trigger_id = key.trigger_node_id();
        let trigger = GraphNode {
            id: trigger_id.clone(),
            node_type: TRIGGER_NODE_TYPE.to_string(),
            position: Position::default(),
            data: serde_json::json!({ "title": "Trigger", "type": TRIGGER_NODE_TYPE }),
        };
        let mut nodes = IndexMap::new();
        nodes.insert(trigger_id.clone(), trigger);

        GraphDocument {
            title: title.to_string(),
            version: 1,
            trigger_id,
            nodes,
            edges: IndexMap::new(),
            viewport: Viewport::default(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn snapshot(&self) -> GraphState {
        GraphState {
            version: self.version,
            nodes: self.nodes.values().cloned().collect(),
            edges: self.edges.values().cloned().collect(),
            viewport: self.viewport,
        }
    }

    /// Applies `operations` as one all-or-nothing batch and bumps the
    /// version exactly once.
    ///
    /// The caller is responsible for the base-version check.
    pub fn apply_batch(&mut self, operations: &[GraphOperation]) -> Result<(), StorageError> {
        let mut next = self.clone();
        for operation in operations {
            next.apply(operation)
                .map_err(|source| StorageError::InvalidOperation {
                    operation: operation.name(),
                    source,
                })?;
        }
        next.version = self.version + 1;
        *self = next;
        Ok(())
    }

    fn apply(&mut self, operation: &GraphOperation) -> Result<(), CoreError> {
        match operation {
            GraphOperation::AddNode {
                action_type,
                title,
                position_x,
                position_y,
            } => {
                if action_type == TRIGGER_NODE_TYPE {
                    return Err(CoreError::InvalidNode {
                        reason: "a graph holds exactly one trigger".to_string(),
                    });
                }
                let id = NodeId::generate_action();
                self.nodes.insert(
                    id.clone(),
                    GraphNode {
                        id,
                        node_type: action_type.clone(),
                        position: Position::new(*position_x, *position_y),
                        data: serde_json::json!({ "title": title, "type": action_type }),
                    },
                );
                Ok(())
            }
            GraphOperation::AddEdge {
                source_id,
                source_type,
                target_id,
                source_handle,
            } => self.add_edge(source_id, *source_type, target_id, *source_handle),
            GraphOperation::DeleteNode { action_id } => self.delete_node(action_id),
            GraphOperation::DeleteEdge {
                source_id,
                source_type,
                target_id,
                source_handle,
            } => {
                let handle = self.check_source_type(source_id, *source_type, *source_handle)?;
                let id = canonical_edge_id(source_id, target_id, handle);
                self.edges
                    .shift_remove(&id)
                    .map(|_| ())
                    .ok_or(CoreError::EdgeNotFound { id })
            }
            GraphOperation::MoveNodes { positions } => {
                self.move_nodes(positions);
                Ok(())
            }
            GraphOperation::UpdateTriggerPosition { x, y } => {
                if let Some(trigger) = self.nodes.get_mut(&self.trigger_id) {
                    trigger.position = Position::new(*x, *y);
                }
                Ok(())
            }
            GraphOperation::UpdateViewport { x, y, zoom } => {
                self.viewport = Viewport {
                    x: *x,
                    y: *y,
                    zoom: *zoom,
                };
                Ok(())
            }
        }
    }

    fn add_edge(
        &mut self,
        source: &NodeId,
        source_type: SourceType,
        target: &NodeId,
        handle: Option<SourceHandle>,
    ) -> Result<(), CoreError> {
        if !self.nodes.contains_key(source) {
            return Err(CoreError::NodeNotFound { id: source.clone() });
        }
        if !self.nodes.contains_key(target) {
            return Err(CoreError::NodeNotFound { id: target.clone() });
        }
        if target == &self.trigger_id {
            return Err(CoreError::InvalidEdge {
                reason: "the trigger cannot be an edge target".to_string(),
            });
        }
        if source == target {
            return Err(CoreError::InvalidEdge {
                reason: format!("self-loop on {source}"),
            });
        }
        let handle = self.check_source_type(source, source_type, handle)?;

        let edge = GraphEdge::connect(source.clone(), target.clone(), handle);
        if self.edges.contains_key(&edge.id) {
            return Err(CoreError::InvalidEdge {
                reason: format!("edge {} already exists", edge.id),
            });
        }
        self.edges.insert(edge.id.clone(), edge);
        Ok(())
    }

    /// Verifies the declared source type against the actual source node and
    /// returns the effective handle.
    fn check_source_type(
        &self,
        source: &NodeId,
        declared: SourceType,
        handle: Option<SourceHandle>,
    ) -> Result<Option<SourceHandle>, CoreError> {
        let actual = if source == &self.trigger_id {
            SourceType::Trigger
        } else {
            SourceType::Udf
        };
        if actual != declared {
            return Err(CoreError::InvalidEdge {
                reason: format!("source {source} declared as {declared:?} but is {actual:?}"),
            });
        }
        Ok(flowsync_core::effective_handle(actual, handle))
    }

    fn delete_node(&mut self, id: &NodeId) -> Result<(), CoreError> {
        if id == &self.trigger_id {
            return Err(CoreError::TriggerUndeletable { id: id.clone() });
        }
        if self.nodes.shift_remove(id).is_none() {
            return Err(CoreError::NodeNotFound { id: id.clone() });
        }
        self.edges.retain(|_, edge| !edge.touches(id));
        Ok(())
    }

    fn move_nodes(&mut self, positions: &[NodePosition]) {
        for pos in positions {
            if pos.action_id == self.trigger_id {
                tracing::debug!("move_nodes ignores trigger {}", pos.action_id);
                continue;
            }
            match self.nodes.get_mut(&pos.action_id) {
                Some(node) => node.position = Position::new(pos.x, pos.y),
                None => tracing::debug!("move_nodes skips unknown node {}", pos.action_id),
            }
        }
    }
}
