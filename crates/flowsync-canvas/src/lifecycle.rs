//! Node lifecycle classification and the pending-delete queue.
//!
//! A removal proposal for a node ends in one of three dispositions:
//!
//! - the trigger is *invincible*: the proposal is suppressed
//! - the selector is *ephemeral*: it is removed locally, with no operation
//! - everything else is *persistent*: it waits in [`PendingDeletes`] until
//!   the user confirms or cancels
//!
//! The queue is single-flight. Proposals made while a confirmation is open
//! join the same queue.

use flowsync_core::{GraphOperation, NodeId, NodeKind};

/// How a node's existence relates to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeLifecycle {
    /// Persisted and deletable after confirmation.
    Persistent,
    /// Persisted and never deletable.
    Invincible,
    /// Local only; never persisted.
    Ephemeral,
}

pub fn classify(kind: NodeKind) -> NodeLifecycle {
    match kind {
        NodeKind::Trigger => NodeLifecycle::Invincible,
        NodeKind::Action => NodeLifecycle::Persistent,
        NodeKind::Selector => NodeLifecycle::Ephemeral,
    }
}

/// Outcome of proposing a node for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalDisposition {
    Suppressed,
    LocalOnly,
    PendingConfirmation,
}

/// Queue of persisted nodes awaiting a delete confirmation.
#[derive(Debug, Default, Clone)]
pub struct PendingDeletes {
    queue: Vec<NodeId>,
}

impl PendingDeletes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes one node through the classifier. Persistent nodes are queued
    /// once, however often they are proposed.
    pub fn propose(&mut self, id: &NodeId, kind: NodeKind) -> RemovalDisposition {
        match classify(kind) {
            NodeLifecycle::Invincible => {
                tracing::debug!("suppressed removal of invincible node {}", id);
                RemovalDisposition::Suppressed
            }
            NodeLifecycle::Ephemeral => RemovalDisposition::LocalOnly,
            NodeLifecycle::Persistent => {
                if !self.queue.contains(id) {
                    self.queue.push(id.clone());
                }
                RemovalDisposition::PendingConfirmation
            }
        }
    }

    /// Whether the confirmation dialog should be showing.
    pub fn is_open(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn pending(&self) -> &[NodeId] {
        &self.queue
    }

    /// Confirms the queue: one `delete_node` per queued node that `exists`
    /// still accepts, in queue order. The queue is empty afterwards.
    pub fn confirm(&mut self, exists: impl Fn(&NodeId) -> bool) -> Vec<GraphOperation> {
        self.queue
            .drain(..)
            .filter(|id| {
                let present = exists(id);
                if !present {
                    tracing::warn!("skipped delete of {}: no longer on the canvas", id);
                }
                present
            })
            .map(GraphOperation::delete_node)
            .collect()
    }

    /// Cancels the queue without producing operations.
    pub fn cancel(&mut self) {
        self.queue.clear();
    }
}
