//! One open graph on the canvas.
//!
//! [`CanvasSession`] ties the interaction handlers to a single
//! [`MutationCoordinator`]. Local canvas state only ever changes in two ways:
//!
//! - immediate, UI-driven edits (selection, dragging, the selector node)
//! - adoption of an authoritative snapshot after a successful apply or fetch
//!
//! Structural edits therefore never appear locally before the store has
//! accepted them. Entry points do not return errors: a failed interaction
//! is logged and becomes a [`Notification`].

use std::collections::HashSet;

use flowsync_core::{
    EdgeId, GraphNode, GraphOperation, GraphState, NodeId, NodeKind, Position, SourceHandle,
    Viewport,
};
use flowsync_layout::{LayoutConfig, LayoutDirection};

use crate::api::GraphApi;
use crate::arrange::{arrange, NodeSizes};
use crate::canvas::{CanvasEdge, CanvasNode};
use crate::coordinator::MutationCoordinator;
use crate::encoder::{self, PendingConnection};
use crate::error::SyncError;
use crate::lifecycle::{PendingDeletes, RemovalDisposition};
use crate::notify::Notification;
use crate::projector::project;

/// A selector node waiting for the user to pick an action.
///
/// Returned by [`CanvasSession::drop_connection_on_pane`] and handed back to
/// [`CanvasSession::resolve_selector`] or
/// [`CanvasSession::dismiss_selector`].
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSelector {
    pub selector_id: NodeId,
    pub position: Position,
    pub connection: PendingConnection,
}

pub struct CanvasSession<A> {
    coordinator: MutationCoordinator<A>,
    graph: Option<GraphState>,
    nodes: Vec<CanvasNode>,
    edges: Vec<CanvasEdge>,
    viewport: Viewport,
    sizes: NodeSizes,
    pending_deletes: PendingDeletes,
    notifications: Vec<Notification>,
    layout_config: LayoutConfig,
    direction: LayoutDirection,
}

impl<A: GraphApi> CanvasSession<A> {
    pub fn new(api: A) -> Self {
        CanvasSession {
            coordinator: MutationCoordinator::new(api),
            graph: None,
            nodes: Vec::new(),
            edges: Vec::new(),
            viewport: Viewport::default(),
            sizes: NodeSizes::new(),
            pending_deletes: PendingDeletes::new(),
            notifications: Vec::new(),
            layout_config: LayoutConfig::default(),
            direction: LayoutDirection::default(),
        }
    }

    pub fn with_layout_config(mut self, config: LayoutConfig) -> Self {
        self.layout_config = config;
        self
    }

    pub fn coordinator(&self) -> &MutationCoordinator<A> {
        &self.coordinator
    }

    pub fn nodes(&self) -> &[CanvasNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[CanvasEdge] {
        &self.edges
    }

    pub fn node(&self, id: &NodeId) -> Option<&CanvasNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Last snapshot adopted from the store.
    pub fn graph(&self) -> Option<&GraphState> {
        self.graph.as_ref()
    }

    pub fn version(&self) -> Option<u64> {
        self.graph.as_ref().map(|g| g.version)
    }

    pub fn pending_deletes(&self) -> &PendingDeletes {
        &self.pending_deletes
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Records the rendered size of a node for the next auto-layout.
    pub fn set_node_size(&mut self, id: NodeId, width: f64, height: f64) {
        self.sizes.insert(id, (width, height));
    }

    /// Fetches the graph and replaces all local state with it.
    pub async fn open(&mut self) -> bool {
        match self.coordinator.load().await {
            Ok(graph) => {
                self.adopt(graph);
                true
            }
            Err(err) => {
                self.fail("Could not load workflow", &err);
                false
            }
        }
    }

    /// Re-fetches the graph, discarding unsaved local positions.
    pub async fn refresh(&mut self) -> bool {
        match self.coordinator.refresh().await {
            Ok(graph) => {
                self.adopt(graph);
                true
            }
            Err(err) => {
                self.fail("Could not refresh workflow", &err);
                false
            }
        }
    }

    /// Creates an action at `at` and returns its store-assigned id.
    pub async fn add_action(&mut self, action_type: &str, title: &str, at: Position) -> Option<NodeId> {
        let before = self.known_node_ids();
        let op = encoder::new_action(action_type, title, at);
        let graph = self.submit(vec![op], "Could not add step").await?;
        let created = created_node(&before, &graph, action_type, at);
        if created.is_none() {
            self.created_node_missing(action_type);
        }
        created
    }

    /// Connects two existing nodes.
    pub async fn connect(
        &mut self,
        source: NodeId,
        target: NodeId,
        handle: Option<SourceHandle>,
    ) -> bool {
        let op = encoder::connect(source, target, handle);
        self.submit(vec![op], "Could not connect steps").await.is_some()
    }

    /// Places a selector where a connection from `connection.source` was
    /// dropped on empty canvas. Nothing is sent to the store.
    pub fn drop_connection_on_pane(
        &mut self,
        connection: PendingConnection,
        at: Position,
    ) -> PendingSelector {
        let selector_id = NodeId::generate_selector();
        self.nodes
            .push(CanvasNode::selector(selector_id.clone(), at));
        self.edges.push(CanvasEdge {
            id: flowsync_core::canonical_edge_id(&connection.source, &selector_id, connection.handle),
            source: connection.source.clone(),
            target: selector_id.clone(),
            source_handle: connection.handle,
            label: None,
            selected: false,
        });
        PendingSelector {
            selector_id,
            position: at,
            connection,
        }
    }

    /// Turns the selector into a real action wired to the pending connection.
    ///
    /// Issues two separate applies: the node first, then the edge to the
    /// node id the store assigned. Returns the new node id once the node
    /// exists, even if the edge could not be added.
    pub async fn resolve_selector(
        &mut self,
        selector: PendingSelector,
        action_type: &str,
        title: &str,
    ) -> Option<NodeId> {
        let PendingSelector {
            selector_id,
            position,
            connection,
        } = selector;

        let before = self.known_node_ids();
        let op = encoder::new_action(action_type, title, position);
        let graph = self.submit(vec![op], "Could not add step").await?;

        let Some(created) = created_node(&before, &graph, action_type, position) else {
            self.created_node_missing(action_type);
            return None;
        };
        self.remove_local(&selector_id);

        if !graph.contains_node(&connection.source) {
            tracing::warn!(
                "connection source {} vanished before {} was wired",
                connection.source,
                created
            );
            self.notifications.push(Notification::error(
                "Could not connect steps",
                format!("{} no longer exists", connection.source),
            ));
            return Some(created);
        }

        let op = encoder::complete_connection(connection, created.clone());
        self.submit(vec![op], "Could not connect steps").await;
        Some(created)
    }

    /// Removes the selector and its dangling edge without touching the store.
    pub fn dismiss_selector(&mut self, selector: &PendingSelector) {
        self.remove_local(&selector.selector_id);
    }

    /// Replaces the node selection.
    pub fn select(&mut self, ids: &[NodeId]) {
        for node in &mut self.nodes {
            node.selected = ids.contains(&node.id);
        }
    }

    /// Replaces the edge selection.
    pub fn select_edges(&mut self, ids: &[EdgeId]) {
        for edge in &mut self.edges {
            edge.selected = ids.contains(&edge.id);
        }
    }

    /// Moves a node locally while it is being dragged.
    pub fn drag_node(&mut self, id: &NodeId, to: Position) {
        match self.nodes.iter_mut().find(|n| &n.id == id) {
            Some(node) => node.position = to,
            None => tracing::debug!("drag of unknown node {}", id),
        }
    }

    /// Persists all positions after a drag. Local positions stay put if the
    /// save fails.
    pub async fn drag_stop(&mut self) -> bool {
        let Some(graph) = self.graph.as_ref() else {
            self.fail("Could not save positions", &SyncError::NotLoaded);
            return false;
        };
        let ops = encoder::drag_stop(&self.nodes, &self.edges, graph);
        if ops.is_empty() {
            return true;
        }
        self.submit(ops, "Could not save positions").await.is_some()
    }

    /// Persists the viewport once panning or zooming settles.
    pub async fn settle_viewport(&mut self, viewport: Viewport) -> bool {
        self.viewport = viewport;
        let op = encoder::viewport_settle(viewport);
        self.submit(vec![op], "Could not save view").await.is_some()
    }

    /// Routes a node removal request through the lifecycle classifier.
    ///
    /// Unknown ids are skipped. Ephemeral nodes are removed locally at
    /// once; persisted nodes wait for [`Self::confirm_removal`].
    pub fn request_node_removal(&mut self, ids: &[NodeId]) -> Vec<RemovalDisposition> {
        let mut dispositions = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(kind) = self.node(id).map(|n| n.kind) else {
                tracing::warn!("skipped removal of unknown node {}", id);
                continue;
            };
            let disposition = self.pending_deletes.propose(id, kind);
            if disposition == RemovalDisposition::LocalOnly {
                self.remove_local(id);
            }
            dispositions.push(disposition);
        }
        dispositions
    }

    /// Deletes every queued node in one batch. Attached edges go with them
    /// in the store.
    ///
    /// Queued nodes that have disappeared from the canvas since they were
    /// proposed, e.g. deleted by another session, are dropped from the batch.
    pub async fn confirm_removal(&mut self) -> bool {
        if let Some(graph) = self.graph.as_ref() {
            for id in self.pending_deletes.pending() {
                let attached = graph.edges_touching(id).count();
                if attached > 0 {
                    tracing::debug!("deleting {} takes {} connection(s) with it", id, attached);
                }
            }
        }
        let nodes = &self.nodes;
        let ops = self
            .pending_deletes
            .confirm(|id| nodes.iter().any(|n| &n.id == id));
        if ops.is_empty() {
            return true;
        }
        self.submit(ops, "Could not delete steps").await.is_some()
    }

    pub fn cancel_removal(&mut self) {
        self.pending_deletes.cancel();
    }

    /// Deletes the selected edges among `ids` in one batch.
    pub async fn remove_edges(&mut self, ids: &[EdgeId]) -> bool {
        let ops = encoder::edge_deletions(&self.edges, ids);
        if ops.is_empty() {
            return true;
        }
        self.submit(ops, "Could not delete connections").await.is_some()
    }

    /// Lays out the canvas, shows the result immediately and persists it
    /// as a position batch.
    pub async fn auto_layout(&mut self) -> bool {
        let placed = match arrange(
            &self.nodes,
            &self.edges,
            &self.sizes,
            self.direction,
            &self.layout_config,
        ) {
            Ok(placed) => placed,
            Err(err) => {
                self.fail("Could not arrange workflow", &err);
                return false;
            }
        };
        for (id, position) in placed {
            if let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) {
                node.position = position;
            }
        }
        self.drag_stop().await
    }

    /// Sends `operations` through the coordinator. Success replaces local
    /// state with the returned snapshot; failure leaves it untouched.
    async fn submit(&mut self, operations: Vec<GraphOperation>, failure: &str) -> Option<GraphState> {
        match self.coordinator.apply_with_retry(&operations).await {
            Ok(graph) => {
                self.adopt(graph.clone());
                Some(graph)
            }
            Err(err) => {
                self.fail(failure, &err);
                None
            }
        }
    }

    fn adopt(&mut self, graph: GraphState) {
        let selected_nodes: HashSet<NodeId> = self
            .nodes
            .iter()
            .filter(|n| n.selected)
            .map(|n| n.id.clone())
            .collect();
        let selected_edges: HashSet<&EdgeId> = self
            .edges
            .iter()
            .filter(|e| e.selected)
            .map(|e| &e.id)
            .collect();

        let mut canvas = project(&graph, &selected_nodes);
        for edge in &mut canvas.edges {
            edge.selected = selected_edges.contains(&edge.id);
        }

        // Open selectors are local state; the snapshot never carries them.
        let selectors = self.nodes.iter().filter(|n| n.id.denotes_selector());
        canvas.nodes.extend(selectors.cloned());
        let dangling = self
            .edges
            .iter()
            .filter(|e| e.target.denotes_selector() && graph.contains_node(&e.source));
        canvas.edges.extend(dangling.cloned());

        self.nodes = canvas.nodes;
        self.edges = canvas.edges;
        self.viewport = graph.viewport;
        self.graph = Some(graph);
    }

    fn remove_local(&mut self, id: &NodeId) {
        self.nodes.retain(|n| &n.id != id);
        self.edges.retain(|e| !e.touches(id));
        self.sizes.remove(id);
    }

    fn known_node_ids(&self) -> HashSet<NodeId> {
        self.graph
            .iter()
            .flat_map(|g| g.nodes.iter().map(|n| n.id.clone()))
            .collect()
    }

    fn created_node_missing(&mut self, action_type: &str) {
        tracing::warn!("new {} step not found in the returned graph", action_type);
        self.notifications.push(Notification::error(
            "Could not add step",
            format!("the new {action_type} step was saved but could not be located"),
        ));
    }

    fn fail(&mut self, title: &str, err: &dyn std::error::Error) {
        tracing::warn!("{}: {}", title, err);
        self.notifications
            .push(Notification::error(title, err.to_string()));
    }
}

/// The action `graph` gained relative to `before` with the given type.
///
/// Other writers may have added nodes of the same type in the same round
/// trip, so among several candidates the one at `at` wins. Positions are
/// compared with a tolerance since they have been through JSON.
fn created_node(
    before: &HashSet<NodeId>,
    graph: &GraphState,
    action_type: &str,
    at: Position,
) -> Option<NodeId> {
    let candidates: Vec<&GraphNode> = graph
        .nodes
        .iter()
        .filter(|n| n.kind() == NodeKind::Action && !before.contains(&n.id))
        .filter(|n| n.node_type == action_type)
        .collect();
    let created = match candidates.as_slice() {
        [only] => Some(*only),
        many => many.iter().rev().copied().find(|n| same_spot(n.position, at)),
    };
    created.map(|n| n.id.clone())
}

fn same_spot(a: Position, b: Position) -> bool {
    const TOLERANCE: f64 = 1e-6;
    let close = |p: f64, q: f64| (p - q).abs() <= TOLERANCE * q.abs().max(1.0);
    close(a.x, b.x) && close(a.y, b.y)
}
