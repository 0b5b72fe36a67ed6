//! Client-side graph synchronization for the flowsync canvas.
//!
//! The crate keeps a local canvas consistent with a versioned graph held by
//! a remote store:
//!
//! - [`api`]: the [`GraphApi`] seam, with [`http`] and [`local`] backends
//! - [`coordinator`]: optimistic apply with a single retry on conflict
//! - [`projector`]: snapshot → canvas projection and ephemeral pruning
//! - [`encoder`]: canvas interactions → [`GraphOperation`] batches
//! - [`lifecycle`]: node classification and the pending-delete queue
//! - [`arrange`]: auto-layout over the pruned canvas
//! - [`session`]: [`CanvasSession`], the interaction entry points
//!
//! [`GraphOperation`]: flowsync_core::GraphOperation

pub mod api;
pub mod arrange;
pub mod canvas;
pub mod coordinator;
pub mod encoder;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod local;
pub mod notify;
pub mod projector;
pub mod session;

pub use api::GraphApi;
pub use arrange::{arrange, NodeSizes};
pub use canvas::{CanvasEdge, CanvasNode, CanvasSnapshot};
pub use coordinator::MutationCoordinator;
pub use encoder::PendingConnection;
pub use error::SyncError;
pub use http::{CreatedGraph, HttpGraphApi};
pub use lifecycle::{classify, NodeLifecycle, PendingDeletes, RemovalDisposition};
pub use local::LocalGraphApi;
pub use notify::{Notification, NotificationLevel};
pub use projector::{project, prune};
pub use session::{CanvasSession, PendingSelector};
