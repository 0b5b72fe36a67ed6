//! Automatic layered layout for flowsync workflow graphs.
//!
//! [`layout`] is pure: it takes measured (or default-sized) nodes and plain
//! source→target arcs and returns top-left anchored positions. Persisting the
//! result is the caller's job.

pub mod config;
pub mod error;
pub mod layered;

pub use config::{LayoutConfig, LayoutDirection};
pub use error::LayoutError;
pub use layered::{layout, LayoutEdge, LayoutNode, PlacedNode};
