//! HTTP/JSON Graph API for flowsync workflow graphs.
//!
//! Serves fetch, batch apply (with optimistic version checks) and graph
//! creation over the in-memory reference store.

pub mod error;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod state;
