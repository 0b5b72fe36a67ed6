//! HTTP handler modules for the flowsync API.
//!
//! Handlers parse the request, take the store lock, delegate to the
//! [`GraphStore`](flowsync_storage::GraphStore) and return JSON.

pub mod graphs;
