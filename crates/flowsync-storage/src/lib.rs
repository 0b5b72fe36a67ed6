//! Storage abstraction for flowsync graph documents.
//!
//! Provides the [`GraphStore`] trait defining the versioned store contract
//! and the [`InMemoryStore`] reference backend.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`types`]: GraphSummary listing type
//! - [`traits`]: GraphStore trait definition
//! - [`document`]: one graph document and its operation semantics
//! - [`memory`]: InMemoryStore implementation

pub mod document;
pub mod error;
pub mod memory;
pub mod traits;
pub mod types;

pub use document::GraphDocument;
pub use error::StorageError;
pub use memory::InMemoryStore;
pub use traits::GraphStore;
pub use types::GraphSummary;
