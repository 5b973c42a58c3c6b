//! Record storage for the Stowage put pipeline.
//!
//! The pipeline treats the store as an opaque low-level collaborator: it
//! inserts records, updates records matched by a [`Selection`], and never
//! interprets column contents.
//!
//! # Storage Backends
//!
//! All backends implement the [`RecordStore`] trait:
//!
//! - [`InMemoryRecordStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Row ids are assigned by the store and never reused within a target.
//! 2. Updates report the number of affected rows; zero is a valid answer.
//! 3. Concurrent reads are always safe.
//! 4. All I/O errors are propagated, never silently ignored.
//!
//! [`Selection`]: stowage_types::Selection

pub mod error;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryRecordStore;
pub use traits::{Record, RecordStore};
