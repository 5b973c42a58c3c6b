//! Value model for the Stowage put pipeline.
//!
//! These types describe what travels between a domain object's resolver and
//! the underlying record store. Every other Stowage crate depends on
//! `stowage-types`.
//!
//! # Key Types
//!
//! - [`Value`] — A single column value
//! - [`RecordValues`] — Column name to value mapping for one record
//! - [`Selection`] — Equality filter identifying existing rows
//! - [`Target`] — Name of a record collection
//! - [`Location`] — Address of an inserted row (`target/row_id`)
//! - [`TypeKey`] — Exact runtime identity of a domain type

pub mod error;
pub mod location;
pub mod record;
pub mod type_key;
pub mod value;

pub use error::TypeError;
pub use location::{Location, RowId, Target};
pub use record::{RecordValues, Selection};
pub use type_key::TypeKey;
pub use value::Value;
