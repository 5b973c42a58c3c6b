//! Stowage: a typed put pipeline for object collections.
//!
//! A [`Stowage`] facade builds prepared operations. A prepared put resolves
//! how its objects are written once, at `prepare()`, and can then be run any
//! number of times through one of four adapters: blocking, a single-value
//! future, a stream of at most one item, or a completion future. Every run
//! passes once through the facade's interceptor chain.
//!
//! ```
//! use std::sync::Arc;
//!
//! use serde::Serialize;
//! use stowage::{
//!     DefaultPutResolver, InMemoryRecordStore, PreparedOperation, SerdeMapping, Stowage,
//!     Target, TypeMapping,
//! };
//!
//! #[derive(Serialize)]
//! struct Tweet {
//!     id: Option<i64>,
//!     content: String,
//! }
//!
//! let tweets = Target::new("tweets").unwrap();
//! let stowage = Stowage::builder()
//!     .record_store(Arc::new(InMemoryRecordStore::new()))
//!     .add_type_mapping(TypeMapping::<Tweet>::new(DefaultPutResolver::new(
//!         SerdeMapping::new(tweets, "id"),
//!     )))
//!     .build()
//!     .unwrap();
//!
//! let results = stowage
//!     .put()
//!     .objects(vec![
//!         Tweet { id: Some(1), content: "first".into() },
//!         Tweet { id: Some(2), content: "second".into() },
//!     ])
//!     .prepare()
//!     .execute_as_blocking()
//!     .unwrap();
//!
//! assert_eq!(results.number_of_inserts(), 2);
//! ```

pub mod config;
pub mod error;
pub mod execution;
pub mod interceptor;
pub mod interceptors;
pub mod low_level;
pub mod mapping;
pub mod operation;
pub mod put;
pub mod scheduler;
pub mod stowage;

#[cfg(test)]
mod testing;

pub use config::StowageConfig;
pub use error::{ExecutionCause, StowageError, StowageResult};
pub use execution::{BackpressureStrategy, Completion, ResultStream, Single};
pub use interceptor::{Chain, Interceptor};
pub use interceptors::LoggingInterceptor;
pub use low_level::{DefaultLowLevel, LowLevel};
pub use mapping::{ErasedTypeMapping, TypeMapping, TypeMappingRegistry};
pub use operation::{Operation, OperationKind, OperationOutput, PreparedOperation};
pub use put::{
    put_resolver_fn, DefaultPutResolver, PreparedPut, PreparedPutCollectionOfObjects,
    PreparedPutCollectionOfObjectsBuilder, PreparedPutObject, PreparedPutObjectBuilder,
    PutResolver, PutResult, PutResults, RecordMapping, SerdeMapping,
};
pub use scheduler::Scheduler;
pub use stowage::{Stowage, StowageBuilder};

// Re-export key types
pub use stowage_store::{InMemoryRecordStore, Record, RecordStore, StoreError, StoreResult};
pub use stowage_types::{Location, RecordValues, RowId, Selection, Target, TypeKey, Value};
