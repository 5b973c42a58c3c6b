//! Put operations: builders, prepared operations, resolvers and results.

pub mod collection;
pub mod default_resolver;
pub mod object;
pub mod resolver;
pub mod result;

pub use collection::{PreparedPutCollectionOfObjects, PreparedPutCollectionOfObjectsBuilder};
pub use default_resolver::{DefaultPutResolver, RecordMapping, SerdeMapping};
pub use object::{PreparedPutObject, PreparedPutObjectBuilder};
pub use resolver::{put_resolver_fn, FnPutResolver, PutResolver};
pub use result::{PutResult, PutResults};

use std::sync::Arc;

use crate::stowage::Stowage;

/// Entry point returned by [`Stowage::put`].
#[must_use]
pub struct PreparedPut {
    stowage: Stowage,
}

impl PreparedPut {
    pub(crate) fn new(stowage: Stowage) -> Self {
        Self { stowage }
    }

    /// Put a single object.
    pub fn object<T>(self, object: T) -> PreparedPutObjectBuilder<T>
    where
        T: Send + Sync + 'static,
    {
        PreparedPutObjectBuilder::new(self.stowage, object)
    }

    /// Put an ordered collection of objects.
    ///
    /// Accepts a `Vec<T>` or an already shared `Arc<Vec<T>>`; in the latter
    /// case the operation shares the caller's collection.
    pub fn objects<T>(self, objects: impl Into<Arc<Vec<T>>>) -> PreparedPutCollectionOfObjectsBuilder<T>
    where
        T: Send + Sync + 'static,
    {
        PreparedPutCollectionOfObjectsBuilder::new(self.stowage, objects)
    }
}
