use std::any::Any;
use std::sync::Arc;

use tracing::debug;

use crate::error::{StowageError, StowageResult};
use crate::execution::run_through_chain;
use crate::operation::{Operation, OperationKind, PreparedOperation};
use crate::put::resolver::{PutResolver, Resolution};
use crate::put::result::{PutResult, PutResults};
use crate::stowage::Stowage;

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures a put of an ordered collection of objects.
///
/// Obtained from [`Stowage::put`] followed by
/// [`PreparedPut::objects`](crate::put::PreparedPut::objects).
#[must_use]
pub struct PreparedPutCollectionOfObjectsBuilder<T> {
    stowage: Stowage,
    objects: Arc<Vec<T>>,
    put_resolver: Option<Arc<dyn PutResolver<T>>>,
}

impl<T> PreparedPutCollectionOfObjectsBuilder<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(stowage: Stowage, objects: impl Into<Arc<Vec<T>>>) -> Self {
        Self {
            stowage,
            objects: objects.into(),
            put_resolver: None,
        }
    }

    /// Use `resolver` for every object instead of the registered mapping.
    ///
    /// Calling this again replaces the previous resolver.
    pub fn with_put_resolver(self, resolver: impl PutResolver<T> + 'static) -> Self {
        self.with_shared_put_resolver(Arc::new(resolver))
    }

    /// Like [`with_put_resolver`](Self::with_put_resolver), for a resolver
    /// that is already shared.
    pub fn with_shared_put_resolver(mut self, resolver: Arc<dyn PutResolver<T>>) -> Self {
        self.put_resolver = Some(resolver);
        self
    }

    /// Freeze the configuration into an executable operation.
    ///
    /// When no resolver was supplied the element type's mapping is looked up
    /// here, once. A missing mapping is not an error yet; it is reported by
    /// every execution of the returned operation.
    pub fn prepare(self) -> PreparedPutCollectionOfObjects<T> {
        let explicit = self.put_resolver.is_some();
        let resolution = Resolution::resolve(&self.stowage, self.put_resolver);
        debug!(
            items = self.objects.len(),
            explicit_resolver = explicit,
            "prepared put of collection"
        );
        PreparedPutCollectionOfObjects {
            stowage: self.stowage,
            objects: self.objects,
            resolution,
        }
    }
}

// ---------------------------------------------------------------------------
// Prepared operation
// ---------------------------------------------------------------------------

/// An immutable put of a collection, executable any number of times.
///
/// Objects are written strictly in order, one resolver call each. The first
/// failure aborts the operation; objects already written stay written.
#[must_use]
pub struct PreparedPutCollectionOfObjects<T> {
    stowage: Stowage,
    objects: Arc<Vec<T>>,
    resolution: Resolution<T>,
}

impl<T> PreparedPutCollectionOfObjects<T>
where
    T: Send + Sync + 'static,
{
    /// The collection this operation writes. Shares the caller's `Arc`
    /// when one was supplied.
    pub fn data(&self) -> &Arc<Vec<T>> {
        &self.objects
    }

    fn put_all(&self) -> StowageResult<PutResults<T>> {
        let kind = self.kind();
        let resolver = self.resolution.resolver(kind)?;
        let low_level = self.stowage.low_level();

        let results = self
            .objects
            .iter()
            .map(|object| resolver.perform_put(low_level, object))
            .collect::<Result<Vec<PutResult>, _>>()
            .map_err(|e| StowageError::execution(kind, e))?;

        debug!(items = results.len(), "put collection of objects");
        Ok(PutResults::new(Arc::clone(&self.objects), results))
    }
}

impl<T> Clone for PreparedPutCollectionOfObjects<T> {
    fn clone(&self) -> Self {
        Self {
            stowage: self.stowage.clone(),
            objects: Arc::clone(&self.objects),
            resolution: self.resolution.clone(),
        }
    }
}

impl<T> Operation for PreparedPutCollectionOfObjects<T>
where
    T: Send + Sync + 'static,
{
    fn kind(&self) -> OperationKind {
        OperationKind::PutObjects
    }

    fn item_count(&self) -> usize {
        self.objects.len()
    }

    fn data_any(&self) -> &dyn Any {
        &self.objects
    }
}

impl<T> PreparedOperation for PreparedPutCollectionOfObjects<T>
where
    T: Send + Sync + 'static,
{
    type Output = PutResults<T>;

    fn stowage(&self) -> &Stowage {
        &self.stowage
    }

    fn execute_as_blocking(&self) -> StowageResult<PutResults<T>> {
        run_through_chain(&self.stowage, self, || self.put_all())
    }
}
