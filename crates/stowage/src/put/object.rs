use std::any::Any;
use std::sync::Arc;

use tracing::debug;

use crate::error::{StowageError, StowageResult};
use crate::execution::run_through_chain;
use crate::operation::{Operation, OperationKind, PreparedOperation};
use crate::put::resolver::{PutResolver, Resolution};
use crate::put::result::PutResult;
use crate::stowage::Stowage;

/// Configures a put of one object.
#[must_use]
pub struct PreparedPutObjectBuilder<T> {
    stowage: Stowage,
    object: T,
    put_resolver: Option<Arc<dyn PutResolver<T>>>,
}

impl<T> PreparedPutObjectBuilder<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(stowage: Stowage, object: T) -> Self {
        Self {
            stowage,
            object,
            put_resolver: None,
        }
    }

    pub fn with_put_resolver(self, resolver: impl PutResolver<T> + 'static) -> Self {
        self.with_shared_put_resolver(Arc::new(resolver))
    }

    pub fn with_shared_put_resolver(mut self, resolver: Arc<dyn PutResolver<T>>) -> Self {
        self.put_resolver = Some(resolver);
        self
    }

    pub fn prepare(self) -> PreparedPutObject<T> {
        let resolution = Resolution::resolve(&self.stowage, self.put_resolver);
        debug!("prepared put of object");
        PreparedPutObject {
            stowage: self.stowage,
            object: Arc::new(self.object),
            resolution,
        }
    }
}

/// An immutable put of one object, executable any number of times.
#[must_use]
pub struct PreparedPutObject<T> {
    stowage: Stowage,
    object: Arc<T>,
    resolution: Resolution<T>,
}

impl<T> PreparedPutObject<T>
where
    T: Send + Sync + 'static,
{
    pub fn data(&self) -> &T {
        &self.object
    }

    fn put_one(&self) -> StowageResult<PutResult> {
        let kind = self.kind();
        let resolver = self.resolution.resolver(kind)?;
        resolver
            .perform_put(self.stowage.low_level(), &self.object)
            .map_err(|e| StowageError::execution(kind, e))
    }
}

impl<T> Clone for PreparedPutObject<T> {
    fn clone(&self) -> Self {
        Self {
            stowage: self.stowage.clone(),
            object: Arc::clone(&self.object),
            resolution: self.resolution.clone(),
        }
    }
}

impl<T> Operation for PreparedPutObject<T>
where
    T: Send + Sync + 'static,
{
    fn kind(&self) -> OperationKind {
        OperationKind::PutObject
    }

    fn item_count(&self) -> usize {
        1
    }

    fn data_any(&self) -> &dyn Any {
        self.object.as_ref()
    }
}

impl<T> PreparedOperation for PreparedPutObject<T>
where
    T: Send + Sync + 'static,
{
    type Output = PutResult;

    fn stowage(&self) -> &Stowage {
        &self.stowage
    }

    fn execute_as_blocking(&self) -> StowageResult<PutResult> {
        run_through_chain(&self.stowage, self, || self.put_one())
    }
}
