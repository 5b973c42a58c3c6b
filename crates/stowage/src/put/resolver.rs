use std::sync::Arc;

use stowage_store::StoreResult;
use stowage_types::TypeKey;
use tracing::warn;

use crate::error::{ExecutionCause, StowageError, StowageResult};
use crate::low_level::LowLevel;
use crate::operation::OperationKind;
use crate::put::result::PutResult;
use crate::stowage::Stowage;

/// Strategy deciding how one object of type `T` is written.
///
/// Implementations decide between insert and update and perform the write
/// through the low-level accessor. They must not keep per-call state: one
/// resolver instance may serve many operations, possibly concurrently.
pub trait PutResolver<T>: Send + Sync {
    fn perform_put(&self, low_level: &dyn LowLevel, object: &T) -> StoreResult<PutResult>;
}

impl<T, R: PutResolver<T> + ?Sized> PutResolver<T> for Arc<R> {
    fn perform_put(&self, low_level: &dyn LowLevel, object: &T) -> StoreResult<PutResult> {
        (**self).perform_put(low_level, object)
    }
}

/// Resolver built from a closure; see [`put_resolver_fn`].
pub struct FnPutResolver<F>(F);

impl<T, F> PutResolver<T> for FnPutResolver<F>
where
    F: Fn(&dyn LowLevel, &T) -> StoreResult<PutResult> + Send + Sync,
{
    fn perform_put(&self, low_level: &dyn LowLevel, object: &T) -> StoreResult<PutResult> {
        (self.0)(low_level, object)
    }
}

/// Wrap a closure as a [`PutResolver`].
pub fn put_resolver_fn<T, F>(f: F) -> FnPutResolver<F>
where
    F: Fn(&dyn LowLevel, &T) -> StoreResult<PutResult> + Send + Sync,
{
    FnPutResolver(f)
}

/// Resolver selected at `prepare()` time.
pub(crate) enum Resolution<T> {
    Found(Arc<dyn PutResolver<T>>),
    Missing(TypeKey),
}

impl<T: 'static> Resolution<T> {
    /// An explicit resolver wins; otherwise the low-level accessor is asked
    /// for `T`'s mapping. The lookup is skipped entirely when a resolver was
    /// supplied.
    pub(crate) fn resolve(stowage: &Stowage, explicit: Option<Arc<dyn PutResolver<T>>>) -> Self {
        if let Some(resolver) = explicit {
            return Self::Found(resolver);
        }
        match stowage.low_level().typed_mapping::<T>() {
            Some(mapping) => Self::Found(Arc::clone(mapping.put_resolver())),
            None => {
                let key = TypeKey::of::<T>();
                warn!(type_name = key.name(), "no type mapping registered");
                Self::Missing(key)
            }
        }
    }

    /// The resolver, or the configuration error raised at execution.
    pub(crate) fn resolver(&self, kind: OperationKind) -> StowageResult<&dyn PutResolver<T>> {
        match self {
            Self::Found(resolver) => Ok(resolver.as_ref()),
            Self::Missing(key) => Err(StowageError::execution(
                kind,
                ExecutionCause::MissingTypeMapping {
                    type_name: key.name(),
                },
            )),
        }
    }
}

impl<T> Clone for Resolution<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Found(resolver) => Self::Found(Arc::clone(resolver)),
            Self::Missing(key) => Self::Missing(*key),
        }
    }
}
