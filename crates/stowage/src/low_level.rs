use std::sync::Arc;

use stowage_store::{RecordStore, StoreResult};
use stowage_types::{Location, RecordValues, Selection, Target, TypeKey};
use tracing::debug;

use crate::mapping::{ErasedTypeMapping, TypeMappingRegistry};

/// The narrow interface through which resolvers reach the record store.
///
/// Mutating I/O only ever happens through `insert` and `update`, and only
/// from inside a resolver running as the terminal step of an interceptor
/// chain.
pub trait LowLevel: Send + Sync {
    /// Mapping registered for exactly `key`, if any.
    fn type_mapping(&self, key: TypeKey) -> Option<ErasedTypeMapping>;

    /// Insert a record and return its location.
    fn insert(&self, target: &Target, values: &RecordValues) -> StoreResult<Location>;

    /// Merge `values` into the rows matching `selection`; returns the number
    /// of affected rows.
    fn update(
        &self,
        target: &Target,
        selection: &Selection,
        values: &RecordValues,
    ) -> StoreResult<u64>;
}

/// Low-level accessor backed by a type-mapping registry and a record store.
pub struct DefaultLowLevel {
    registry: TypeMappingRegistry,
    store: Arc<dyn RecordStore>,
}

impl DefaultLowLevel {
    pub fn new(registry: TypeMappingRegistry, store: Arc<dyn RecordStore>) -> Self {
        Self { registry, store }
    }

    pub fn registry(&self) -> &TypeMappingRegistry {
        &self.registry
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }
}

impl LowLevel for DefaultLowLevel {
    fn type_mapping(&self, key: TypeKey) -> Option<ErasedTypeMapping> {
        self.registry.get(key).cloned()
    }

    fn insert(&self, target: &Target, values: &RecordValues) -> StoreResult<Location> {
        let row_id = self.store.insert(target, values)?;
        debug!(%target, %row_id, columns = values.len(), "insert");
        Ok(Location::new(target.clone(), row_id))
    }

    fn update(
        &self,
        target: &Target,
        selection: &Selection,
        values: &RecordValues,
    ) -> StoreResult<u64> {
        let affected = self.store.update(target, selection, values)?;
        debug!(%target, %selection, affected, "update");
        Ok(affected)
    }
}

impl std::fmt::Debug for DefaultLowLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultLowLevel")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
