use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use stowage_types::TypeKey;

use crate::low_level::LowLevel;
use crate::put::PutResolver;

// ---------------------------------------------------------------------------
// TypeMapping
// ---------------------------------------------------------------------------

/// The write strategy registered for one domain type.
pub struct TypeMapping<T> {
    put_resolver: Arc<dyn PutResolver<T>>,
}

impl<T: 'static> TypeMapping<T> {
    pub fn new(put_resolver: impl PutResolver<T> + 'static) -> Self {
        Self {
            put_resolver: Arc::new(put_resolver),
        }
    }

    /// Build a mapping around a resolver that is already shared elsewhere.
    pub fn from_shared(put_resolver: Arc<dyn PutResolver<T>>) -> Self {
        Self { put_resolver }
    }

    pub fn put_resolver(&self) -> &Arc<dyn PutResolver<T>> {
        &self.put_resolver
    }
}

impl<T> Clone for TypeMapping<T> {
    fn clone(&self) -> Self {
        Self {
            put_resolver: Arc::clone(&self.put_resolver),
        }
    }
}

// ---------------------------------------------------------------------------
// ErasedTypeMapping
// ---------------------------------------------------------------------------

/// A [`TypeMapping`] with its element type erased, as stored in the
/// registry and returned by [`LowLevel::type_mapping`].
#[derive(Clone)]
pub struct ErasedTypeMapping {
    key: TypeKey,
    mapping: Arc<dyn Any + Send + Sync>,
}

impl ErasedTypeMapping {
    pub fn new<T: 'static>(mapping: TypeMapping<T>) -> Self {
        Self {
            key: TypeKey::of::<T>(),
            mapping: Arc::new(mapping),
        }
    }

    /// The exact type this mapping was registered for.
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// Recover the typed mapping. `None` if `T` is not the registered type.
    pub fn downcast<T: 'static>(&self) -> Option<TypeMapping<T>> {
        self.mapping.downcast_ref::<TypeMapping<T>>().cloned()
    }
}

impl std::fmt::Debug for ErasedTypeMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErasedTypeMapping")
            .field("type", &self.key.name())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// TypeMappingRegistry
// ---------------------------------------------------------------------------

/// Lookup from exact domain type to its registered mapping.
///
/// Filled at configuration time and read-only once the facade is built.
#[derive(Clone, Debug, Default)]
pub struct TypeMappingRegistry {
    mappings: HashMap<TypeKey, ErasedTypeMapping>,
}

impl TypeMappingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the mapping for `T`, returning the one it replaces.
    pub fn register<T: 'static>(&mut self, mapping: TypeMapping<T>) -> Option<ErasedTypeMapping> {
        self.mappings
            .insert(TypeKey::of::<T>(), ErasedTypeMapping::new(mapping))
    }

    pub fn get(&self, key: TypeKey) -> Option<&ErasedTypeMapping> {
        self.mappings.get(&key)
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.mappings.contains_key(&TypeKey::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Registered types, sorted by name.
    pub fn types(&self) -> Vec<TypeKey> {
        let mut keys: Vec<TypeKey> = self.mappings.keys().copied().collect();
        keys.sort_by_key(|k| k.name());
        keys
    }
}

impl dyn LowLevel + '_ {
    /// Typed lookup through [`LowLevel::type_mapping`].
    pub fn typed_mapping<T: 'static>(&self) -> Option<TypeMapping<T>> {
        self.type_mapping(TypeKey::of::<T>())?.downcast::<T>()
    }
}
