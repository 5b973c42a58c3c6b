use std::marker::PhantomData;

use serde::Serialize;
use stowage_store::StoreResult;
use stowage_types::{RecordValues, Selection, Target, Value};

use crate::low_level::LowLevel;
use crate::put::resolver::PutResolver;
use crate::put::result::PutResult;

/// Describes how objects of type `T` map onto records.
pub trait RecordMapping<T>: Send + Sync {
    /// Collection the object is written to.
    fn target(&self, object: &T) -> StoreResult<Target>;

    /// Column values for the object.
    fn to_record(&self, object: &T) -> StoreResult<RecordValues>;

    /// Rows that represent the same object as `record`.
    ///
    /// Return [`Selection::all()`] when the object has no identity yet; it
    /// is then always inserted.
    fn selection(&self, object: &T, record: &RecordValues) -> Selection;
}

/// Update-or-insert resolver driven by a [`RecordMapping`].
///
/// The object's selection is updated first; when no row matches, the record
/// is inserted. Objects without identity are always inserted.
pub struct DefaultPutResolver<M> {
    mapping: M,
}

impl<M> DefaultPutResolver<M> {
    pub fn new(mapping: M) -> Self {
        Self { mapping }
    }

    pub fn mapping(&self) -> &M {
        &self.mapping
    }
}

impl<T, M: RecordMapping<T>> PutResolver<T> for DefaultPutResolver<M> {
    fn perform_put(&self, low_level: &dyn LowLevel, object: &T) -> StoreResult<PutResult> {
        let target = self.mapping.target(object)?;
        let record = self.mapping.to_record(object)?;
        let selection = self.mapping.selection(object, &record);

        if !selection.is_all() {
            let affected = low_level.update(&target, &selection, &record)?;
            if affected > 0 {
                return Ok(PutResult::updated(target, affected));
            }
        }

        let location = low_level.insert(&target, &record)?;
        Ok(PutResult::inserted(location))
    }
}

/// [`RecordMapping`] for any `Serialize` type.
///
/// Each top-level field becomes a column; the object is identified by the
/// value of `key_column`. A missing or null key means "not yet stored".
pub struct SerdeMapping<T> {
    target: Target,
    key_column: String,
    _marker: PhantomData<fn(&T)>,
}

impl<T> SerdeMapping<T> {
    pub fn new(target: Target, key_column: impl Into<String>) -> Self {
        Self {
            target,
            key_column: key_column.into(),
            _marker: PhantomData,
        }
    }

    pub fn key_column(&self) -> &str {
        &self.key_column
    }
}

impl<T: Serialize> RecordMapping<T> for SerdeMapping<T> {
    fn target(&self, _object: &T) -> StoreResult<Target> {
        Ok(self.target.clone())
    }

    fn to_record(&self, object: &T) -> StoreResult<RecordValues> {
        Ok(RecordValues::from_serialize(object)?)
    }

    fn selection(&self, _object: &T, record: &RecordValues) -> Selection {
        match record.get(&self.key_column) {
            None | Some(Value::Null) => Selection::all(),
            Some(key) => Selection::eq(self.key_column.clone(), key.clone()),
        }
    }
}
