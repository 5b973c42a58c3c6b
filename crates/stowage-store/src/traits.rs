use stowage_types::{RecordValues, RowId, Selection, Target};

use crate::error::StoreResult;

/// A row as returned by [`RecordStore::query`].
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub row_id: RowId,
    pub values: RecordValues,
}

/// Low-level record store the put pipeline writes into.
///
/// All implementations must satisfy these invariants:
/// - `insert` assigns a fresh, never reused [`RowId`] per target.
/// - `update` only touches rows matched by the selection and reports how
///   many it touched; zero is not an error.
/// - Rows are returned by `query` in ascending `RowId` order.
/// - All I/O errors are propagated, never silently ignored.
pub trait RecordStore: Send + Sync {
    /// Insert a record and return the id assigned to it.
    fn insert(&self, target: &Target, values: &RecordValues) -> StoreResult<RowId>;

    /// Merge `values` into every row matching `selection`.
    ///
    /// Returns the number of affected rows.
    fn update(
        &self,
        target: &Target,
        selection: &Selection,
        values: &RecordValues,
    ) -> StoreResult<u64>;

    /// Return every row matching `selection`.
    fn query(&self, target: &Target, selection: &Selection) -> StoreResult<Vec<Record>>;

    /// Count rows matching `selection`.
    ///
    /// Default implementation runs `query()`. Backends may override to avoid
    /// materializing rows.
    fn count(&self, target: &Target, selection: &Selection) -> StoreResult<u64> {
        self.query(target, selection).map(|rows| rows.len() as u64)
    }
}
