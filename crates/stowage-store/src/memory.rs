use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use stowage_types::{RecordValues, RowId, Selection, Target};
use tracing::trace;

use crate::error::{StoreError, StoreResult};
use crate::traits::{Record, RecordStore};

#[derive(Default)]
struct Table {
    next_id: u64,
    rows: BTreeMap<RowId, RecordValues>,
}

/// In-memory, HashMap-based record store.
///
/// Intended for tests and embedding. Tables are created on first insert and
/// held behind a `RwLock` for safe concurrent access. Records are cloned on
/// read/write.
pub struct InMemoryRecordStore {
    tables: RwLock<HashMap<Target, Table>>,
    read_only: AtomicBool,
}

impl InMemoryRecordStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            read_only: AtomicBool::new(false),
        }
    }

    /// Reject (or accept again) all subsequent writes with
    /// [`StoreError::ReadOnly`].
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only.load(Ordering::SeqCst)
    }

    /// Number of rows in `target` (zero for unknown targets).
    pub fn len(&self, target: &Target) -> usize {
        self.tables
            .read()
            .expect("lock poisoned")
            .get(target)
            .map_or(0, |t| t.rows.len())
    }

    /// Total number of rows across all targets.
    pub fn total_rows(&self) -> usize {
        self.tables
            .read()
            .expect("lock poisoned")
            .values()
            .map(|t| t.rows.len())
            .sum()
    }

    /// Returns `true` if no target holds any row.
    pub fn is_empty(&self) -> bool {
        self.total_rows() == 0
    }

    /// Sorted list of targets that have been written to.
    pub fn targets(&self) -> Vec<Target> {
        let map = self.tables.read().expect("lock poisoned");
        let mut targets: Vec<Target> = map.keys().cloned().collect();
        targets.sort();
        targets
    }

    /// Remove all tables.
    pub fn clear(&self) {
        self.tables.write().expect("lock poisoned").clear();
    }

    fn ensure_writable(&self) -> StoreResult<()> {
        if self.is_read_only() {
            return Err(StoreError::ReadOnly);
        }
        Ok(())
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn insert(&self, target: &Target, values: &RecordValues) -> StoreResult<RowId> {
        self.ensure_writable()?;
        if values.is_empty() {
            return Err(StoreError::EmptyRecord(target.clone()));
        }
        let mut map = self.tables.write().expect("lock poisoned");
        let table = map.entry(target.clone()).or_default();
        table.next_id += 1;
        let row_id = RowId(table.next_id);
        table.rows.insert(row_id, values.clone());
        trace!(%target, %row_id, "row inserted");
        Ok(row_id)
    }

    fn update(
        &self,
        target: &Target,
        selection: &Selection,
        values: &RecordValues,
    ) -> StoreResult<u64> {
        self.ensure_writable()?;
        let mut map = self.tables.write().expect("lock poisoned");
        let Some(table) = map.get_mut(target) else {
            return Ok(0);
        };
        let mut affected = 0;
        for row in table.rows.values_mut() {
            if selection.matches(row) {
                row.merge(values);
                affected += 1;
            }
        }
        trace!(%target, %selection, affected, "rows updated");
        Ok(affected)
    }

    fn query(&self, target: &Target, selection: &Selection) -> StoreResult<Vec<Record>> {
        let map = self.tables.read().expect("lock poisoned");
        Ok(map
            .get(target)
            .map(|table| {
                table
                    .rows
                    .iter()
                    .filter(|(_, values)| selection.matches(values))
                    .map(|(row_id, values)| Record {
                        row_id: *row_id,
                        values: values.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}

impl std::fmt::Debug for InMemoryRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRecordStore")
            .field("row_count", &self.total_rows())
            .field("read_only", &self.is_read_only())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stowage_types::Value;

    fn tweets() -> Target {
        Target::new("tweets").unwrap()
    }

    fn tweet(id: i64, content: &str) -> RecordValues {
        RecordValues::new().with("id", id).with("content", content)
    }

    // -----------------------------------------------------------------------
    // Insert
    // -----------------------------------------------------------------------

    #[test]
    fn insert_assigns_increasing_row_ids() {
        let store = InMemoryRecordStore::new();
        let a = store.insert(&tweets(), &tweet(1, "a")).unwrap();
        let b = store.insert(&tweets(), &tweet(2, "b")).unwrap();
        assert_eq!(a, RowId(1));
        assert_eq!(b, RowId(2));
        assert_eq!(store.len(&tweets()), 2);
    }

    #[test]
    fn row_ids_are_per_target() {
        let store = InMemoryRecordStore::new();
        let users = Target::new("users").unwrap();
        store.insert(&tweets(), &tweet(1, "a")).unwrap();
        let first_user = store
            .insert(&users, &RecordValues::new().with("name", "ann"))
            .unwrap();
        assert_eq!(first_user, RowId(1));
        assert_eq!(store.targets(), vec![tweets(), users]);
    }

    #[test]
    fn insert_rejects_empty_record() {
        let store = InMemoryRecordStore::new();
        let err = store.insert(&tweets(), &RecordValues::new()).unwrap_err();
        assert!(matches!(err, StoreError::EmptyRecord(_)));
        assert!(store.is_empty());
    }

    // -----------------------------------------------------------------------
    // Update
    // -----------------------------------------------------------------------

    #[test]
    fn update_merges_matching_rows() {
        let store = InMemoryRecordStore::new();
        store.insert(&tweets(), &tweet(1, "a")).unwrap();
        store.insert(&tweets(), &tweet(2, "b")).unwrap();

        let affected = store
            .update(
                &tweets(),
                &Selection::eq("id", 2),
                &RecordValues::new().with("content", "edited"),
            )
            .unwrap();
        assert_eq!(affected, 1);

        let rows = store.query(&tweets(), &Selection::eq("id", 2)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].values.get("content"), Some(&Value::Text("edited".into())));
        assert_eq!(rows[0].values.get("id"), Some(&Value::Integer(2)));
    }

    #[test]
    fn update_without_match_affects_nothing() {
        let store = InMemoryRecordStore::new();
        let affected = store
            .update(&tweets(), &Selection::eq("id", 9), &tweet(9, "x"))
            .unwrap();
        assert_eq!(affected, 0);
        assert!(store.is_empty());
    }

    // -----------------------------------------------------------------------
    // Query / count
    // -----------------------------------------------------------------------

    #[test]
    fn query_returns_rows_in_id_order() {
        let store = InMemoryRecordStore::new();
        for i in 0..5 {
            store.insert(&tweets(), &tweet(i, "same")).unwrap();
        }
        let rows = store.query(&tweets(), &Selection::eq("content", "same")).unwrap();
        let ids: Vec<u64> = rows.iter().map(|r| r.row_id.0).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(store.count(&tweets(), &Selection::all()).unwrap(), 5);
    }

    #[test]
    fn query_unknown_target_is_empty() {
        let store = InMemoryRecordStore::new();
        assert!(store.query(&tweets(), &Selection::all()).unwrap().is_empty());
    }

    // -----------------------------------------------------------------------
    // Read-only mode
    // -----------------------------------------------------------------------

    #[test]
    fn read_only_rejects_writes_but_allows_reads() {
        let store = InMemoryRecordStore::new();
        store.insert(&tweets(), &tweet(1, "a")).unwrap();
        store.set_read_only(true);

        assert!(matches!(
            store.insert(&tweets(), &tweet(2, "b")),
            Err(StoreError::ReadOnly)
        ));
        assert!(matches!(
            store.update(&tweets(), &Selection::all(), &tweet(3, "c")),
            Err(StoreError::ReadOnly)
        ));
        assert_eq!(store.count(&tweets(), &Selection::all()).unwrap(), 1);

        store.set_read_only(false);
        store.insert(&tweets(), &tweet(2, "b")).unwrap();
        assert_eq!(store.len(&tweets()), 2);
    }

    #[test]
    fn clear_removes_all() {
        let store = InMemoryRecordStore::new();
        store.insert(&tweets(), &tweet(1, "a")).unwrap();
        store.clear();
        assert!(store.is_empty());
        assert!(store.targets().is_empty());
    }

    // -----------------------------------------------------------------------
    // Concurrent write safety
    // -----------------------------------------------------------------------

    #[test]
    fn concurrent_inserts_get_distinct_ids() {
        use std::collections::HashSet;
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(InMemoryRecordStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.insert(&tweets(), &tweet(i, "t")).unwrap())
            })
            .collect();

        let ids: HashSet<RowId> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(ids.len(), 8);
        assert_eq!(store.len(&tweets()), 8);
    }
}
