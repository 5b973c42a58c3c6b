//! Shared fixtures for the crate's unit tests.

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use stowage_store::{InMemoryRecordStore, StoreResult};
use stowage_types::{Location, RecordValues, Selection, Target, TypeKey};

use crate::error::StowageResult;
use crate::interceptor::{Chain, Interceptor};
use crate::low_level::{DefaultLowLevel, LowLevel};
use crate::mapping::{ErasedTypeMapping, TypeMapping, TypeMappingRegistry};
use crate::operation::{Operation, OperationOutput};
use crate::put::{PutResolver, PutResult, PutResults};
use crate::scheduler::Scheduler;
use crate::stowage::Stowage;

static NEXT_ID: AtomicI64 = AtomicI64::new(1);

#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct TestItem {
    pub id: i64,
    pub content: String,
}

impl TestItem {
    pub fn new_instance() -> Self {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        Self {
            id,
            content: format!("item {id}"),
        }
    }
}

pub(crate) fn items_target() -> Target {
    Target::new("test_items").unwrap()
}

// ---------------------------------------------------------------------------
// Call counting
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub(crate) struct Calls {
    pub type_mapping: AtomicUsize,
    pub insert: AtomicUsize,
    pub update: AtomicUsize,
}

impl Calls {
    pub fn type_mapping(&self) -> usize {
        self.type_mapping.load(Ordering::SeqCst)
    }

    pub fn insert(&self) -> usize {
        self.insert.load(Ordering::SeqCst)
    }

    pub fn update(&self) -> usize {
        self.update.load(Ordering::SeqCst)
    }
}

/// Low-level accessor that counts every call before delegating.
pub(crate) struct CountingLowLevel {
    inner: DefaultLowLevel,
    calls: Arc<Calls>,
}

impl LowLevel for CountingLowLevel {
    fn type_mapping(&self, key: TypeKey) -> Option<ErasedTypeMapping> {
        self.calls.type_mapping.fetch_add(1, Ordering::SeqCst);
        self.inner.type_mapping(key)
    }

    fn insert(&self, target: &Target, values: &RecordValues) -> StoreResult<Location> {
        self.calls.insert.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(target, values)
    }

    fn update(
        &self,
        target: &Target,
        selection: &Selection,
        values: &RecordValues,
    ) -> StoreResult<u64> {
        self.calls.update.fetch_add(1, Ordering::SeqCst);
        self.inner.update(target, selection, values)
    }
}

/// Pass-through interceptor counting how often the chain is entered.
#[derive(Default)]
pub(crate) struct CountingInterceptor {
    calls: AtomicUsize,
}

impl CountingInterceptor {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Interceptor for CountingInterceptor {
    fn intercept(
        &self,
        operation: &dyn Operation,
        chain: Chain<'_>,
    ) -> StowageResult<OperationOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        chain.proceed(operation)
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Inserts every item and remembers which thread each put ran on.
#[derive(Default)]
pub(crate) struct InsertingResolver {
    threads: Mutex<Vec<String>>,
}

impl InsertingResolver {
    pub fn threads(&self) -> Vec<String> {
        self.threads.lock().unwrap().clone()
    }
}

impl PutResolver<TestItem> for InsertingResolver {
    fn perform_put(&self, low_level: &dyn LowLevel, object: &TestItem) -> StoreResult<PutResult> {
        let thread = std::thread::current()
            .name()
            .unwrap_or("<unnamed>")
            .to_string();
        self.threads.lock().unwrap().push(thread);
        let record = RecordValues::from_serialize(object)?;
        let location = low_level.insert(&items_target(), &record)?;
        Ok(PutResult::inserted(location))
    }
}

// ---------------------------------------------------------------------------
// PutStub
// ---------------------------------------------------------------------------

/// A facade wired with counting collaborators and two fresh items.
pub(crate) struct PutStub {
    pub stowage: Stowage,
    pub store: Arc<InMemoryRecordStore>,
    pub calls: Arc<Calls>,
    pub interceptor: Arc<CountingInterceptor>,
    pub resolver: Arc<InsertingResolver>,
    pub items: Arc<Vec<TestItem>>,
}

impl PutStub {
    /// No mapping is registered; tests pass `resolver` explicitly.
    pub fn without_type_mapping() -> Self {
        Self::build(false, None)
    }

    /// `resolver` is registered as the mapping for [`TestItem`].
    pub fn with_type_mapping() -> Self {
        Self::build(true, None)
    }

    pub fn with_scheduler(register_mapping: bool, scheduler: Scheduler) -> Self {
        Self::build(register_mapping, Some(scheduler))
    }

    fn build(register_mapping: bool, scheduler: Option<Scheduler>) -> Self {
        let store = Arc::new(InMemoryRecordStore::new());
        let calls = Arc::new(Calls::default());
        let interceptor = Arc::new(CountingInterceptor::default());
        let resolver = Arc::new(InsertingResolver::default());

        let mut registry = TypeMappingRegistry::new();
        if register_mapping {
            registry.register(TypeMapping::<TestItem>::new(Arc::clone(&resolver)));
        }
        let low_level = CountingLowLevel {
            inner: DefaultLowLevel::new(registry, store.clone()),
            calls: Arc::clone(&calls),
        };

        let mut builder = Stowage::builder()
            .low_level(Arc::new(low_level))
            .add_shared_interceptor(interceptor.clone());
        if let Some(scheduler) = scheduler {
            builder = builder.default_scheduler(scheduler);
        }

        Self {
            stowage: builder.build().unwrap(),
            store,
            calls,
            interceptor,
            resolver,
            items: Arc::new(vec![TestItem::new_instance(), TestItem::new_instance()]),
        }
    }

    /// Both items were inserted, in order, through one interceptor pass.
    pub fn verify_results(&self, results: &PutResults<TestItem>) {
        assert_eq!(results.len(), self.items.len());
        assert!(Arc::ptr_eq(results.objects(), &self.items));
        assert!(results.results().iter().all(PutResult::was_inserted));
        assert_eq!(results.number_of_inserts(), 2);

        let row_ids: Vec<u64> = results
            .results()
            .iter()
            .map(|r| r.location().unwrap().row_id.0)
            .collect();
        assert_eq!(row_ids, vec![1, 2]);

        self.verify_io(2);
    }

    /// Insert count matches, nothing was updated, chain entered once.
    pub fn verify_io(&self, inserts: usize) {
        assert_eq!(self.calls.insert(), inserts);
        assert_eq!(self.calls.update(), 0);
        assert_eq!(self.store.len(&items_target()), inserts);
        assert_eq!(self.interceptor.calls(), 1);
    }
}
