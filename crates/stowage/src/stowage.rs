use std::fmt;
use std::sync::Arc;

use stowage_store::RecordStore;
use tracing::{debug, warn};

use crate::config::StowageConfig;
use crate::error::{StowageError, StowageResult};
use crate::interceptor::Interceptor;
use crate::interceptors::LoggingInterceptor;
use crate::low_level::{DefaultLowLevel, LowLevel};
use crate::mapping::{TypeMapping, TypeMappingRegistry};
use crate::put::PreparedPut;
use crate::scheduler::Scheduler;

/// The storage facade: entry point for building operations.
///
/// Cheap to clone; clones share the same low-level accessor, interceptor
/// chain and scheduler. All of these are fixed at [`StowageBuilder::build`].
#[derive(Clone)]
pub struct Stowage {
    shared: Arc<Shared>,
}

struct Shared {
    low_level: Arc<dyn LowLevel>,
    interceptors: Vec<Arc<dyn Interceptor>>,
    default_scheduler: Option<Scheduler>,
}

impl Stowage {
    pub fn builder() -> StowageBuilder {
        StowageBuilder::default()
    }

    /// Start building a put operation.
    pub fn put(&self) -> PreparedPut {
        PreparedPut::new(self.clone())
    }

    pub fn low_level(&self) -> &dyn LowLevel {
        self.shared.low_level.as_ref()
    }

    /// Interceptors in the order they wrap each execution.
    pub fn interceptors(&self) -> &[Arc<dyn Interceptor>] {
        &self.shared.interceptors
    }

    /// Where async adapters run, if configured.
    pub fn default_scheduler(&self) -> Option<&Scheduler> {
        self.shared.default_scheduler.as_ref()
    }
}

impl fmt::Debug for Stowage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stowage")
            .field("interceptors", &self.shared.interceptors.len())
            .field("default_scheduler", &self.shared.default_scheduler.is_some())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures a [`Stowage`].
///
/// Either a record store (plus optional type mappings) or a complete
/// low-level accessor must be supplied.
#[derive(Default)]
#[must_use]
pub struct StowageBuilder {
    record_store: Option<Arc<dyn RecordStore>>,
    low_level: Option<Arc<dyn LowLevel>>,
    registry: TypeMappingRegistry,
    interceptors: Vec<Arc<dyn Interceptor>>,
    default_scheduler: Option<Scheduler>,
    config: StowageConfig,
}

impl StowageBuilder {
    /// Back the default low-level accessor with `store`.
    pub fn record_store(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.record_store = Some(store);
        self
    }

    /// Use a custom low-level accessor. It owns type-mapping lookup, so it
    /// cannot be combined with [`add_type_mapping`](Self::add_type_mapping).
    pub fn low_level(mut self, low_level: Arc<dyn LowLevel>) -> Self {
        self.low_level = Some(low_level);
        self
    }

    /// Register the mapping for `T`, replacing any earlier one.
    pub fn add_type_mapping<T: 'static>(mut self, mapping: TypeMapping<T>) -> Self {
        if let Some(previous) = self.registry.register(mapping) {
            debug!(type_name = previous.key().name(), "replaced type mapping");
        }
        self
    }

    /// Append an interceptor; earlier interceptors wrap later ones.
    pub fn add_interceptor(self, interceptor: impl Interceptor + 'static) -> Self {
        self.add_shared_interceptor(Arc::new(interceptor))
    }

    pub fn add_shared_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Run async adapters on `scheduler` instead of the polling task.
    pub fn default_scheduler(mut self, scheduler: impl Into<Scheduler>) -> Self {
        self.default_scheduler = Some(scheduler.into());
        self
    }

    pub fn config(mut self, config: StowageConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> StowageResult<Stowage> {
        let mappings = self.registry.len();
        let low_level: Arc<dyn LowLevel> = match (self.low_level, self.record_store) {
            (Some(_), Some(_)) => {
                return Err(StowageError::Config(
                    "supply either a record store or a low-level accessor, not both".into(),
                ))
            }
            (Some(_), None) if mappings > 0 => {
                return Err(StowageError::Config(
                    "type mappings cannot be added to a custom low-level accessor".into(),
                ))
            }
            (Some(low_level), None) => low_level,
            (None, Some(store)) => {
                if mappings == 0 {
                    warn!("no type mappings registered; puts need an explicit resolver");
                }
                Arc::new(DefaultLowLevel::new(self.registry, store))
            }
            (None, None) => {
                return Err(StowageError::Config(
                    "no record store or low-level accessor configured".into(),
                ))
            }
        };

        let mut interceptors = self.interceptors;
        if self.config.log_operations {
            let logging = LoggingInterceptor::new(self.config.slow_operation_threshold());
            interceptors.insert(0, Arc::new(logging));
        }

        debug!(
            mappings,
            interceptors = interceptors.len(),
            scheduler = self.default_scheduler.is_some(),
            "stowage built"
        );

        Ok(Stowage {
            shared: Arc::new(Shared {
                low_level,
                interceptors,
                default_scheduler: self.default_scheduler,
            }),
        })
    }
}
