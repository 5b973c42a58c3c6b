use std::any::Any;
use std::fmt;

use crate::error::StowageResult;
use crate::execution::{BackpressureStrategy, Completion, ResultStream, Single};
use crate::stowage::Stowage;

/// The kind of a prepared operation, as seen by interceptors and errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Put of a single object.
    PutObject,
    /// Put of an ordered collection of objects.
    PutObjects,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PutObject => write!(f, "put object"),
            Self::PutObjects => write!(f, "put collection of objects"),
        }
    }
}

/// Type-erased output travelling back through the interceptor chain.
pub type OperationOutput = Box<dyn Any + Send>;

/// Object-safe view of a prepared operation handed to interceptors.
pub trait Operation: Send + Sync {
    fn kind(&self) -> OperationKind;

    /// Number of domain objects the operation will write.
    fn item_count(&self) -> usize;

    /// The operation's input, for interceptors that know the concrete type.
    ///
    /// Collection puts expose `Arc<Vec<T>>`, single-object puts expose `T`.
    fn data_any(&self) -> &dyn Any;
}

/// A fully configured, immutable, reusable unit of work.
///
/// Every execution adapter runs the same body, [`execute_as_blocking`], and
/// therefore passes through the interceptor chain exactly once per
/// execution. The async adapters are lazy: no work, and no scheduler lookup,
/// happens until they are first polled.
///
/// # Panics
///
/// A panic inside a resolver or interceptor unwinds into the caller of
/// `execute_as_blocking`, and into the polling task of an async adapter
/// when the facade has no default scheduler. With a scheduler the body runs
/// on a tokio blocking thread; the panic is caught there and reported as
/// [`ExecutionCause::Scheduler`](crate::ExecutionCause::Scheduler).
///
/// [`execute_as_blocking`]: PreparedOperation::execute_as_blocking
pub trait PreparedOperation: Operation + Clone + 'static {
    type Output: Send + 'static;

    /// The facade this operation was prepared against.
    fn stowage(&self) -> &Stowage;

    /// Execute on the calling thread. Never consults the scheduler.
    fn execute_as_blocking(&self) -> StowageResult<Self::Output>;

    /// Deferred execution delivering exactly one value or one error.
    fn as_single(&self) -> Single<Self::Output> {
        Single::new(self.clone())
    }

    /// Deferred execution that discards the value on success.
    fn as_completion(&self) -> Completion {
        Completion::new(self.clone())
    }

    /// Deferred execution as a stream of at most one item.
    ///
    /// On success the stream yields one `Ok` and ends; on failure it yields
    /// one `Err` and ends, never an `Ok`.
    fn as_stream(&self, strategy: BackpressureStrategy) -> ResultStream<Self::Output> {
        ResultStream::new(self.clone(), strategy)
    }
}
