//! Execution core shared by every adapter.
//!
//! The blocking body of an operation is always the terminal step of one pass
//! through the interceptor chain ([`run_through_chain`]). The async adapters
//! wrap that body in a lazy future ([`deferred`]) which, when first polled,
//! either submits it to the facade's default scheduler or runs it inline.

use std::any::type_name;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use futures::stream::{self, BoxStream, Stream};
use futures::{FutureExt, StreamExt};
use tracing::debug;

use crate::error::{ExecutionCause, StowageError, StowageResult};
use crate::interceptor::Chain;
use crate::operation::{Operation, OperationOutput, PreparedOperation};
use crate::stowage::Stowage;

/// Run `body` as the terminal step of a single pass through the facade's
/// interceptor chain and recover its typed output.
pub(crate) fn run_through_chain<O, F>(
    stowage: &Stowage,
    operation: &dyn Operation,
    body: F,
) -> StowageResult<O>
where
    O: Send + 'static,
    F: Fn() -> StowageResult<O>,
{
    debug!(
        kind = %operation.kind(),
        items = operation.item_count(),
        interceptors = stowage.interceptors().len(),
        "executing operation"
    );
    let terminal = |_: &dyn Operation| -> StowageResult<OperationOutput> {
        body().map(|output| Box::new(output) as OperationOutput)
    };
    let output = Chain::new(stowage.interceptors(), &terminal).proceed(operation)?;
    output.downcast::<O>().map(|boxed| *boxed).map_err(|_| {
        StowageError::execution(
            operation.kind(),
            ExecutionCause::InterceptorOutput {
                expected: type_name::<O>(),
            },
        )
    })
}

/// The lazily started execution every async adapter is built from.
///
/// Nothing happens until the returned future is polled: the scheduler is
/// looked up at that point, not when the adapter is created.
async fn deferred<P: PreparedOperation>(operation: P) -> StowageResult<P::Output> {
    let scheduler = operation.stowage().default_scheduler().cloned();
    match scheduler {
        Some(scheduler) => {
            debug!(kind = %operation.kind(), "scheduling operation");
            let kind = operation.kind();
            scheduler
                .run(kind, move || operation.execute_as_blocking())
                .await
        }
        None => operation.execute_as_blocking(),
    }
}

// ---------------------------------------------------------------------------
// Single
// ---------------------------------------------------------------------------

/// Future resolving to exactly one value or one error.
#[must_use = "futures do nothing unless polled"]
pub struct Single<O> {
    inner: BoxFuture<'static, StowageResult<O>>,
}

impl<O: Send + 'static> Single<O> {
    pub(crate) fn new<P: PreparedOperation<Output = O>>(operation: P) -> Self {
        Self {
            inner: deferred(operation).boxed(),
        }
    }
}

impl<O> Future for Single<O> {
    type Output = StowageResult<O>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.get_mut().inner.as_mut().poll(cx)
    }
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// Future signalling completion (or the error) of an operation, discarding
/// its value.
#[must_use = "futures do nothing unless polled"]
pub struct Completion {
    inner: BoxFuture<'static, StowageResult<()>>,
}

impl Completion {
    pub(crate) fn new<P: PreparedOperation>(operation: P) -> Self {
        Self {
            inner: deferred(operation).map(|result| result.map(drop)).boxed(),
        }
    }
}

impl Future for Completion {
    type Output = StowageResult<()>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.get_mut().inner.as_mut().poll(cx)
    }
}

// ---------------------------------------------------------------------------
// ResultStream
// ---------------------------------------------------------------------------

/// How a producer treats values a slow consumer has not yet requested.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BackpressureStrategy {
    /// No strategy: the producer emits regardless of demand.
    #[default]
    Missing,
    /// Fail the stream when the consumer falls behind.
    Error,
    /// Queue every value until it is requested.
    Buffer,
    /// Discard values the consumer is not ready for.
    Drop,
    /// Keep only the most recent unrequested value.
    Latest,
}

/// Stream yielding at most one item: `Ok(value)` or `Err(error)`, then end.
///
/// The stream is demand-driven and never holds more than one pending item,
/// so every [`BackpressureStrategy`] results in the same delivery.
#[must_use = "streams do nothing unless polled"]
pub struct ResultStream<O> {
    inner: BoxStream<'static, StowageResult<O>>,
    strategy: BackpressureStrategy,
}

impl<O: Send + 'static> ResultStream<O> {
    pub(crate) fn new<P: PreparedOperation<Output = O>>(
        operation: P,
        strategy: BackpressureStrategy,
    ) -> Self {
        Self {
            inner: stream::once(deferred(operation)).boxed(),
            strategy,
        }
    }
}

impl<O> ResultStream<O> {
    /// The strategy requested when the stream was created.
    pub fn backpressure(&self) -> BackpressureStrategy {
        self.strategy
    }
}

impl<O> Stream for ResultStream<O> {
    type Item = StowageResult<O>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().inner.as_mut().poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
