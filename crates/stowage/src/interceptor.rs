use std::sync::Arc;

use crate::error::StowageResult;
use crate::operation::{Operation, OperationOutput};

/// Terminal step of the chain: the operation's own execution body.
pub type Terminal<'a> = dyn Fn(&dyn Operation) -> StowageResult<OperationOutput> + 'a;

// ---------------------------------------------------------------------------
// Interceptor trait
// ---------------------------------------------------------------------------

/// A cross-cutting handler wrapped around every operation execution.
///
/// Interceptors run in registration order. Each receives the operation and
/// the remainder of the chain; calling [`Chain::proceed`] runs the next
/// interceptor (or, for the last one, the operation itself). An interceptor
/// may also return early without proceeding, for example to veto the
/// operation with [`StowageError::rejected`].
///
/// The trait is object-safe and `Send + Sync` so interceptors can be stored
/// in a `Vec<Arc<dyn Interceptor>>` and shared across threads.
///
/// [`StowageError::rejected`]: crate::StowageError::rejected
pub trait Interceptor: Send + Sync {
    fn intercept(&self, operation: &dyn Operation, chain: Chain<'_>)
        -> StowageResult<OperationOutput>;
}

// ---------------------------------------------------------------------------
// Chain
// ---------------------------------------------------------------------------

/// The not-yet-run remainder of an interceptor chain.
///
/// `proceed` consumes the chain, so a link can call through at most once.
pub struct Chain<'a> {
    interceptors: &'a [Arc<dyn Interceptor>],
    terminal: &'a Terminal<'a>,
}

impl<'a> Chain<'a> {
    pub(crate) fn new(interceptors: &'a [Arc<dyn Interceptor>], terminal: &'a Terminal<'a>) -> Self {
        Self {
            interceptors,
            terminal,
        }
    }

    /// Number of interceptors still ahead of the terminal step.
    pub fn remaining(&self) -> usize {
        self.interceptors.len()
    }

    /// Hand the operation to the next link.
    pub fn proceed(self, operation: &dyn Operation) -> StowageResult<OperationOutput> {
        match self.interceptors.split_first() {
            Some((head, rest)) => head.intercept(operation, Chain::new(rest, self.terminal)),
            None => (self.terminal)(operation),
        }
    }
}
