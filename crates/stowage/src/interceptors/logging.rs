use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::StowageResult;
use crate::interceptor::{Chain, Interceptor};
use crate::operation::{Operation, OperationOutput};

/// Logs every operation pass with its kind, item count, outcome and elapsed
/// time. Passes slower than the threshold are logged at `warn`.
#[derive(Clone, Debug)]
pub struct LoggingInterceptor {
    slow_threshold: Duration,
}

impl LoggingInterceptor {
    pub fn new(slow_threshold: Duration) -> Self {
        Self { slow_threshold }
    }

    pub fn slow_threshold(&self) -> Duration {
        self.slow_threshold
    }

    fn is_slow(&self, elapsed: Duration) -> bool {
        elapsed > self.slow_threshold
    }
}

impl Default for LoggingInterceptor {
    fn default() -> Self {
        Self::new(Duration::from_millis(250))
    }
}

impl Interceptor for LoggingInterceptor {
    fn intercept(
        &self,
        operation: &dyn Operation,
        chain: Chain<'_>,
    ) -> StowageResult<OperationOutput> {
        let start = Instant::now();
        let result = chain.proceed(operation);
        let elapsed = start.elapsed();

        let kind = operation.kind();
        let items = operation.item_count();
        let elapsed_us = elapsed.as_micros() as u64;
        match &result {
            Ok(_) if self.is_slow(elapsed) => {
                warn!(%kind, items, elapsed_us, "slow operation");
            }
            Ok(_) => debug!(%kind, items, elapsed_us, "operation completed"),
            Err(e) => warn!(%kind, items, elapsed_us, error = %e, "operation failed"),
        }
        result
    }
}
