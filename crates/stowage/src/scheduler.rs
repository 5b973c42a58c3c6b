use tokio::runtime::Handle;

use crate::error::{ExecutionCause, StowageError, StowageResult};
use crate::operation::OperationKind;

/// Where async adapters run their blocking execution body.
///
/// The pipeline owns no threads. A scheduler is a handle to a tokio runtime
/// owned by the application; work is submitted to that runtime's blocking
/// pool.
#[derive(Clone, Debug)]
pub struct Scheduler {
    handle: Handle,
}

impl Scheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// The runtime the caller is currently running in, if any.
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Run `work` on the runtime's blocking pool and wait for its result.
    pub(crate) async fn run<O, F>(&self, kind: OperationKind, work: F) -> StowageResult<O>
    where
        O: Send + 'static,
        F: FnOnce() -> StowageResult<O> + Send + 'static,
    {
        match self.handle.spawn_blocking(work).await {
            Ok(result) => result,
            Err(join_error) => Err(StowageError::execution(
                kind,
                ExecutionCause::Scheduler(join_error.to_string()),
            )),
        }
    }
}

impl From<Handle> for Scheduler {
    fn from(handle: Handle) -> Self {
        Self::new(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runtime(name: &str) -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name(name)
            .enable_all()
            .build()
            .unwrap()
    }

    #[test]
    fn current_is_none_outside_runtime() {
        assert!(Scheduler::current().is_none());
    }

    #[tokio::test]
    async fn current_is_some_inside_runtime() {
        assert!(Scheduler::current().is_some());
    }

    #[test]
    fn run_executes_on_runtime_threads() {
        let rt = runtime("sched-probe");
        let scheduler = Scheduler::from(rt.handle().clone());

        let name = futures::executor::block_on(scheduler.run(OperationKind::PutObject, || {
            Ok(std::thread::current().name().map(str::to_string))
        }))
        .unwrap();

        assert_eq!(name.as_deref(), Some("sched-probe"));
    }

    #[test]
    fn panicking_work_becomes_scheduler_error() {
        let rt = runtime("sched-panic");
        let scheduler = Scheduler::new(rt.handle().clone());

        let err = futures::executor::block_on(
            scheduler.run::<(), _>(OperationKind::PutObjects, || panic!("boom")),
        )
        .unwrap_err();

        assert!(matches!(err.cause(), Some(ExecutionCause::Scheduler(_))));
    }
}
