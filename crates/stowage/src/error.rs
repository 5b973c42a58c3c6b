use stowage_store::StoreError;
use thiserror::Error;

use crate::operation::OperationKind;

/// Why an operation's execution failed.
#[derive(Debug, Error)]
pub enum ExecutionCause {
    /// No explicit resolver was supplied and no type mapping is registered
    /// for the element type.
    #[error("no type mapping found for {type_name}; register one or supply a put resolver")]
    MissingTypeMapping { type_name: &'static str },

    /// The underlying store failed while an item was being written.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An interceptor refused to let the operation proceed.
    #[error("rejected by interceptor: {0}")]
    Interceptor(String),

    /// An interceptor replaced the operation output with a value of the
    /// wrong type.
    #[error("interceptor returned output of unexpected type, expected {expected}")]
    InterceptorOutput { expected: &'static str },

    /// The scheduled task panicked or was cancelled.
    #[error("scheduled execution failed: {0}")]
    Scheduler(String),
}

/// The single error type surfaced by Stowage.
#[derive(Debug, Error)]
pub enum StowageError {
    /// Execution of a prepared operation failed. The original failure is
    /// preserved as the error source.
    #[error("error occurred during {operation}: {cause}")]
    Execution {
        operation: OperationKind,
        #[source]
        cause: ExecutionCause,
    },

    /// The facade could not be built from the supplied configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl StowageError {
    /// Wrap an execution failure of `operation`.
    pub fn execution(operation: OperationKind, cause: impl Into<ExecutionCause>) -> Self {
        Self::Execution {
            operation,
            cause: cause.into(),
        }
    }

    /// Convenience for interceptors that veto an operation.
    pub fn rejected(operation: OperationKind, reason: impl Into<String>) -> Self {
        Self::execution(operation, ExecutionCause::Interceptor(reason.into()))
    }

    /// The execution cause, if this is an execution failure.
    pub fn cause(&self) -> Option<&ExecutionCause> {
        match self {
            Self::Execution { cause, .. } => Some(cause),
            Self::Config(_) => None,
        }
    }

    /// Returns `true` if execution failed because no resolver could be found.
    pub fn is_missing_type_mapping(&self) -> bool {
        matches!(self.cause(), Some(ExecutionCause::MissingTypeMapping { .. }))
    }
}

pub type StowageResult<T> = Result<T, StowageError>;
