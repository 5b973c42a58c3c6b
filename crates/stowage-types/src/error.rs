use thiserror::Error;

/// Errors produced by value-model operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("target name must not be empty")]
    EmptyTarget,

    #[error("invalid target name: {0}")]
    InvalidTarget(String),

    #[error("invalid location: {0}")]
    InvalidLocation(String),

    #[error("value does not serialize to a record (got {0})")]
    NotARecord(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
