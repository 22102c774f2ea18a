//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::{DepartmentId, DomainError};

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("records file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("cannot determine record format of {0} (use --format json|toml)")]
    UnsupportedFormat(PathBuf),

    #[error("cannot decode {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("department not found: {0}")]
    DepartmentNotFound(DepartmentId),

    #[error("no records file given and none configured")]
    NoInput,

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
