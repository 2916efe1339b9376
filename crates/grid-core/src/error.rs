use std::path::PathBuf;

use thiserror::Error;

use grid_model::ModelError;

/// Errors that abort a grid operation.
#[derive(Debug, Error)]
pub enum GridError {
    /// The record collection cannot be materialized; the previous table stays bound.
    #[error("invalid record collection: {0}")]
    Validation(#[from] ModelError),

    #[error("no record service is configured")]
    ServiceUnavailable,

    #[error("record service failed: {0}")]
    Service(String),

    #[error("failed to load grid options from {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, GridError>;

/// Failures of the owner-thread queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("the owning thread is gone")]
    Disconnected,

    #[error("called on the owning thread, which runs the work directly")]
    OwnerThread,
}
