use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Records of more than one type were supplied to a single materialization pass.
    #[error("mixed record types in one collection: expected '{expected}', found '{found}'")]
    MixedRecordTypes { expected: String, found: String },
    #[error("invalid logical name: {0:?}")]
    InvalidLogicalName(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
