use thiserror::Error;

#[derive(Error, Debug)]
pub enum DmsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation failed with {} error(s): {}", .0.len(), .0.join("; "))]
    Validation(Vec<String>),

    #[error("Duplicate construct id: {logical_id} (from {path})")]
    DuplicateConstruct { logical_id: String, path: String },

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type DmsResult<T> = Result<T, DmsError>;
