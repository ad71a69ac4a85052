use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum TaskdeckError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Not found: {0}")]
    NotFound(Uuid),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),
}

impl TaskdeckError {
    /// True for errors raised by the persistence layer. The in-memory
    /// mutation has already been applied when a save reports one of these;
    /// callers should warn that durability is not guaranteed for the change.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            TaskdeckError::Io(_) | TaskdeckError::Serialization(_) | TaskdeckError::Store(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TaskdeckError>;
