use crate::validation::ValidationErrors;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("submission not found: {0}")]
    NotFound(Uuid),
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to read submissions file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write submissions file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to serialize submissions: {0}")]
    Serialization(serde_json::Error),
    #[error("submissions file does not match schema at {path}: {source}")]
    Deserialization {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("review store lock was poisoned")]
    LockPoisoned,
}

pub type IntakeResult<T> = std::result::Result<T, IntakeError>;
