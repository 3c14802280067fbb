// src/error/types.rs
use crate::domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Census has not been terminated yet")]
    NotYetTerminated,

    #[error("Species has not been persisted: {0}")]
    SpeciesNotPersisted(String),

    #[error("Census has not been persisted: {0}")]
    CensusNotPersisted(String),

    #[error("Species already exists: {0}")]
    ExistingSpecies(String),

    #[error("Plain name matches multiple species without scientific name: {0}")]
    AmbiguousSpecies(String),

    #[error("Database state corrupt: {0}")]
    DatabaseStateCorrupt(String),

    #[error("Malformed seed data: {0}")]
    MalformedInput(String),

    #[error("Resource not found")]
    NotFound,

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<chrono::ParseError> for AppError {
    fn from(err: chrono::ParseError) -> Self {
        AppError::Other(format!("Date parse error: {}", err))
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Pool(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
