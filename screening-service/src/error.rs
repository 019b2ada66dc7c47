use screening_core::ScreeningError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("invalid batch input: {0}")]
    Format(String),

    #[error(transparent)]
    Screening(#[from] ScreeningError),

    #[error("match not found: {0}")]
    MatchNotFound(Uuid),

    #[error("screening task failed: {0}")]
    Task(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ServiceError>;
