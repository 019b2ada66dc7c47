use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScreeningError {
    #[error("name is empty after normalization")]
    EmptyName,

    #[error("threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("no watchlists selected")]
    NoListsSelected,

    #[error("unknown watchlist code: {0}")]
    UnknownList(String),

    #[error("unparseable date: {0}")]
    InvalidDate(String),
}

pub type Result<T> = std::result::Result<T, ScreeningError>;
