use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Repository not found: {0}")]
    NotFound(String),

    #[error("Repository name must not be empty")]
    EmptyInput,

    #[error("Repository already tracked: {0}")]
    Duplicate(String),

    #[error("Invalid route: {0}")]
    Route(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TrackError>;
