/// Main engine error type
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("network error: {0}")]
    Network(String),

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("engine is no longer running")]
    Closed,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        EngineError::Network(err.to_string())
    }
}

/// Custom result type for the engine
pub type EngineResult<T> = Result<T, EngineError>;
