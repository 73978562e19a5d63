use thiserror::Error;

#[derive(Error, Debug)]
pub enum WashError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl WashError {
    /// Whether the error originates on the server side rather than from the request.
    pub fn is_server_error(&self) -> bool {
        matches!(self, WashError::Database(_) | WashError::Internal(_))
    }
}

pub type WashResult<T> = Result<T, WashError>;
