use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parsing error: {message}")]
    Parse { message: String },

    #[error("Render error: {0}")]
    Render(String),

    #[error("Timed out after {seconds}s waiting for {operation}")]
    Timeout { operation: String, seconds: u64 },

    #[error("Invalid selector: {selector}")]
    InvalidSelector { selector: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// True for failures the adapters recover from locally as "zero results".
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AppError::Http(_) | AppError::Render(_) | AppError::Timeout { .. }
        )
    }
}

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
