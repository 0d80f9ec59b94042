use thiserror::Error;

#[derive(Error, Debug)]
pub enum StarsError {
    #[error("GitHub API error: {0}")]
    ApiError(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Invalid username: {0:?}")]
    InvalidUsername(String),

    #[error("Invalid page number: {0} (pages start at 1)")]
    InvalidPage(u32),

    #[error("Invalid result cap: {0} (must be at least 1)")]
    InvalidCap(usize),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl StarsError {
    /// Cancellation is an expected outcome, not a failure to show the user.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, StarsError::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, StarsError>;
