use thiserror::Error;

/// Comparison client errors
#[derive(Error, Debug)]
pub enum CompareError {
    /// Rejected before any request was made (e.g. an empty query)
    #[error("{0}")]
    ValidationError(String),

    #[error("Configuration Error: {0}")]
    ConfigError(String),

    /// The backend could not be reached
    #[error("Transport Error: {0}")]
    TransportError(String),

    /// The envelope or HTTP status reported a failure
    #[error("{message}")]
    ServerError { status_code: u16, message: String },

    #[error("Parsing Error: {0}")]
    ParsingError(String),
}

impl CompareError {
    /// True when the failure happened before reaching the backend, or the
    /// backend answered with something that is not an envelope at all.
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            CompareError::TransportError(_) | CompareError::ParsingError(_)
        )
    }
}

impl From<reqwest::Error> for CompareError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            CompareError::ParsingError(format!("Failed to parse response: {}", e))
        } else if e.is_timeout() {
            CompareError::TransportError(format!("Request timeout: {}", e))
        } else if e.is_connect() {
            CompareError::TransportError(format!("Network error: {}", e))
        } else {
            CompareError::TransportError(format!("Failed to send request: {}", e))
        }
    }
}

/// Result type for comparison operations
pub type CompareResult<T> = Result<T, CompareError>;
