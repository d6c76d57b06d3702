//! Error types for Portfolio Insights

use thiserror::Error;

/// Errors raised by the library
#[derive(Debug, Error)]
pub enum PortfolioError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, PortfolioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = PortfolioError::Api {
            status: 404,
            message: "Asset not found".to_string(),
        };
        assert_eq!(err.to_string(), "API error 404: Asset not found");
    }
}
