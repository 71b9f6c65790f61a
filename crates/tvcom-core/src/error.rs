//! Error types for the TV.com harvester
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Error type for TV.com harvester operations
#[derive(Error, Debug)]
pub enum TvComError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Failed to parse HTML content
    #[error("Failed to parse HTML: {0}")]
    ParseError(String),

    /// Search query was empty or otherwise unusable
    #[error("Invalid search query: {0}")]
    InvalidQuery(String),

    /// Rate limited by the server (HTTP 429)
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Requested page was not found (HTTP 404)
    #[error("Page not found: {0}")]
    NotFound(String),
}

/// Result type alias for TV.com harvester operations
pub type Result<T> = std::result::Result<T, TvComError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_parse_error() {
        let error = TvComError::ParseError("missing element".to_string());
        assert_eq!(error.to_string(), "Failed to parse HTML: missing element");
    }

    #[test]
    fn test_error_display_invalid_query() {
        let error = TvComError::InvalidQuery("query cannot be empty".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid search query: query cannot be empty"
        );
    }

    #[test]
    fn test_error_display_rate_limited() {
        let error = TvComError::RateLimited;
        assert_eq!(error.to_string(), "Rate limited - too many requests");
    }

    #[test]
    fn test_error_display_not_found() {
        let error = TvComError::NotFound("http://www.tv.com/nothing".to_string());
        assert_eq!(
            error.to_string(),
            "Page not found: http://www.tv.com/nothing"
        );
    }
}
