//! Error types for CiteTrail
//!
//! Provides the shared error taxonomy:
//! - Distinct variants for each failure mode of the traversal
//! - Per-node failures are recovered locally by the scheduler;
//!   only configuration errors abort a run

use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid or missing configuration. Validated before traversal starts;
    /// the only error class that aborts a whole run.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The search provider failed or returned an unusable response.
    #[error("Search provider error: {message}")]
    Search { message: String },

    /// A document could not be obtained for a paper.
    #[error("Acquisition error: {message}")]
    Acquisition { message: String },

    /// Document bytes could not be converted to text.
    #[error("Document parse error: {message}")]
    Parse { message: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Generic
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Whether this error should abort the whole run instead of being
    /// recovered per node.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Configuration { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_is_fatal() {
        let err = AppError::Configuration {
            message: "SERPER_API_KEY is not set".into(),
        };
        assert!(err.is_fatal());
    }

    #[test]
    fn test_per_node_errors_are_recoverable() {
        let acquisition = AppError::Acquisition {
            message: "no document".into(),
        };
        let parse = AppError::Parse {
            message: "bad bytes".into(),
        };
        assert!(!acquisition.is_fatal());
        assert!(!parse.is_fatal());
    }

    #[test]
    fn test_error_display() {
        let err = AppError::Search {
            message: "API error 500".into(),
        };
        assert_eq!(err.to_string(), "Search provider error: API error 500");
    }
}
