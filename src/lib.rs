//! Stacksight: a website technology analysis service
//!
//! This crate implements a REST backend that accepts a website URL, detects
//! the technologies running on it, counts the links on its landing page, and
//! lets clients poll for the result while the analysis runs in the background.

pub mod analysis;
pub mod config;
pub mod server;
pub mod url;

use thiserror::Error;

/// Main error type for Stacksight operations
#[derive(Debug, Error)]
pub enum StacksightError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Request-level errors surfaced to API clients with a machine-readable code
///
/// Every variant maps to exactly one wire code (see [`ApiError::code`]); the
/// server module attaches the HTTP status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("URL is required")]
    MissingUrl,

    #[error("URL must be a string")]
    InvalidUrlType,

    #[error("Invalid URL format. Please provide a valid HTTP/HTTPS URL.")]
    InvalidUrlFormat,

    #[error("Analysis not found")]
    AnalysisNotFound,

    #[error("Failed to create analysis")]
    AnalysisCreationFailed,

    #[error("Limit must be a positive integer")]
    InvalidLimit,

    #[error("Offset must be a non-negative integer")]
    InvalidOffset,

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    /// Returns the machine-readable error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingUrl => "MISSING_URL",
            Self::InvalidUrlType => "INVALID_URL_TYPE",
            Self::InvalidUrlFormat => "INVALID_URL_FORMAT",
            Self::AnalysisNotFound => "ANALYSIS_NOT_FOUND",
            Self::AnalysisCreationFailed => "ANALYSIS_CREATION_FAILED",
            Self::InvalidLimit => "INVALID_LIMIT",
            Self::InvalidOffset => "INVALID_OFFSET",
            Self::Internal => "INTERNAL_ERROR",
        }
    }
}

/// Result type alias for Stacksight operations
pub type Result<T> = std::result::Result<T, StacksightError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for API-boundary operations
pub type ApiResult<T> = std::result::Result<T, ApiError>;

// Re-export commonly used types
pub use analysis::{AnalysisJob, AnalysisService, JobStatus, JobStore, Technology};
pub use config::Config;
pub use url::{is_valid_url, normalize_url};
