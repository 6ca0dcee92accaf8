//! Error types for cistern

use thiserror::Error;

/// Core error type for cistern operations
#[derive(Error, Debug)]
pub enum CisternError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Driver unavailable: {0}")]
    DriverUnavailable(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Provisioning error: {0}")]
    Provisioning(String),

    #[error("Teardown error: {0}")]
    Teardown(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CisternError {
    /// Stable category label used in structured log records.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::DriverUnavailable(_) => "driver-unavailable",
            Self::Connection(_) => "connection",
            Self::Provisioning(_) => "provisioning",
            Self::Teardown(_) => "teardown",
            Self::NotFound(_) => "not-found",
            Self::Io(_) => "io",
        }
    }
}

/// Result type alias for cistern operations
pub type Result<T> = std::result::Result<T, CisternError>;
