use thiserror::Error;

/// Error taxonomy for the Firecrawl adapter.
///
/// Only `FatalConfiguration` and `Authorization` ever reach a tool caller as
/// hard failures. Failures reported by the remote service are downgraded to
/// an in-band [`crate::tools::ToolResponse::OperationalError`] instead.
#[derive(Error, Debug)]
pub enum Error {
    // Misconfiguration (caller must fix setup, never retried)
    #[error("Fatal configuration error: {0}")]
    FatalConfiguration(String),

    // Missing or rejected credentials (caller must re-authenticate)
    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Service error: {0}")]
    Service(String),
}

/// How a failure must be surfaced to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Setup problem; always raised
    Fatal,
    /// Credential problem; always raised
    Authorization,
    /// Anything else; reported as a value
    Operational,
}

impl Error {
    /// Categorize error for propagation policy
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::FatalConfiguration(_) | Self::Config(_) => ErrorCategory::Fatal,
            Self::Authorization(_) => ErrorCategory::Authorization,
            Self::Io(_)
            | Self::Serde(_)
            | Self::Http(_)
            | Self::InvalidInput { .. }
            | Self::Service(_) => ErrorCategory::Operational,
        }
    }

    /// Whether this error must bypass the classifier and propagate as-is
    #[must_use]
    pub const fn is_hard_failure(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Fatal | ErrorCategory::Authorization
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
