//! Error types for the Cooccur engine
//!
//! A single error hierarchy built with `thiserror`:
//! - Configuration errors fail fast at startup
//! - Mining errors separate structural failures (empty input) from
//!   per-candidate arithmetic that callers may skip
//! - Data errors carry the offending path for actionable messages

use std::borrow::Cow;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Cooccur operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Cooccur engine
#[derive(Debug, Error)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidConfig {
        key: &'static str,
        message: Cow<'static, str>,
    },

    #[error("Invalid threshold {key}={value}: must be within [0, 1]")]
    InvalidThreshold { key: &'static str, value: f64 },

    // ========================================================================
    // Mining Errors
    // ========================================================================
    #[error("Transaction set is empty: support is undefined")]
    EmptyTransactionSet,

    #[error("Degenerate support for {itemset}: confidence/lift undefined")]
    DegenerateSupport { itemset: String },

    // ========================================================================
    // Data Errors
    // ========================================================================
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Missing column '{column}' in {}", path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl Error {
    // ========================================================================
    // Constructors for common error patterns
    // ========================================================================

    /// Create an I/O error bound to a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a CSV error bound to a path
    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    /// Create a degenerate-support error for the given itemset description
    pub fn degenerate(itemset: impl Into<String>) -> Self {
        Self::DegenerateSupport {
            itemset: itemset.into(),
        }
    }

    // ========================================================================
    // Error Classification
    // ========================================================================

    /// Returns true if the error concerns a single candidate and the
    /// surrounding pass can continue without it
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::DegenerateSupport { .. })
    }

    /// Returns true if this error should be logged at error level
    pub fn is_error_level(&self) -> bool {
        matches!(
            self,
            Error::Io { .. } | Error::Csv { .. } | Error::Json(_) | Error::Other(_)
        )
    }

    /// Stable error code for logs and exit reporting
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::InvalidConfig { .. } => "CONFIG_ERROR",
            Error::InvalidThreshold { .. } => "INVALID_THRESHOLD",
            Error::EmptyTransactionSet => "EMPTY_TRANSACTION_SET",
            Error::DegenerateSupport { .. } => "DEGENERATE_SUPPORT",
            Error::Io { .. } => "IO_ERROR",
            Error::Csv { .. } | Error::MissingColumn { .. } => "DATA_ERROR",
            Error::Json(_) => "SERIALIZATION_ERROR",
            Error::Other(_) => "INTERNAL_ERROR",
        }
    }
}
