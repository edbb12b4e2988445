//! Vantage Error - Unified Error Types
//!
//! Error handling for the dashboard query core. Lookups for a specific
//! missing record raise `NotFound`; failed source fetches become
//! `FetchFailure` and are degraded to "no data" by the aggregation layer.
//! Missing optional fields are never errors, they are defaulted on decode.
//!
//! @version 0.1.0
//! @author Vantage Development Team

use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

/// Unified error type for all Vantage operations.
#[derive(Error, Debug)]
pub enum VantageError {
    // Lookup errors
    #[error("not found: {0}")]
    NotFound(String),

    // Source errors
    #[error("fetch from {source_name} failed: {message}")]
    FetchFailure { source_name: String, message: String },

    #[error("channel closed: {0}")]
    ChannelClosed(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    // Serialization errors
    #[error("serialization error: {0}")]
    Serialization(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Type Aliases
// =============================================================================

/// Result type alias for Vantage operations.
pub type Result<T> = std::result::Result<T, VantageError>;

// =============================================================================
// Error Classification
// =============================================================================

impl VantageError {
    /// Build a fetch failure for the named source.
    pub fn fetch(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        VantageError::FetchFailure {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Returns true if the next poll cycle may succeed where this one failed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, VantageError::FetchFailure { .. } | VantageError::Io(_))
    }

    /// Returns true if this is a user error (vs system error).
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            VantageError::NotFound(_) | VantageError::Configuration(_)
        )
    }
}

impl From<toml::de::Error> for VantageError {
    fn from(err: toml::de::Error) -> Self {
        VantageError::Configuration(err.to_string())
    }
}

// =============================================================================
// Tests
// =============================================================================
