//! Vantage Common - Shared Types and Utilities
//!
//! Foundational types used across the Vantage dashboard core. Provides the
//! error taxonomy, configuration structures and the small identifier and
//! text helpers that the directory, selection and metrics layers agree on.
//!
//! Key Features:
//! - Unified error type with retryable / user error classification
//! - Dashboard configuration loaded from TOML with sensible defaults
//! - Type-safe identifiers for selection scopes and query slots
//! - Text normalization shared by every search surface
//!
//! @version 0.1.0
//! @author Vantage Development Team

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use config::{DashboardConfig, PaginationConfig, PollingConfig, SourceConfig, SourceMode};
pub use error::{Result, VantageError};
pub use types::*;
