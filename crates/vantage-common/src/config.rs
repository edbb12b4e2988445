//! Vantage Config - Configuration Structures
//!
//! Configuration for the dashboard query core. Supports loading from TOML
//! files and programmatic construction; every section has defaults so an
//! empty file is a valid configuration.
//!
//! Key Features:
//! - Poll intervals for status tables, metric tables, charts and the clock
//! - Pagination defaults and limits for directory listings
//! - Data source selection (mock fixtures or REST endpoints)
//!
//! @version 0.1.0
//! @author Vantage Development Team

use crate::error::{Result, VantageError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

// =============================================================================
// Polling Configuration
// =============================================================================

/// Refresh intervals for the polled data sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub status_table_secs: u64,
    pub metrics_table_secs: u64,
    pub timeseries_chart_secs: u64,
    pub clock_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            status_table_secs: 30,
            metrics_table_secs: 30,
            timeseries_chart_secs: 60,
            clock_secs: 60,
        }
    }
}

impl PollingConfig {
    pub fn status_table(&self) -> Duration {
        Duration::from_secs(self.status_table_secs)
    }

    pub fn metrics_table(&self) -> Duration {
        Duration::from_secs(self.metrics_table_secs)
    }

    pub fn timeseries_chart(&self) -> Duration {
        Duration::from_secs(self.timeseries_chart_secs)
    }

    pub fn clock(&self) -> Duration {
        Duration::from_secs(self.clock_secs)
    }
}

// =============================================================================
// Pagination Configuration
// =============================================================================

/// Page size defaults for directory listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

impl PaginationConfig {
    /// Resolve a requested limit against the configured bounds.
    pub fn clamp_limit(&self, requested: Option<usize>) -> usize {
        match requested {
            Some(0) | None => self.default_page_size,
            Some(limit) => limit.min(self.max_page_size),
        }
    }
}

// =============================================================================
// Source Configuration
// =============================================================================

/// Where the dashboard reads its records from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    #[default]
    Mock,
    Rest,
}

/// Configuration for the data sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub mode: SourceMode,
    pub data_dir: PathBuf,
    pub base_url: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            mode: SourceMode::Mock,
            data_dir: PathBuf::from("./fixtures"),
            base_url: None,
        }
    }
}

// =============================================================================
// Dashboard Configuration
// =============================================================================

/// Top-level dashboard configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DashboardConfig {
    pub polling: PollingConfig,
    pub pagination: PaginationConfig,
    pub sources: SourceConfig,
}

impl DashboardConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: DashboardConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would stall polling or produce empty pages.
    pub fn validate(&self) -> Result<()> {
        let polling = &self.polling;
        if polling.status_table_secs == 0
            || polling.metrics_table_secs == 0
            || polling.timeseries_chart_secs == 0
            || polling.clock_secs == 0
        {
            return Err(VantageError::Configuration(
                "poll intervals must be at least one second".to_string(),
            ));
        }

        if self.pagination.default_page_size == 0 || self.pagination.max_page_size == 0 {
            return Err(VantageError::Configuration(
                "page sizes must be greater than zero".to_string(),
            ));
        }

        if self.sources.mode == SourceMode::Rest && self.sources.base_url.is_none() {
            return Err(VantageError::Configuration(
                "rest source mode requires sources.base_url".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.polling.metrics_table(), Duration::from_secs(30));
        assert_eq!(config.polling.timeseries_chart(), Duration::from_secs(60));
        assert_eq!(config.polling.clock(), Duration::from_secs(60));
        assert_eq!(config.pagination.default_page_size, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = DashboardConfig::from_toml(
            r#"
            [polling]
            timeseries_chart_secs = 120

            [pagination]
            max_page_size = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.polling.timeseries_chart_secs, 120);
        assert_eq!(config.polling.status_table_secs, 30);
        assert_eq!(config.pagination.max_page_size, 50);
        assert_eq!(config.pagination.default_page_size, 10);
        assert_eq!(config.sources.mode, SourceMode::Mock);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let result = DashboardConfig::from_toml("[polling]\nclock_secs = 0\n");
        assert!(matches!(result, Err(VantageError::Configuration(_))));
    }

    #[test]
    fn test_rest_mode_requires_base_url() {
        let result = DashboardConfig::from_toml("[sources]\nmode = \"rest\"\n");
        assert!(matches!(result, Err(VantageError::Configuration(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file should be created");
        writeln!(file, "[sources]\ndata_dir = \"/srv/vantage\"").unwrap();

        let config = DashboardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.sources.data_dir, PathBuf::from("/srv/vantage"));
    }

    #[test]
    fn test_clamp_limit() {
        let pagination = PaginationConfig::default();
        assert_eq!(pagination.clamp_limit(None), 10);
        assert_eq!(pagination.clamp_limit(Some(0)), 10);
        assert_eq!(pagination.clamp_limit(Some(25)), 25);
        assert_eq!(pagination.clamp_limit(Some(1_000)), 100);
    }
}
