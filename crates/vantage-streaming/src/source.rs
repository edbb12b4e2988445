//! Vantage Data Sources
//!
//! Interfaces to the backends feeding the dashboard. Implementations live in
//! `mock` (in-memory) and in the CLI (fixture files, REST).
//!
//! @version 0.1.0
//! @author Vantage Development Team

use async_trait::async_trait;
use std::collections::BTreeSet;
use thiserror::Error;
use vantage_common::{SelectionOption, VantageError};
use vantage_directory::DirectoryRecord;
use vantage_selection::SelectionScope;
use vantage_timeseries::{MetricKind, MetricSample, MetricSeriesPoint};

// =============================================================================
// Fetch Error
// =============================================================================

/// A single failed fetch. Logged and treated as "no data" by the pipelines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{source_name}: {message}")]
pub struct FetchError {
    pub source_name: String,
    pub message: String,
}

impl FetchError {
    pub fn new(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}

impl From<FetchError> for VantageError {
    fn from(err: FetchError) -> Self {
        VantageError::fetch(err.source_name, err.message)
    }
}

// =============================================================================
// Source Traits
// =============================================================================

/// Resource usage backend.
#[async_trait]
pub trait MetricSource: Send + Sync {
    /// Samples of a single metric for the scope.
    async fn fetch(&self, kind: MetricKind, scope: &SelectionScope) -> Result<Vec<MetricSample>, FetchError>;

    /// All three metrics in one response. May legitimately be empty.
    async fn fetch_combined(&self, scope: &SelectionScope) -> Result<Vec<MetricSeriesPoint>, FetchError>;
}

/// Option lists for the scope pickers.
#[async_trait]
pub trait SelectionSource: Send + Sync {
    async fn vcenters(&self) -> Result<Vec<SelectionOption>, FetchError>;

    /// Clusters of `v_center_id` carrying every tag in `tag_ids`.
    async fn clusters(
        &self,
        v_center_id: &str,
        tag_ids: &BTreeSet<String>,
    ) -> Result<Vec<SelectionOption>, FetchError>;

    async fn tags(&self) -> Result<Vec<SelectionOption>, FetchError>;
}

/// User directory backend.
#[async_trait]
pub trait DirectorySource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<DirectoryRecord>, FetchError>;
}
