//! Vantage Fixture Sources
//!
//! File-backed sources used in `mock` mode. Layout under the data directory:
//!
//! ```text
//! users.json                 [DirectoryRecord]
//! vcenters.json              [{id, name}]
//! clusters.json              [{id, name, vCenterId, tagIds}]
//! tags.json                  [{id, name}]
//! metrics/combined.json      [{timestampSeconds, cpu?, memory?, storage?}]
//! metrics/{cpu,memory,storage}.json   [[timestampSeconds, value]]
//! ```
//!
//! Files are re-read on every fetch so edits show up on the next poll.
//!
//! @version 0.1.0
//! @author Vantage Development Team

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use vantage_common::SelectionOption;
use vantage_directory::DirectoryRecord;
use vantage_selection::SelectionScope;
use vantage_streaming::{DirectorySource, FetchError, MetricSource, SelectionSource};
use vantage_timeseries::{MetricKind, MetricSample, MetricSeriesPoint};

/// One entry of `clusters.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterFixture {
    pub id: String,
    pub name: String,
    pub v_center_id: String,
    #[serde(default)]
    pub tag_ids: BTreeSet<String>,
}

pub struct FixtureSource {
    data_dir: PathBuf,
}

impl FixtureSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    async fn read<T: DeserializeOwned>(&self, relative: &str) -> Result<T, FetchError> {
        let path = self.data_dir.join(relative);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| FetchError::new(relative, format!("{}: {}", path.display(), e)))?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::new(relative, e.to_string()))
    }
}

#[async_trait]
impl DirectorySource for FixtureSource {
    async fn fetch(&self) -> Result<Vec<DirectoryRecord>, FetchError> {
        self.read("users.json").await
    }
}

#[async_trait]
impl SelectionSource for FixtureSource {
    async fn vcenters(&self) -> Result<Vec<SelectionOption>, FetchError> {
        self.read("vcenters.json").await
    }

    async fn clusters(
        &self,
        v_center_id: &str,
        tag_ids: &BTreeSet<String>,
    ) -> Result<Vec<SelectionOption>, FetchError> {
        let clusters: Vec<ClusterFixture> = self.read("clusters.json").await?;
        Ok(clusters
            .into_iter()
            .filter(|c| c.v_center_id == v_center_id && tag_ids.is_subset(&c.tag_ids))
            .map(|c| SelectionOption::new(c.id, c.name))
            .collect())
    }

    async fn tags(&self) -> Result<Vec<SelectionOption>, FetchError> {
        self.read("tags.json").await
    }
}

// Fixture series are shared by every scope.
#[async_trait]
impl MetricSource for FixtureSource {
    async fn fetch(&self, kind: MetricKind, _scope: &SelectionScope) -> Result<Vec<MetricSample>, FetchError> {
        self.read(&format!("metrics/{}.json", kind)).await
    }

    async fn fetch_combined(&self, _scope: &SelectionScope) -> Result<Vec<MetricSeriesPoint>, FetchError> {
        self.read("metrics/combined.json").await
    }
}
