//! Vantage Static Sources
//!
//! In-memory sources for tests, demos and the CLI's mock mode. Contents can
//! be swapped at runtime and individual operations can be made to fail or
//! to respond slowly.
//!
//! @version 0.1.0
//! @author Vantage Development Team

use crate::source::{DirectorySource, FetchError, MetricSource, SelectionSource};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use vantage_common::SelectionOption;
use vantage_directory::DirectoryRecord;
use vantage_selection::SelectionScope;
use vantage_timeseries::{MetricKind, MetricSample, MetricSeriesPoint};

// =============================================================================
// Fault Injection
// =============================================================================

/// Per-operation failures and delays shared by the static sources.
#[derive(Default)]
struct Faults {
    failing: RwLock<HashSet<String>>,
    delays: RwLock<HashMap<String, Duration>>,
    calls: RwLock<HashMap<String, usize>>,
}

impl Faults {
    async fn enter(&self, operation: &str) -> Result<(), FetchError> {
        *self.calls.write().entry(operation.to_string()).or_insert(0) += 1;

        let delay = self.delays.read().get(operation).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.read().contains(operation) {
            return Err(FetchError::new(operation, "injected failure"));
        }
        Ok(())
    }

    fn set_failing(&self, operation: &str, failing: bool) {
        let mut set = self.failing.write();
        if failing {
            set.insert(operation.to_string());
        } else {
            set.remove(operation);
        }
    }

    fn set_delay(&self, operation: &str, delay: Option<Duration>) {
        let mut delays = self.delays.write();
        match delay {
            Some(delay) => delays.insert(operation.to_string(), delay),
            None => delays.remove(operation),
        };
    }

    fn calls(&self, operation: &str) -> usize {
        self.calls.read().get(operation).copied().unwrap_or(0)
    }
}

// =============================================================================
// Static Metric Source
// =============================================================================

/// Serves the same series for every scope. Operation names for fault
/// injection are `combined`, `cpu`, `memory` and `storage`.
#[derive(Default)]
pub struct StaticMetricSource {
    combined: RwLock<Vec<MetricSeriesPoint>>,
    series: RwLock<HashMap<MetricKind, Vec<MetricSample>>>,
    faults: Faults,
    total_calls: AtomicUsize,
}

impl StaticMetricSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_combined(self, points: Vec<MetricSeriesPoint>) -> Self {
        *self.combined.write() = points;
        self
    }

    pub fn with_series(self, kind: MetricKind, samples: Vec<MetricSample>) -> Self {
        self.series.write().insert(kind, samples);
        self
    }

    pub fn set_combined(&self, points: Vec<MetricSeriesPoint>) {
        *self.combined.write() = points;
    }

    pub fn set_failing(&self, operation: &str, failing: bool) {
        self.faults.set_failing(operation, failing);
    }

    pub fn set_delay(&self, operation: &str, delay: Option<Duration>) {
        self.faults.set_delay(operation, delay);
    }

    pub fn calls(&self, operation: &str) -> usize {
        self.faults.calls(operation)
    }

    /// Total fetches served, across all operations.
    pub fn total_calls(&self) -> usize {
        self.total_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetricSource for StaticMetricSource {
    async fn fetch(&self, kind: MetricKind, _scope: &SelectionScope) -> Result<Vec<MetricSample>, FetchError> {
        self.total_calls.fetch_add(1, Ordering::SeqCst);
        self.faults.enter(kind.as_str()).await?;
        Ok(self.series.read().get(&kind).cloned().unwrap_or_default())
    }

    async fn fetch_combined(&self, _scope: &SelectionScope) -> Result<Vec<MetricSeriesPoint>, FetchError> {
        self.total_calls.fetch_add(1, Ordering::SeqCst);
        self.faults.enter("combined").await?;
        Ok(self.combined.read().clone())
    }
}

// =============================================================================
// Static Selection Source
// =============================================================================

#[derive(Debug, Clone)]
struct ClusterEntry {
    v_center_id: String,
    option: SelectionOption,
    tags: BTreeSet<String>,
}

/// Serves fixed vCenter, cluster and tag lists. A cluster is returned for a
/// tag filter when it carries every requested tag. Operation names are
/// `vcenters`, `clusters` and `tags`.
#[derive(Default)]
pub struct StaticSelectionSource {
    vcenters: RwLock<Vec<SelectionOption>>,
    clusters: RwLock<Vec<ClusterEntry>>,
    tags: RwLock<Vec<SelectionOption>>,
    faults: Faults,
}

impl StaticSelectionSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vcenter(self, id: &str, name: &str) -> Self {
        self.vcenters.write().push(SelectionOption::new(id, name));
        self
    }

    pub fn with_cluster(self, v_center_id: &str, id: &str, name: &str, tags: &[&str]) -> Self {
        self.clusters.write().push(ClusterEntry {
            v_center_id: v_center_id.to_string(),
            option: SelectionOption::new(id, name),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        });
        self
    }

    pub fn with_tag(self, id: &str, name: &str) -> Self {
        self.tags.write().push(SelectionOption::new(id, name));
        self
    }

    /// Drop every cluster of `v_center_id`.
    pub fn clear_clusters(&self, v_center_id: &str) {
        self.clusters.write().retain(|c| c.v_center_id != v_center_id);
    }

    pub fn set_failing(&self, operation: &str, failing: bool) {
        self.faults.set_failing(operation, failing);
    }

    pub fn set_delay(&self, operation: &str, delay: Option<Duration>) {
        self.faults.set_delay(operation, delay);
    }

    pub fn calls(&self, operation: &str) -> usize {
        self.faults.calls(operation)
    }
}

#[async_trait]
impl SelectionSource for StaticSelectionSource {
    async fn vcenters(&self) -> Result<Vec<SelectionOption>, FetchError> {
        self.faults.enter("vcenters").await?;
        Ok(self.vcenters.read().clone())
    }

    async fn clusters(
        &self,
        v_center_id: &str,
        tag_ids: &BTreeSet<String>,
    ) -> Result<Vec<SelectionOption>, FetchError> {
        self.faults.enter("clusters").await?;
        Ok(self
            .clusters
            .read()
            .iter()
            .filter(|c| c.v_center_id == v_center_id && tag_ids.is_subset(&c.tags))
            .map(|c| c.option.clone())
            .collect())
    }

    async fn tags(&self) -> Result<Vec<SelectionOption>, FetchError> {
        self.faults.enter("tags").await?;
        Ok(self.tags.read().clone())
    }
}

// =============================================================================
// Static Directory Source
// =============================================================================

/// Serves a fixed record list. The operation name is `directory`.
#[derive(Default)]
pub struct StaticDirectorySource {
    records: RwLock<Vec<DirectoryRecord>>,
    faults: Faults,
}

impl StaticDirectorySource {
    pub fn new(records: Vec<DirectoryRecord>) -> Self {
        Self {
            records: RwLock::new(records),
            faults: Faults::default(),
        }
    }

    pub fn set_records(&self, records: Vec<DirectoryRecord>) {
        *self.records.write() = records;
    }

    pub fn set_failing(&self, failing: bool) {
        self.faults.set_failing("directory", failing);
    }
}

#[async_trait]
impl DirectorySource for StaticDirectorySource {
    async fn fetch(&self) -> Result<Vec<DirectoryRecord>, FetchError> {
        self.faults.enter("directory").await?;
        Ok(self.records.read().clone())
    }
}

// =============================================================================
// Tests
// =============================================================================
