//! Vantage Time Series Merge
//!
//! Resolution of the combined usage query against the per-metric fallback
//! queries. A non-empty combined result is authoritative and returned as is,
//! even when it lacks a metric a fallback would have supplied. Otherwise the
//! fallback samples are merged on exact timestamps: no interpolation, no
//! forward or backward fill.
//!
//! @version 0.1.0
//! @author Vantage Development Team

use crate::types::{MetricKind, MetricSample, MetricSeriesPoint};
use std::collections::BTreeMap;

// =============================================================================
// Fallback Series
// =============================================================================

/// Per-metric fallback results. `None` means the source has no data, either
/// because it is disabled, still pending or failed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackSeries<'a> {
    pub cpu: Option<&'a [MetricSample]>,
    pub memory: Option<&'a [MetricSample]>,
    pub storage: Option<&'a [MetricSample]>,
}

impl<'a> FallbackSeries<'a> {
    pub fn get(&self, kind: MetricKind) -> Option<&'a [MetricSample]> {
        match kind {
            MetricKind::Cpu => self.cpu,
            MetricKind::Memory => self.memory,
            MetricKind::Storage => self.storage,
        }
    }

    pub fn set(&mut self, kind: MetricKind, samples: Option<&'a [MetricSample]>) {
        match kind {
            MetricKind::Cpu => self.cpu = samples,
            MetricKind::Memory => self.memory = samples,
            MetricKind::Storage => self.storage = samples,
        }
    }
}

// =============================================================================
// Time Series Aggregator
// =============================================================================

/// Combines the combined source and the fallback sources into one series.
pub struct TimeSeriesAggregator;

impl TimeSeriesAggregator {
    /// Produce the usage series shown by the charts.
    pub fn resolve(
        combined: Option<&[MetricSeriesPoint]>,
        fallbacks: &FallbackSeries<'_>,
    ) -> Vec<MetricSeriesPoint> {
        if let Some(points) = combined.filter(|points| !points.is_empty()) {
            return points.to_vec();
        }

        let series: Vec<(MetricKind, &[MetricSample])> = MetricKind::ALL
            .iter()
            .filter_map(|kind| fallbacks.get(*kind).map(|samples| (*kind, samples)))
            .collect();

        Self::merge(&series)
    }

    /// Merge single-metric series into one point per distinct timestamp,
    /// ascending. A repeated timestamp within one series keeps the later value.
    pub fn merge(series: &[(MetricKind, &[MetricSample])]) -> Vec<MetricSeriesPoint> {
        let mut by_timestamp: BTreeMap<i64, MetricSeriesPoint> = BTreeMap::new();

        for (kind, samples) in series {
            for sample in samples.iter() {
                by_timestamp
                    .entry(sample.timestamp_seconds)
                    .or_insert_with(|| MetricSeriesPoint::at(sample.timestamp_seconds))
                    .set(*kind, sample.value);
            }
        }

        // BTreeMap iterates in key order, so the result is ascending.
        by_timestamp.into_values().collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
