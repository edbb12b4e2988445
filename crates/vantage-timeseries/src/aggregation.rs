//! Vantage Time Series Aggregation
//!
//! Single-pass statistics over one metric column of a series, and the usage
//! summaries shown on the status cards.
//!
//! @version 0.1.0
//! @author Vantage Development Team

use crate::types::{MetricKind, MetricSeriesPoint};
use serde::{Deserialize, Serialize};

// =============================================================================
// Aggregator
// =============================================================================

/// Streaming accumulator over the samples of one metric.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Aggregator {
    count: usize,
    sum: f64,
    peak: Option<f64>,
    latest: Option<(i64, f64)>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one sample. The latest sample is the one with the highest
    /// timestamp; on a tie the later call wins.
    pub fn add(&mut self, timestamp_seconds: i64, value: f64) {
        self.count += 1;
        self.sum += value;
        self.peak = Some(self.peak.map_or(value, |peak| peak.max(value)));
        if self.latest.map_or(true, |(ts, _)| timestamp_seconds >= ts) {
            self.latest = Some((timestamp_seconds, value));
        }
    }

    /// Accumulate `kind` across `points`, skipping points without it.
    pub fn over(points: &[MetricSeriesPoint], kind: MetricKind) -> Self {
        let mut aggregator = Self::new();
        for point in points {
            if let Some(value) = point.get(kind) {
                aggregator.add(point.timestamp_seconds, value);
            }
        }
        aggregator
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    pub fn peak(&self) -> Option<f64> {
        self.peak
    }

    /// `(timestamp_seconds, value)` of the most recent sample.
    pub fn latest(&self) -> Option<(i64, f64)> {
        self.latest
    }
}

// =============================================================================
// Usage Summary
// =============================================================================

/// Latest, average and peak value of one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSummary {
    pub metric: MetricKind,
    pub latest: f64,
    pub latest_timestamp_seconds: i64,
    pub average: f64,
    pub peak: f64,
    pub samples: usize,
}

impl UsageSummary {
    /// Summarize `kind` over a series. Returns `None` when no point carries
    /// the metric.
    pub fn from_points(points: &[MetricSeriesPoint], kind: MetricKind) -> Option<Self> {
        let stats = Aggregator::over(points, kind);
        let (latest_timestamp_seconds, latest) = stats.latest()?;

        Some(Self {
            metric: kind,
            latest,
            latest_timestamp_seconds,
            average: stats.mean()?,
            peak: stats.peak()?,
            samples: stats.count(),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
