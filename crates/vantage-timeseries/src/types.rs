//! Vantage Time Series Types
//!
//! Core data types for resource usage series.
//!
//! @version 0.1.0
//! @author Vantage Development Team

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Metric Kind
// =============================================================================

/// Resource usage metric shown on the usage charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Cpu,
    Memory,
    Storage,
}

impl MetricKind {
    pub const ALL: [MetricKind; 3] = [MetricKind::Cpu, MetricKind::Memory, MetricKind::Storage];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Cpu => "cpu",
            MetricKind::Memory => "memory",
            MetricKind::Storage => "storage",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Metric Sample
// =============================================================================

/// A `(timestampSeconds, value)` pair from a single-metric source. Encoded
/// on the wire as a two element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(i64, f64)", into = "(i64, f64)")]
pub struct MetricSample {
    pub timestamp_seconds: i64,
    pub value: f64,
}

impl MetricSample {
    pub fn new(timestamp_seconds: i64, value: f64) -> Self {
        Self {
            timestamp_seconds,
            value,
        }
    }
}

impl From<(i64, f64)> for MetricSample {
    fn from((timestamp_seconds, value): (i64, f64)) -> Self {
        Self::new(timestamp_seconds, value)
    }
}

impl From<MetricSample> for (i64, f64) {
    fn from(sample: MetricSample) -> Self {
        (sample.timestamp_seconds, sample.value)
    }
}

// =============================================================================
// Metric Series Point
// =============================================================================

/// One timestamp of the merged usage series. Any subset of metrics may be
/// present when sources sample at different times.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSeriesPoint {
    pub timestamp_seconds: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<f64>,
}

impl MetricSeriesPoint {
    pub fn at(timestamp_seconds: i64) -> Self {
        Self {
            timestamp_seconds,
            ..Default::default()
        }
    }

    pub fn with(mut self, kind: MetricKind, value: f64) -> Self {
        self.set(kind, value);
        self
    }

    pub fn get(&self, kind: MetricKind) -> Option<f64> {
        match kind {
            MetricKind::Cpu => self.cpu,
            MetricKind::Memory => self.memory,
            MetricKind::Storage => self.storage,
        }
    }

    pub fn set(&mut self, kind: MetricKind, value: f64) {
        let slot = match kind {
            MetricKind::Cpu => &mut self.cpu,
            MetricKind::Memory => &mut self.memory,
            MetricKind::Storage => &mut self.storage,
        };
        *slot = Some(value);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_wire_format() {
        let samples: Vec<MetricSample> = serde_json::from_str("[[1000, 50.5], [1060, 51]]").unwrap();
        assert_eq!(samples, vec![MetricSample::new(1000, 50.5), MetricSample::new(1060, 51.0)]);

        let encoded = serde_json::to_string(&samples[0]).unwrap();
        assert_eq!(encoded, "[1000,50.5]");
    }

    #[test]
    fn test_point_partial_fields() {
        let point: MetricSeriesPoint =
            serde_json::from_str(r#"{"timestampSeconds": 2000, "storage": 70}"#).unwrap();
        assert_eq!(point, MetricSeriesPoint::at(2000).with(MetricKind::Storage, 70.0));
        assert_eq!(point.get(MetricKind::Cpu), None);

        let json = serde_json::to_value(point).unwrap();
        assert!(json.get("cpu").is_none());
        assert_eq!(json["timestampSeconds"], 2000);
    }

    #[test]
    fn test_metric_kind_names() {
        let names: Vec<&str> = MetricKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(names, vec!["cpu", "memory", "storage"]);
    }
}
