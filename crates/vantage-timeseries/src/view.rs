//! Vantage Metrics View
//!
//! View model handed to the usage charts and status cards.
//!
//! @version 0.1.0
//! @author Vantage Development Team

use crate::aggregation::UsageSummary;
use crate::loading::LoadingState;
use crate::types::{MetricKind, MetricSeriesPoint};
use serde::{Deserialize, Serialize};

/// Per-metric usage summaries; `None` where the series has no values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub cpu: Option<UsageSummary>,
    pub memory: Option<UsageSummary>,
    pub storage: Option<UsageSummary>,
}

impl MetricsSummary {
    pub fn from_points(points: &[MetricSeriesPoint]) -> Self {
        Self {
            cpu: UsageSummary::from_points(points, MetricKind::Cpu),
            memory: UsageSummary::from_points(points, MetricKind::Memory),
            storage: UsageSummary::from_points(points, MetricKind::Storage),
        }
    }

    pub fn get(&self, kind: MetricKind) -> Option<&UsageSummary> {
        match kind {
            MetricKind::Cpu => self.cpu.as_ref(),
            MetricKind::Memory => self.memory.as_ref(),
            MetricKind::Storage => self.storage.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsView {
    pub points: Vec<MetricSeriesPoint>,
    pub summary: MetricsSummary,
    pub loading: LoadingState,
}

impl MetricsView {
    pub fn new(points: Vec<MetricSeriesPoint>, loading: LoadingState) -> Self {
        let summary = MetricsSummary::from_points(&points);
        Self {
            points,
            summary,
            loading,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_summarizes_points() {
        let points = vec![
            MetricSeriesPoint::at(1000).with(MetricKind::Cpu, 20.0),
            MetricSeriesPoint::at(2000).with(MetricKind::Cpu, 40.0),
        ];
        let view = MetricsView::new(points, LoadingState::default());

        let cpu = view.summary.get(MetricKind::Cpu).unwrap();
        assert_eq!(cpu.latest, 40.0);
        assert_eq!(cpu.average, 30.0);
        assert!(view.summary.get(MetricKind::Memory).is_none());
    }
}
