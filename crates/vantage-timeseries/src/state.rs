//! Vantage Query State
//!
//! Per-source result slots for the usage charts: one combined source and the
//! three per-metric fallbacks, plus the predicate deciding when fallbacks run.
//!
//! @version 0.1.0
//! @author Vantage Development Team

use crate::loading::{LoadingState, LoadingStateResolver};
use crate::merge::{FallbackSeries, TimeSeriesAggregator};
use crate::types::{MetricKind, MetricSample, MetricSeriesPoint};
use crate::view::MetricsView;
use serde::{Deserialize, Serialize};

// =============================================================================
// Source State
// =============================================================================

/// Status of one asynchronous source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceStatus {
    /// Disabled; neither loading nor contributing data.
    Idle,
    Pending,
    Ready,
    Error,
}

/// Result slot of one asynchronous source.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceState<T> {
    Idle,
    Pending,
    Ready(T),
    Failed(String),
}

impl<T> Default for SourceState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> SourceState<T> {
    pub fn status(&self) -> SourceStatus {
        match self {
            Self::Idle => SourceStatus::Idle,
            Self::Pending => SourceStatus::Pending,
            Self::Ready(_) => SourceStatus::Ready,
            Self::Failed(_) => SourceStatus::Error,
        }
    }

    /// Data of a ready source. Failed sources have none.
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn from_result<E: ToString>(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::Ready(data),
            Err(e) => Self::Failed(e.to_string()),
        }
    }
}

/// Whether the per-metric fallback sources may run. Only a combined source
/// that has settled without data enables them; a pending one does not.
pub fn fallback_enabled(combined: &SourceState<Vec<MetricSeriesPoint>>) -> bool {
    match combined {
        SourceState::Ready(points) => points.is_empty(),
        SourceState::Failed(_) => true,
        SourceState::Idle | SourceState::Pending => false,
    }
}

// =============================================================================
// Aggregate Query State
// =============================================================================

/// The combined usage source and its three fallbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateQueryState {
    pub combined: SourceState<Vec<MetricSeriesPoint>>,
    pub cpu: SourceState<Vec<MetricSample>>,
    pub memory: SourceState<Vec<MetricSample>>,
    pub storage: SourceState<Vec<MetricSample>>,
}

impl Default for AggregateQueryState {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregateQueryState {
    /// Fresh state for a new scope: combined in flight, fallbacks disabled.
    pub fn new() -> Self {
        Self {
            combined: SourceState::Pending,
            cpu: SourceState::Idle,
            memory: SourceState::Idle,
            storage: SourceState::Idle,
        }
    }

    pub fn fallback(&self, kind: MetricKind) -> &SourceState<Vec<MetricSample>> {
        match kind {
            MetricKind::Cpu => &self.cpu,
            MetricKind::Memory => &self.memory,
            MetricKind::Storage => &self.storage,
        }
    }

    pub fn fallback_mut(&mut self, kind: MetricKind) -> &mut SourceState<Vec<MetricSample>> {
        match kind {
            MetricKind::Cpu => &mut self.cpu,
            MetricKind::Memory => &mut self.memory,
            MetricKind::Storage => &mut self.storage,
        }
    }

    pub fn fallbacks_enabled(&self) -> bool {
        fallback_enabled(&self.combined)
    }

    /// Apply a combined result and re-evaluate the fallback predicate.
    /// Enabling moves idle fallbacks to pending; disabling returns all of
    /// them to idle and drops their data. Returns the new predicate value.
    pub fn apply_combined(&mut self, combined: SourceState<Vec<MetricSeriesPoint>>) -> bool {
        self.combined = combined;
        let enabled = self.fallbacks_enabled();
        tracing::debug!(
            combined = ?self.combined.status(),
            fallbacks_enabled = enabled,
            "Applied combined usage result"
        );

        for kind in MetricKind::ALL {
            let slot = self.fallback_mut(kind);
            if !enabled {
                *slot = SourceState::Idle;
            } else if slot.is_idle() {
                *slot = SourceState::Pending;
            }
        }

        enabled
    }

    /// Apply a fallback result. Ignored while fallbacks are disabled.
    pub fn apply_fallback(&mut self, kind: MetricKind, state: SourceState<Vec<MetricSample>>) -> bool {
        if !self.fallbacks_enabled() {
            return false;
        }
        *self.fallback_mut(kind) = state;
        true
    }

    /// The merged series for the current results.
    pub fn points(&self) -> Vec<MetricSeriesPoint> {
        let mut fallbacks = FallbackSeries::default();
        if self.fallbacks_enabled() {
            for kind in MetricKind::ALL {
                fallbacks.set(kind, self.fallback(kind).data().map(Vec::as_slice));
            }
        }

        TimeSeriesAggregator::resolve(self.combined.data().map(Vec::as_slice), &fallbacks)
    }

    /// Statuses in `[combined, cpu, memory, storage]` order.
    pub fn statuses(&self) -> [SourceStatus; 4] {
        [
            self.combined.status(),
            self.cpu.status(),
            self.memory.status(),
            self.storage.status(),
        ]
    }

    pub fn loading(&self) -> LoadingState {
        let any_data = !self.points().is_empty();
        LoadingStateResolver::resolve(&self.statuses(), any_data)
    }

    pub fn view(&self) -> MetricsView {
        let points = self.points();
        let loading = LoadingStateResolver::resolve(&self.statuses(), !points.is_empty());
        MetricsView::new(points, loading)
    }
}

// =============================================================================
// Tests
// =============================================================================
