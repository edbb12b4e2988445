//! Vantage Metrics Pipeline
//!
//! Drives the usage charts for one selection scope. The combined source
//! always runs; the three per-metric fallbacks are started and stopped as
//! the fallback predicate changes, which is re-evaluated after every
//! combined result is applied.
//!
//! @version 0.1.0
//! @author Vantage Development Team

use crate::source::MetricSource;
use crate::supervisor::QuerySupervisor;
use crate::task::{Fetcher, SourceUpdate};
use futures::FutureExt;
use std::sync::Arc;
use std::time::Duration;
use vantage_common::{PollingConfig, SlotId};
use vantage_selection::SelectionScope;
use vantage_timeseries::{
    AggregateQueryState, MetricKind, MetricSample, MetricSeriesPoint, MetricsView, SourceState,
};

const COMBINED_SLOT: &str = "metrics.combined";

// =============================================================================
// Metric Fetch
// =============================================================================

/// Payload of a metrics source task.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricFetch {
    Combined(Vec<MetricSeriesPoint>),
    Single(MetricKind, Vec<MetricSample>),
}

fn fallback_slot(kind: MetricKind) -> SlotId {
    SlotId::new(format!("metrics.{}", kind))
}

fn slot_kind(slot: &SlotId) -> Option<MetricKind> {
    MetricKind::ALL.into_iter().find(|kind| fallback_slot(*kind) == *slot)
}

// =============================================================================
// Metrics Pipeline
// =============================================================================

pub struct MetricsPipeline {
    source: Arc<dyn MetricSource>,
    interval: Duration,
    scope: Option<SelectionScope>,
    state: AggregateQueryState,
    supervisor: QuerySupervisor<MetricFetch>,
}

impl MetricsPipeline {
    pub fn new(source: Arc<dyn MetricSource>, interval: Duration) -> Self {
        Self {
            source,
            interval,
            scope: None,
            state: AggregateQueryState::new(),
            supervisor: QuerySupervisor::new(),
        }
    }

    /// Pipeline polling at the configured time-series chart interval.
    pub fn from_config(source: Arc<dyn MetricSource>, polling: &PollingConfig) -> Self {
        Self::new(source, polling.timeseries_chart())
    }

    /// Point the pipeline at `scope`. A changed scope resets every slot and
    /// restarts the combined query; the same scope again is a no-op.
    pub fn set_scope(&mut self, scope: SelectionScope) -> bool {
        if self.scope.as_ref() == Some(&scope) {
            return false;
        }

        tracing::info!(
            vcenter = ?scope.v_center_id,
            cluster = ?scope.cluster_id,
            tags = scope.tag_ids.len(),
            "Metrics scope changed"
        );

        self.state = AggregateQueryState::new();
        for kind in MetricKind::ALL {
            self.supervisor.disable(&fallback_slot(kind));
        }

        let fetcher = self.combined_fetcher(&scope);
        self.supervisor.ensure(
            SlotId::new(COMBINED_SLOT),
            scope.query_key("metrics/combined"),
            fetcher,
            self.interval,
        );
        self.scope = Some(scope);
        true
    }

    pub fn scope(&self) -> Option<&SelectionScope> {
        self.scope.as_ref()
    }

    pub fn state(&self) -> &AggregateQueryState {
        &self.state
    }

    pub fn view(&self) -> MetricsView {
        self.state.view()
    }

    /// Results discarded because their scope was superseded.
    pub fn stale_dropped(&self) -> u64 {
        self.supervisor.stale_dropped()
    }

    /// Whether the fallback task for `kind` is running.
    pub fn fallback_active(&self, kind: MetricKind) -> bool {
        self.supervisor.is_active(&fallback_slot(kind))
    }

    /// Wait for the next accepted result, apply it and return the new view.
    /// Returns `None` once the pipeline has no scope.
    pub async fn next_view(&mut self) -> Option<MetricsView> {
        self.scope.as_ref()?;
        let update = self.supervisor.next_update().await?;
        self.apply(update);
        Some(self.view())
    }

    pub async fn shutdown(&mut self) {
        self.supervisor.shutdown().await;
        self.scope = None;
        self.state = AggregateQueryState::new();
    }

    fn apply(&mut self, update: SourceUpdate<MetricFetch>) {
        if update.slot.as_str() == COMBINED_SLOT {
            let combined = match update.result {
                Ok(MetricFetch::Combined(points)) => SourceState::Ready(points),
                Ok(MetricFetch::Single(kind, _)) => {
                    tracing::warn!(slot = %update.slot, metric = %kind, "Unexpected payload");
                    return;
                }
                Err(e) => SourceState::Failed(e.to_string()),
            };
            let enabled = self.state.apply_combined(combined);
            self.sync_fallbacks(enabled);
            return;
        }

        let Some(kind) = slot_kind(&update.slot) else {
            tracing::warn!(slot = %update.slot, "Result for unknown slot");
            return;
        };

        let state = match update.result {
            Ok(MetricFetch::Single(_, samples)) => SourceState::Ready(samples),
            Ok(MetricFetch::Combined(_)) => {
                tracing::warn!(slot = %update.slot, "Unexpected payload");
                return;
            }
            Err(e) => SourceState::Failed(e.to_string()),
        };
        self.state.apply_fallback(kind, state);
    }

    fn sync_fallbacks(&mut self, enabled: bool) {
        let Some(scope) = self.scope.clone() else {
            return;
        };

        for kind in MetricKind::ALL {
            let slot = fallback_slot(kind);
            if enabled {
                let fetcher = self.single_fetcher(&scope, kind);
                let key = scope.query_key(&format!("metrics/{}", kind));
                if self.supervisor.ensure(slot, key, fetcher, self.interval) {
                    tracing::debug!(metric = %kind, "Started fallback source");
                }
            } else {
                self.supervisor.disable(&slot);
            }
        }
    }

    fn combined_fetcher(&self, scope: &SelectionScope) -> Fetcher<MetricFetch> {
        let source = Arc::clone(&self.source);
        let scope = scope.clone();
        Arc::new(move || {
            let source = Arc::clone(&source);
            let scope = scope.clone();
            async move { source.fetch_combined(&scope).await.map(MetricFetch::Combined) }.boxed()
        })
    }

    fn single_fetcher(&self, scope: &SelectionScope, kind: MetricKind) -> Fetcher<MetricFetch> {
        let source = Arc::clone(&self.source);
        let scope = scope.clone();
        Arc::new(move || {
            let source = Arc::clone(&source);
            let scope = scope.clone();
            async move {
                source
                    .fetch(kind, &scope)
                    .await
                    .map(|samples| MetricFetch::Single(kind, samples))
            }
            .boxed()
        })
    }
}
