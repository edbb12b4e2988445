//! Vantage Time Series - Resource Usage Aggregation
//!
//! Turns one combined usage query and three per-metric fallback queries into
//! a single ordered series for the usage charts, and derives the loading and
//! empty states the charts render.
//!
//! Key Features:
//! - Combined source short-circuit: a non-empty combined result wins
//! - Timestamp-keyed merge of cpu, memory and storage fallbacks
//! - Explicit fallback enablement predicate
//! - Progressive loading state across independent sources
//! - Latest / average / peak usage summaries
//!
//! @version 0.1.0
//! @author Vantage Development Team

pub mod types;
pub mod aggregation;
pub mod merge;
pub mod state;
pub mod loading;
pub mod view;

pub use types::{MetricKind, MetricSample, MetricSeriesPoint};
pub use aggregation::{Aggregator, UsageSummary};
pub use merge::{FallbackSeries, TimeSeriesAggregator};
pub use state::{fallback_enabled, AggregateQueryState, SourceState, SourceStatus};
pub use loading::{LoadingState, LoadingStateResolver};
pub use view::{MetricsSummary, MetricsView};
