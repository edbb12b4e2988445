//! Vantage Streaming - Polling Sources and View Pipelines
//!
//! Runs every dashboard data source as its own cancellable polling task and
//! funnels results through a channel into the pure selection, aggregation and
//! loading logic.
//!
//! Key Features:
//! - Async source traits for metrics, selection options and the directory
//! - One task per result slot, restarted only when its query key changes
//! - Last-key-wins delivery: results for superseded keys are discarded
//! - Metrics pipeline with fallback sources driven by the combined result
//! - Selection pipeline turning reducer effects into cluster queries
//!
//! @version 0.1.0
//! @author Vantage Development Team

pub mod source;
pub mod task;
pub mod supervisor;
pub mod metrics;
pub mod selection;
pub mod mock;

pub use source::{DirectorySource, FetchError, MetricSource, SelectionSource};
pub use task::{FetchFuture, Fetcher, SourceTask, SourceUpdate, MIN_POLL_INTERVAL};
pub use supervisor::QuerySupervisor;
pub use metrics::{MetricFetch, MetricsPipeline};
pub use selection::{SelectionFetch, SelectionPipeline};
pub use mock::{StaticDirectorySource, StaticMetricSource, StaticSelectionSource};
