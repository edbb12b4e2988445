//! Metrics pipeline tests against the static metric source.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use vantage_selection::SelectionScope;
use vantage_streaming::{MetricsPipeline, StaticMetricSource};
use vantage_timeseries::{MetricKind, MetricSample, MetricSeriesPoint, MetricsView, SourceStatus};

const HOUR: Duration = Duration::from_secs(3600);

async fn view_until(pipeline: &mut MetricsPipeline, done: impl Fn(&MetricsView) -> bool) -> MetricsView {
    timeout(Duration::from_secs(5), async {
        loop {
            let view = pipeline.next_view().await.expect("pipeline has a scope");
            if done(&view) {
                return view;
            }
        }
    })
    .await
    .expect("view did not settle in time")
}

fn fallback_source() -> StaticMetricSource {
    StaticMetricSource::new()
        .with_series(MetricKind::Cpu, vec![MetricSample::new(1000, 50.0)])
        .with_series(MetricKind::Memory, vec![MetricSample::new(1000, 60.0)])
        .with_series(MetricKind::Storage, vec![MetricSample::new(2000, 70.0)])
}

fn scope() -> SelectionScope {
    SelectionScope::new().with_vcenter("vc-1").with_cluster("cl-1")
}

#[tokio::test]
async fn test_combined_result_wins() {
    let combined = vec![
        MetricSeriesPoint::at(100).with(MetricKind::Cpu, 10.0),
        MetricSeriesPoint::at(160).with(MetricKind::Cpu, 12.0),
    ];
    let source = Arc::new(fallback_source().with_combined(combined.clone()));
    let mut pipeline = MetricsPipeline::new(source.clone(), HOUR);

    assert!(pipeline.set_scope(scope()));
    assert!(pipeline.view().loading.is_loading);

    let view = view_until(&mut pipeline, |v| v.loading.loading_complete).await;
    assert_eq!(view.points, combined);
    assert!(!view.loading.is_empty);
    for kind in MetricKind::ALL {
        assert!(!pipeline.fallback_active(kind));
    }
    assert_eq!(source.calls("cpu"), 0);
    pipeline.shutdown().await;
}

#[tokio::test]
async fn test_empty_combined_merges_fallbacks() {
    let source = Arc::new(fallback_source());
    let mut pipeline = MetricsPipeline::new(source, HOUR);
    pipeline.set_scope(scope());

    let first = view_until(&mut pipeline, |_| true).await;
    assert!(first.points.is_empty());
    assert!(first.loading.is_loading);
    assert!(pipeline.fallback_active(MetricKind::Cpu));

    let view = view_until(&mut pipeline, |v| v.loading.loading_complete).await;
    assert_eq!(
        view.points,
        vec![
            MetricSeriesPoint::at(1000)
                .with(MetricKind::Cpu, 50.0)
                .with(MetricKind::Memory, 60.0),
            MetricSeriesPoint::at(2000).with(MetricKind::Storage, 70.0),
        ]
    );
    assert_eq!(view.summary.storage.map(|s| s.latest), Some(70.0));
    pipeline.shutdown().await;
}

#[tokio::test]
async fn test_failed_combined_enables_fallbacks() {
    let source = Arc::new(fallback_source());
    source.set_failing("combined", true);
    let mut pipeline = MetricsPipeline::new(source, HOUR);
    pipeline.set_scope(scope());

    let view = view_until(&mut pipeline, |v| v.loading.loading_complete).await;
    assert_eq!(pipeline.state().combined.status(), SourceStatus::Error);
    assert_eq!(view.points.len(), 2);
    pipeline.shutdown().await;
}

#[tokio::test]
async fn test_partial_data_ends_loading() {
    let source = Arc::new(fallback_source());
    source.set_delay("memory", Some(HOUR));
    source.set_delay("storage", Some(HOUR));
    let mut pipeline = MetricsPipeline::new(source, HOUR);
    pipeline.set_scope(scope());

    let view = view_until(&mut pipeline, |v| !v.points.is_empty()).await;
    assert!(!view.loading.is_loading);
    assert!(!view.loading.loading_complete);
    assert_eq!(view.points, vec![MetricSeriesPoint::at(1000).with(MetricKind::Cpu, 50.0)]);
    pipeline.shutdown().await;
}

#[tokio::test]
async fn test_combined_recovery_stops_fallbacks() {
    let source = Arc::new(fallback_source());
    let mut pipeline = MetricsPipeline::new(source.clone(), Duration::from_millis(20));
    pipeline.set_scope(scope());

    view_until(&mut pipeline, |v| v.loading.loading_complete && !v.points.is_empty()).await;
    assert!(pipeline.fallback_active(MetricKind::Memory));

    let combined = vec![MetricSeriesPoint::at(3000).with(MetricKind::Memory, 5.0)];
    source.set_combined(combined.clone());

    let view = view_until(&mut pipeline, |v| v.points == combined).await;
    assert!(view.loading.loading_complete);
    for kind in MetricKind::ALL {
        assert!(!pipeline.fallback_active(kind));
        assert_eq!(pipeline.state().fallback(kind).status(), SourceStatus::Idle);
    }
    pipeline.shutdown().await;
}

#[tokio::test]
async fn test_everything_failing_is_empty() {
    let source = Arc::new(StaticMetricSource::new());
    for operation in ["combined", "cpu", "memory", "storage"] {
        source.set_failing(operation, true);
    }
    let mut pipeline = MetricsPipeline::new(source, HOUR);
    pipeline.set_scope(scope());

    let view = view_until(&mut pipeline, |v| v.loading.loading_complete).await;
    assert!(view.loading.is_empty);
    assert!(!view.loading.is_loading);
    assert!(view.points.is_empty());
    pipeline.shutdown().await;
}

#[tokio::test]
async fn test_scope_change_resets_state() {
    let combined = vec![MetricSeriesPoint::at(100).with(MetricKind::Cpu, 1.0)];
    let source = Arc::new(StaticMetricSource::new().with_combined(combined.clone()));
    let mut pipeline = MetricsPipeline::new(source, HOUR);

    pipeline.set_scope(scope());
    assert!(!pipeline.set_scope(scope()));
    view_until(&mut pipeline, |v| v.loading.loading_complete).await;

    let other = scope().with_tag("gold");
    assert!(pipeline.set_scope(other.clone()));
    assert_eq!(pipeline.scope(), Some(&other));
    assert!(pipeline.view().points.is_empty());
    assert!(pipeline.view().loading.is_loading);

    let view = view_until(&mut pipeline, |v| v.loading.loading_complete).await;
    assert_eq!(view.points, combined);
    pipeline.shutdown().await;
}

#[tokio::test]
async fn test_queued_result_for_previous_scope_is_discarded() {
    let old_points = vec![MetricSeriesPoint::at(100).with(MetricKind::Cpu, 1.0)];
    let new_points = vec![MetricSeriesPoint::at(200).with(MetricKind::Cpu, 2.0)];
    let source = Arc::new(StaticMetricSource::new().with_combined(old_points));
    source.set_delay("combined", Some(Duration::from_millis(50)));
    let mut pipeline = MetricsPipeline::new(source.clone(), HOUR);

    pipeline.set_scope(scope());
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(source.calls("combined"), 1);

    source.set_delay("combined", None);
    source.set_combined(new_points.clone());
    assert!(pipeline.set_scope(scope().with_tag("gold")));

    let view = view_until(&mut pipeline, |v| v.loading.loading_complete).await;
    assert_eq!(view.points, new_points);
    assert!(pipeline.stale_dropped() >= 1);
    pipeline.shutdown().await;
}

#[tokio::test]
async fn test_in_flight_fetch_for_previous_scope_never_lands() {
    let old_points = vec![MetricSeriesPoint::at(100).with(MetricKind::Cpu, 1.0)];
    let new_points = vec![MetricSeriesPoint::at(200).with(MetricKind::Cpu, 2.0)];
    let source = Arc::new(StaticMetricSource::new().with_combined(old_points));
    source.set_delay("combined", Some(Duration::from_millis(300)));
    let mut pipeline = MetricsPipeline::new(source.clone(), HOUR);

    pipeline.set_scope(scope());
    tokio::time::sleep(Duration::from_millis(20)).await;

    source.set_delay("combined", None);
    source.set_combined(new_points.clone());
    pipeline.set_scope(scope().with_tag("gold"));

    let view = view_until(&mut pipeline, |v| v.loading.loading_complete).await;
    assert_eq!(view.points, new_points);

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(timeout(Duration::from_millis(50), pipeline.next_view()).await.is_err());
    assert_eq!(pipeline.stale_dropped(), 0);
    assert_eq!(pipeline.view().points, new_points);
    pipeline.shutdown().await;
}

#[tokio::test]
async fn test_tag_ids_containing_commas_are_a_new_scope() {
    let combined = vec![MetricSeriesPoint::at(100).with(MetricKind::Cpu, 1.0)];
    let source = Arc::new(StaticMetricSource::new().with_combined(combined.clone()));
    let mut pipeline = MetricsPipeline::new(source.clone(), HOUR);

    pipeline.set_scope(scope().with_tag("a").with_tag("b"));
    view_until(&mut pipeline, |v| v.loading.loading_complete).await;
    assert_eq!(source.calls("combined"), 1);

    assert!(pipeline.set_scope(scope().with_tag("a,b")));
    let view = view_until(&mut pipeline, |v| v.loading.loading_complete).await;
    assert_eq!(view.points, combined);
    assert_eq!(source.calls("combined"), 2);
    pipeline.shutdown().await;
}

#[tokio::test]
async fn test_zero_interval_pipeline_still_delivers() {
    let combined = vec![MetricSeriesPoint::at(100).with(MetricKind::Cpu, 1.0)];
    let source = Arc::new(StaticMetricSource::new().with_combined(combined.clone()));
    let mut pipeline = MetricsPipeline::new(source, Duration::ZERO);
    pipeline.set_scope(scope());

    let view = view_until(&mut pipeline, |v| v.loading.loading_complete).await;
    assert_eq!(view.points, combined);
    pipeline.shutdown().await;
}

#[tokio::test]
async fn test_no_scope_yields_nothing() {
    let mut pipeline = MetricsPipeline::new(Arc::new(StaticMetricSource::new()), HOUR);
    assert!(pipeline.next_view().await.is_none());
}
