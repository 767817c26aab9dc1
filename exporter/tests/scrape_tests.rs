//! End-to-end scrape tests for the exporter router.
//!
//! Builds the full router with the default product table and timeline set,
//! publishes records the way the poll loop does, and checks the scraped
//! exposition.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use exporter::metrics::ExporterMetrics;
use exporter::{create_router, AppState};
use http_body_util::BodyExt;
use shared::config::ProductTable;
use shared::models::{
    default_timeline_metrics, FreshnessRecord, ProductFreshness, TimelinePoint,
};
use shared::sink::MetricsSink;
use tower::ServiceExt;

fn full_metrics() -> Arc<ExporterMetrics> {
    Arc::new(
        ExporterMetrics::new(&ProductTable::default(), &default_timeline_metrics()).unwrap(),
    )
}

async fn scrape(metrics: Arc<ExporterMetrics>) -> String {
    let app = create_router(AppState::new(metrics));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(body.to_vec()).unwrap()
}

#[tokio::test]
async fn scrape_exposes_freshness_record() {
    let metrics = full_metrics();

    let mut products = BTreeMap::new();
    products.insert(
        "blobs".to_string(),
        ProductFreshness {
            latest_timestamp: 200,
            lag_seconds: 100,
        },
    );
    products.insert("features".to_string(), ProductFreshness::no_data());
    products.insert("class_scores".to_string(), ProductFreshness::no_data());
    metrics.publish(
        "santa-cruz",
        &FreshnessRecord {
            latest_bin_timestamp: 300,
            products,
            is_up_to_date: true,
        },
    );

    let text = scrape(metrics).await;

    assert!(text.contains("ifcb_latest_bin_timestamp{dataset=\"santa-cruz\"} 300"));
    assert!(text.contains("ifcb_latest_blobs_timestamp{dataset=\"santa-cruz\"} 200"));
    assert!(text.contains("ifcb_latest_blobs_lag_seconds{dataset=\"santa-cruz\"} 100"));
    assert!(text.contains("ifcb_latest_features_timestamp{dataset=\"santa-cruz\"} 0"));
    assert!(text.contains("ifcb_latest_features_lag_seconds{dataset=\"santa-cruz\"} -1"));
    assert!(text.contains("ifcb_latest_class_scores_lag_seconds{dataset=\"santa-cruz\"} -1"));
    assert!(text.contains("ifcb_is_dataset_up_to_date{dataset=\"santa-cruz\"} 1"));
}

#[tokio::test]
async fn scrape_exposes_timeline_points() {
    let metrics = full_metrics();
    metrics.publish_timeline(
        "santa-cruz",
        "ml_analyzed",
        &TimelinePoint {
            value: 4.8,
            timestamp: 1_704_110_400,
        },
    );

    let text = scrape(metrics).await;

    assert!(text.contains("ifcb_ml_analyzed_value{dataset=\"santa-cruz\"} 4.8"));
    assert!(text.contains("ifcb_ml_analyzed_timestamp{dataset=\"santa-cruz\"} 1704110400"));
}

#[tokio::test]
async fn scrape_updates_between_cycles() {
    let metrics = full_metrics();
    let table = ProductTable::default();

    metrics.publish("site", &FreshnessRecord::no_data(&table));
    let first = scrape(Arc::clone(&metrics)).await;
    assert!(first.contains("ifcb_is_dataset_up_to_date{dataset=\"site\"} 0"));

    let mut record = FreshnessRecord::no_data(&table);
    record.latest_bin_timestamp = 500;
    record.is_up_to_date = true;
    metrics.publish("site", &record);

    let second = scrape(metrics).await;
    assert!(second.contains("ifcb_latest_bin_timestamp{dataset=\"site\"} 500"));
    assert!(second.contains("ifcb_is_dataset_up_to_date{dataset=\"site\"} 1"));
}
