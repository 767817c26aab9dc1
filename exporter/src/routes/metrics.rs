//! Metrics exposition endpoint.
//!
//! Renders the gauge registry in Prometheus text format for scraping.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{routing::get, Router};

use crate::state::AppState;

/// Creates the metrics exposition routes.
pub fn metrics_routes() -> Router<AppState> {
    Router::new().route("/metrics", get(render_metrics))
}

/// Handler for GET /metrics.
async fn render_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match state.metrics().render() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {e}"),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::ExporterMetrics;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use shared::config::ProductTable;
    use shared::models::FreshnessRecord;
    use shared::sink::MetricsSink;
    use std::sync::Arc;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_metrics_endpoint_renders_published_gauges() {
        let metrics = Arc::new(ExporterMetrics::new(&ProductTable::default(), &[]).unwrap());
        metrics.publish("ds", &FreshnessRecord::no_data(&ProductTable::default()));
        let app = metrics_routes().with_state(AppState::new(Arc::clone(&metrics)));

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

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();
        assert!(content_type.starts_with("text/plain"));

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("ifcb_latest_bin_timestamp{dataset=\"ds\"} 0"));
    }
}
