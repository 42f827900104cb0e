//! Prometheus scrape endpoint.
//!
//! Exposes the counters the other handlers record
//! (`products_created_total`, `orders_created_total`,
//! `payments_recorded_total`, `shipments_recorded_total`) plus the
//! exporter's own series.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::PrometheusHandle;

/// GET /metrics — renders the current metric registry in the
/// Prometheus text exposition format.
pub async fn render(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        handle.render(),
    )
}
