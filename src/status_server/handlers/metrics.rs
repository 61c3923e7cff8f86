//! Prometheus metrics handler.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use super::super::types::StatusState;

/// Prometheus-compatible metrics endpoint
pub async fn metrics_handler(State(state): State<StatusState>) -> Response {
    let metrics = &state.metrics;

    let body = format!(
        r#"# HELP offer_api_requests_total Requests routed to the offer API
# TYPE offer_api_requests_total counter
offer_api_requests_total {}

# HELP offer_api_offers_created_total Offers created through the API
# TYPE offer_api_offers_created_total counter
offer_api_offers_created_total {}

# HELP offer_api_offers_updated_total Offers updated through the API
# TYPE offer_api_offers_updated_total counter
offer_api_offers_updated_total {}

# HELP offer_api_offers_removed_total Offers removed through the API
# TYPE offer_api_offers_removed_total counter
offer_api_offers_removed_total {}

# HELP offer_api_flushed_offers_total Offers persisted by the batch pipeline
# TYPE offer_api_flushed_offers_total counter
offer_api_flushed_offers_total {}

# HELP offer_api_flush_failures_total Flushes that left offers buffered
# TYPE offer_api_flush_failures_total counter
offer_api_flush_failures_total {}

# HELP offer_api_retained_offers Offers left buffered by the last flush
# TYPE offer_api_retained_offers gauge
offer_api_retained_offers {}

# HELP offer_api_saver_buffered_offers Offers currently buffered by the saver
# TYPE offer_api_saver_buffered_offers gauge
offer_api_saver_buffered_offers {}

# HELP offer_api_uptime_seconds Seconds since the service started
# TYPE offer_api_uptime_seconds gauge
offer_api_uptime_seconds {:.3}
"#,
        metrics.requests(),
        metrics.created(),
        metrics.updated(),
        metrics.removed(),
        metrics.flushed_offers(),
        metrics.flush_failures(),
        metrics.retained_offers(),
        state.saver.buffered_len(),
        state.start_time.elapsed().as_secs_f64(),
    );

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response()
}
