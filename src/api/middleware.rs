//! Request accounting for the offer API.

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::metrics::ServiceMetrics;

/// Counts every routed request and logs its method, path, status and latency.
pub async fn track_requests(
    State(metrics): State<Arc<ServiceMetrics>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    metrics.record_request();

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    log::info!(
        "{} {} -> {} in {:?}",
        method,
        path,
        response.status().as_u16(),
        start.elapsed()
    );
    response
}
