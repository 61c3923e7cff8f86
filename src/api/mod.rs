//! HTTP/JSON offer API.
//!
//! | Method | Path | |
//! |---|---|---|
//! | POST | `/v1/offers` | create one offer |
//! | POST | `/v1/offers/batch` | create many offers in one transaction |
//! | POST | `/v1/offers/buffered` | hand offers to the batch pipeline |
//! | GET | `/v1/offers/:id` | describe an offer |
//! | GET | `/v1/offers?take=&skip=` | list offers |
//! | PUT | `/v1/offers/:id` | update an offer |
//! | DELETE | `/v1/offers/:id` | soft-remove an offer |
//!
//! Every routed request is counted and logged with its latency.

mod error;
mod handlers;
mod middleware;
mod types;
mod validation;

use std::sync::Arc;

use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::metrics::ServiceMetrics;
use crate::producer::EventProducer;
use crate::storage::batch::Saver;
use crate::storage::OfferRepository;

pub use error::ErrorBody;
pub use types::{OfferInput, OfferView};

/// Shared state of the API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub repo: Arc<dyn OfferRepository>,
    pub saver: Arc<Saver>,
    pub producer: Arc<EventProducer>,
    pub metrics: Arc<ServiceMetrics>,
}

pub fn api_router(state: ApiState) -> Router {
    let metrics = Arc::clone(&state.metrics);

    Router::new()
        .route(
            "/v1/offers",
            post(handlers::create_offer).get(handlers::list_offers),
        )
        .route("/v1/offers/batch", post(handlers::multi_create_offer))
        .route("/v1/offers/buffered", post(handlers::buffered_create_offer))
        .route(
            "/v1/offers/:id",
            get(handlers::describe_offer)
                .put(handlers::update_offer)
                .delete(handlers::remove_offer),
        )
        .layer(from_fn_with_state(metrics, middleware::track_requests))
        .with_state(state)
}

/// Serves the offer API on `listener` until `shutdown` is cancelled.
///
/// In-flight requests are allowed to finish after cancellation.
pub async fn start_api_server(
    listener: TcpListener,
    state: ApiState,
    shutdown: CancellationToken,
) -> Result<(), anyhow::Error> {
    if let Ok(addr) = listener.local_addr() {
        log::info!("Offer API listening on http://{}/v1/offers", addr);
    }

    axum::serve(listener, api_router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| anyhow::anyhow!("Offer API server error: {}", e))?;

    log::debug!("Offer API server stopped");
    Ok(())
}
