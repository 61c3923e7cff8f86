//! Offer API handlers.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error_handling::ApiError;
use crate::producer::{Message, MessageType};

use super::types::*;
use super::validation::*;
use super::ApiState;

async fn publish(state: &ApiState, kind: MessageType, id: u64) {
    if let Err(e) = state.producer.send(Message::now(kind, id)).await {
        log::error!("Failed to queue {} event for offer {}: {}", kind, id, e);
    }
}

pub async fn create_offer(
    State(state): State<ApiState>,
    payload: Result<Json<OfferInput>, JsonRejection>,
) -> Result<Json<CreateOfferResponse>, ApiError> {
    let Json(input) = payload?;
    validate_offer_input(&input)?;

    let id = state.repo.create_offer(&input.into_offer(0)).await?;
    publish(&state, MessageType::Created, id).await;
    state.metrics.record_created(1);

    log::debug!("create_offer: created offer {}", id);
    Ok(Json(CreateOfferResponse { id }))
}

pub async fn multi_create_offer(
    State(state): State<ApiState>,
    payload: Result<Json<MultiCreateRequest>, JsonRejection>,
) -> Result<Json<MultiCreateResponse>, ApiError> {
    let Json(request) = payload?;
    validate_offer_batch(&request.offers)?;

    let offers: Vec<_> = request
        .offers
        .into_iter()
        .map(|input| input.into_offer(0))
        .collect();
    let count = state.repo.multi_create_offer(&offers).await?;
    state.metrics.record_created(offers.len());

    log::debug!("multi_create_offer: created {} offers", count);
    Ok(Json(MultiCreateResponse { count }))
}

/// Hands offers to the saver instead of writing them directly.
///
/// Offers are saved in order and the first rejection is returned; offers
/// accepted before it stay buffered and will still be persisted.
pub async fn buffered_create_offer(
    State(state): State<ApiState>,
    payload: Result<Json<MultiCreateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BufferedResponse>), ApiError> {
    let Json(request) = payload?;
    validate_offer_batch(&request.offers)?;

    let total = request.offers.len();
    for (accepted, input) in request.offers.into_iter().enumerate() {
        if let Err(e) = state.saver.save(input.into_offer(0)).await {
            log::warn!(
                "buffered_create_offer: {} of {} offers buffered before rejection",
                accepted,
                total
            );
            return Err(e.into());
        }
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(BufferedResponse { accepted: total }),
    ))
}

pub async fn describe_offer(
    State(state): State<ApiState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<DescribeOfferResponse>, ApiError> {
    let Path(id) = id?;
    let offer = state.repo.describe_offer(validate_offer_id(id)?).await?;
    Ok(Json(DescribeOfferResponse {
        offer: offer.into(),
    }))
}

pub async fn list_offers(
    State(state): State<ApiState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ListOffersResponse>, ApiError> {
    let Query(query) = query?;
    let pagination = validate_pagination(&query)?;

    let (offers, pagination) = state.repo.list_offers(pagination).await?;
    Ok(Json(ListOffersResponse {
        offers: offers.into_iter().map(OfferView::from).collect(),
        pagination,
    }))
}

pub async fn update_offer(
    State(state): State<ApiState>,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<OfferInput>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    let Json(input) = payload?;
    let id = validate_offer_id(id)?;
    validate_offer_input(&input)?;

    state.repo.update_offer(&input.into_offer(id)).await?;
    publish(&state, MessageType::Updated, id).await;
    state.metrics.record_updated();

    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove_offer(
    State(state): State<ApiState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    let id = validate_offer_id(id)?;

    state.repo.remove_offer(id).await?;
    publish(&state, MessageType::Removed, id).await;
    state.metrics.record_removed();

    Ok(StatusCode::NO_CONTENT)
}
