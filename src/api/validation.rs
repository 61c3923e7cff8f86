//! Request validation.
//!
//! Each check returns `ApiError::Validation` naming the offending field.

use crate::config::{MAX_MULTI_CREATE, MAX_PAGE_SIZE};
use crate::error_handling::ApiError;
use crate::models::PaginationInput;

use super::types::{ListQuery, OfferInput};

pub fn validate_offer_id(id: u64) -> Result<u64, ApiError> {
    if id == 0 {
        return Err(ApiError::Validation(
            "offer id must be greater than zero".into(),
        ));
    }
    Ok(id)
}

pub fn validate_offer_input(input: &OfferInput) -> Result<(), ApiError> {
    if input.user_id == 0 {
        return Err(ApiError::Validation(
            "user_id must be greater than zero".into(),
        ));
    }
    if input.team_id == 0 {
        return Err(ApiError::Validation(
            "team_id must be greater than zero".into(),
        ));
    }
    Ok(())
}

pub fn validate_offer_batch(inputs: &[OfferInput]) -> Result<(), ApiError> {
    if inputs.is_empty() {
        return Err(ApiError::Validation("offers must not be empty".into()));
    }
    if inputs.len() > MAX_MULTI_CREATE {
        return Err(ApiError::Validation(format!(
            "at most {} offers can be created at once, got {}",
            MAX_MULTI_CREATE,
            inputs.len()
        )));
    }
    for (i, input) in inputs.iter().enumerate() {
        validate_offer_input(input)
            .map_err(|e| ApiError::Validation(format!("offers[{}]: {}", i, e)))?;
    }
    Ok(())
}

pub fn validate_pagination(query: &ListQuery) -> Result<PaginationInput, ApiError> {
    match query.take {
        Some(take) if (1..=MAX_PAGE_SIZE).contains(&take) => Ok(PaginationInput {
            take,
            skip: query.skip.unwrap_or(0),
        }),
        _ => Err(ApiError::Validation(format!(
            "take must be between 1 and {}",
            MAX_PAGE_SIZE
        ))),
    }
}
