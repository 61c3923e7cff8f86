//! Mapping of API errors to HTTP responses.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error_handling::{ApiError, DatabaseError, SaverError};

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// HTTP status for an API error.
pub fn status_code(error: &ApiError) -> StatusCode {
    match error {
        ApiError::Validation(_) => StatusCode::BAD_REQUEST,
        ApiError::Database(DatabaseError::OfferNotFound(_)) => StatusCode::NOT_FOUND,
        ApiError::Database(DatabaseError::ZeroPageSize | DatabaseError::ValueOutOfRange(_)) => {
            StatusCode::BAD_REQUEST
        }
        ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        ApiError::Saver(SaverError::MaximumCapacityReached { .. }) => {
            StatusCode::TOO_MANY_REQUESTS
        }
        ApiError::Saver(SaverError::Closed | SaverError::NotInitialized) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        ApiError::Saver(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_code(&self);
        if status.is_server_error() {
            log::error!("Request failed: {}", self);
        } else {
            log::debug!("Request rejected: {}", self);
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (
                ApiError::Database(DatabaseError::OfferNotFound(1)),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::Database(DatabaseError::ValueOutOfRange(u64::MAX)),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Database(DatabaseError::FileCreationError("disk".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::Saver(SaverError::MaximumCapacityReached { capacity: 2 }),
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (
                ApiError::Saver(SaverError::Closed),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(status_code(&error), expected, "{error}");
        }
    }
}
