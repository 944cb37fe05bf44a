// src/adapter/http/error.rs
// Maps the domain failure taxonomy onto HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::errors::MarketError;

/// Wrapper giving `MarketError` an `IntoResponse` impl without leaking
/// axum types into the domain layer.
#[derive(Debug)]
pub struct ApiError(pub MarketError);

impl From<MarketError> for ApiError {
    fn from(err: MarketError) -> Self {
        ApiError(err)
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            MarketError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            MarketError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            MarketError::Authorization(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            MarketError::Unauthenticated => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            MarketError::InsufficientStock { .. } => {
                (StatusCode::BAD_REQUEST, "INSUFFICIENT_STOCK")
            }
            // Safe to retry; the failing checkout rolled its writes back.
            MarketError::StockConflict { .. } => (StatusCode::CONFLICT, "STOCK_CONFLICT"),
            MarketError::DuplicateReview { .. } => (StatusCode::CONFLICT, "DUPLICATE_REVIEW"),
            MarketError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if status.is_server_error() {
            log::error!("internal error serving request: {}", self.0);
        }

        let body = ErrorBody {
            code,
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_conflict_maps_to_409() {
        let err = ApiError(MarketError::StockConflict {
            product_id: "p1".to_string(),
        });
        assert_eq!(err.status_and_code().0, StatusCode::CONFLICT);
    }

    #[test]
    fn insufficient_stock_maps_to_400() {
        let err = ApiError(MarketError::InsufficientStock {
            product_id: "p1".to_string(),
            requested: 3,
            available: 2,
        });
        assert_eq!(err.status_and_code().0, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn duplicate_review_maps_to_409() {
        let err = ApiError(MarketError::DuplicateReview {
            product_id: "p1".to_string(),
        });
        assert_eq!(err.status_and_code().0, StatusCode::CONFLICT);
    }
}
