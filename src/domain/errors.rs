// src/domain/errors.rs
use thiserror::Error;

/// Failure taxonomy shared by every layer. The HTTP adapter maps each
/// variant onto a status code; see `adapter::http::error`.
#[derive(Error, Debug)]
pub enum MarketError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    #[error("Not authorized: {0}")]
    Authorization(String),

    #[error("Missing or invalid identity")]
    Unauthenticated,

    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        requested: u32,
        available: u32,
    },

    #[error("Stock changed concurrently for product {product_id}; order was rolled back, retry is safe")]
    StockConflict { product_id: String },

    #[error("Product {product_id} already reviewed by this customer")]
    DuplicateReview { product_id: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MarketError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        MarketError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        MarketError::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        MarketError::Authorization(msg.into())
    }
}

// Result type alias for convenience
pub type MarketResult<T> = Result<T, MarketError>;
