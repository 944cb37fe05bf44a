// src/adapter/http/handlers/reviews.rs
// Review endpoints; every mutation recomputes the product rating before
// the response is sent

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::adapter::http::error::ApiError;
use crate::adapter::http::AppState;
use crate::application::dto::{CreateReviewRequest, UpdateReviewRequest};
use crate::domain::model::{Actor, ProductId, Review, ReviewId};

/// `GET /products/:id/reviews` — public, newest first.
pub async fn list_for_product(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Vec<Review>>, ApiError> {
    Ok(Json(state.reviews.list_for_product(product_id).await?))
}

/// `POST /reviews`
pub async fn create(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    let review = state.reviews.create(actor, request).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// `PUT /reviews/:id`
pub async fn update(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<ReviewId>,
    Json(request): Json<UpdateReviewRequest>,
) -> Result<Json<Review>, ApiError> {
    Ok(Json(state.reviews.update(actor, id, request).await?))
}

/// `DELETE /reviews/:id`
pub async fn remove(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<ReviewId>,
) -> Result<StatusCode, ApiError> {
    state.reviews.delete(actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
