// src/adapter/http/handlers/cart.rs
// Cart endpoints

use axum::extract::{Path, State};
use axum::Json;

use crate::adapter::http::error::ApiError;
use crate::adapter::http::AppState;
use crate::application::dto::{AddCartItemRequest, UpdateCartItemRequest};
use crate::domain::model::{Actor, Cart, ProductId};

/// `GET /cart` — lazily creates the empty cart.
pub async fn get(State(state): State<AppState>, actor: Actor) -> Result<Json<Cart>, ApiError> {
    Ok(Json(state.cart.get(actor).await?))
}

/// `POST /cart/items` — merges quantity for an already-present product.
pub async fn add_item(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<AddCartItemRequest>,
) -> Result<Json<Cart>, ApiError> {
    Ok(Json(state.cart.add_item(actor, request).await?))
}

/// `PUT /cart/items/:productId`
pub async fn update_item(
    State(state): State<AppState>,
    actor: Actor,
    Path(product_id): Path<ProductId>,
    Json(request): Json<UpdateCartItemRequest>,
) -> Result<Json<Cart>, ApiError> {
    Ok(Json(
        state
            .cart
            .update_item(actor, product_id, request.quantity)
            .await?,
    ))
}

/// `DELETE /cart/items/:productId`
pub async fn remove_item(
    State(state): State<AppState>,
    actor: Actor,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Cart>, ApiError> {
    Ok(Json(state.cart.remove_item(actor, product_id).await?))
}

/// `DELETE /cart`
pub async fn clear(State(state): State<AppState>, actor: Actor) -> Result<Json<Cart>, ApiError> {
    Ok(Json(state.cart.clear(actor).await?))
}
