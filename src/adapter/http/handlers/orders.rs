// src/adapter/http/handlers/orders.rs
// Order endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::adapter::http::error::ApiError;
use crate::adapter::http::AppState;
use crate::application::dto::{PlaceOrderRequest, UpdateStatusRequest};
use crate::domain::model::{Actor, Order, OrderId};

/// `POST /orders` — run the checkout; 201 with one order per vendor.
pub async fn place_order(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<Vec<Order>>), ApiError> {
    let orders = state.checkout.place_order(actor, request).await?;
    Ok((StatusCode::CREATED, Json(orders)))
}

/// `GET /orders` — the calling customer's orders, newest first.
pub async fn my_orders(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(state.orders.my_orders(actor).await?))
}

/// `GET /orders/vendor` — the calling vendor's incoming orders.
pub async fn vendor_orders(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(state.orders.vendor_orders(actor).await?))
}

/// `GET /orders/:id` — 403 unless customer, vendor, or admin.
pub async fn get_order(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>, ApiError> {
    Ok(Json(state.orders.get_order(actor, id).await?))
}

/// `PUT /orders/:id/status` — walk the status machine.
pub async fn update_status(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<OrderId>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Order>, ApiError> {
    Ok(Json(
        state
            .orders
            .update_status(actor, id, &request.status)
            .await?,
    ))
}

/// `POST /orders/:id/reverse-stock` — idempotent cancellation reversal.
pub async fn reverse_stock(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>, ApiError> {
    Ok(Json(state.orders.reverse_stock(actor, id).await?))
}
