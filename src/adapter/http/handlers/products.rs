// src/adapter/http/handlers/products.rs
// Catalog endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::adapter::http::error::ApiError;
use crate::adapter::http::AppState;
use crate::application::dto::{CreateProductRequest, UpdateProductRequest};
use crate::domain::model::{Actor, Product, ProductId};

/// `GET /products` — active products, newest first.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.catalog.list_active().await?))
}

/// `GET /products/:id`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.catalog.get(id).await?))
}

/// `POST /products` — the caller becomes the owning vendor.
pub async fn create(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = state.catalog.create(actor, request).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /products/:id` — owning vendor or admin.
pub async fn update(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<ProductId>,
    Json(request): Json<UpdateProductRequest>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.catalog.update(actor, id, request).await?))
}

/// `DELETE /products/:id` — soft delete.
pub async fn deactivate(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.catalog.deactivate(actor, id).await?))
}
