// src/adapter/http/mod.rs
// HTTP adapter: shared state and routing

pub mod error;
pub mod extract;
pub mod handlers;

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;

use crate::application::usecase::{
    CartService, CatalogService, CheckoutService, OrderService, ReviewService,
};

/// Wired use cases shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub checkout: Arc<CheckoutService>,
    pub orders: Arc<OrderService>,
    pub reviews: Arc<ReviewService>,
    pub cart: Arc<CartService>,
    pub catalog: Arc<CatalogService>,
}

/// Build the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/orders",
            post(handlers::orders::place_order).get(handlers::orders::my_orders),
        )
        .route("/orders/vendor", get(handlers::orders::vendor_orders))
        .route("/orders/:id", get(handlers::orders::get_order))
        .route("/orders/:id/status", put(handlers::orders::update_status))
        .route(
            "/orders/:id/reverse-stock",
            post(handlers::orders::reverse_stock),
        )
        .route(
            "/products",
            get(handlers::products::list).post(handlers::products::create),
        )
        .route(
            "/products/:id",
            get(handlers::products::get)
                .put(handlers::products::update)
                .delete(handlers::products::deactivate),
        )
        .route(
            "/products/:id/reviews",
            get(handlers::reviews::list_for_product),
        )
        .route("/reviews", post(handlers::reviews::create))
        .route(
            "/reviews/:id",
            put(handlers::reviews::update).delete(handlers::reviews::remove),
        )
        .route(
            "/cart",
            get(handlers::cart::get).delete(handlers::cart::clear),
        )
        .route("/cart/items", post(handlers::cart::add_item))
        .route(
            "/cart/items/:productId",
            put(handlers::cart::update_item).delete(handlers::cart::remove_item),
        )
        .with_state(state)
}
