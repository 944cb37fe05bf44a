// src/main.rs
use std::sync::Arc;

use tokio::signal::ctrl_c;

use vendora::adapter::http::{router, AppState};
use vendora::application::usecase::{
    CartService, CatalogService, CheckoutService, OrderService, RatingService, ReviewService,
};
use vendora::config::Config;
use vendora::domain::errors::{MarketError, MarketResult};
use vendora::infrastructure::memory::{
    MemoryCartRepository, MemoryOrderRepository, MemoryProductRepository, MemoryReviewRepository,
};

#[tokio::main]
async fn main() -> MarketResult<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    config.init_logging();

    log::info!("Starting vendora v{}", env!("CARGO_PKG_VERSION"));

    // Backing stores
    let products = Arc::new(MemoryProductRepository::new());
    let orders = Arc::new(MemoryOrderRepository::new());
    let carts = Arc::new(MemoryCartRepository::new());
    let reviews = Arc::new(MemoryReviewRepository::new());

    // Use cases
    let rating = Arc::new(RatingService::new(reviews.clone(), products.clone()));
    let state = AppState {
        checkout: Arc::new(CheckoutService::new(
            products.clone(),
            orders.clone(),
            carts.clone(),
        )),
        orders: Arc::new(OrderService::new(orders.clone(), products.clone())),
        reviews: Arc::new(ReviewService::new(
            reviews.clone(),
            products.clone(),
            rating,
        )),
        cart: Arc::new(CartService::new(carts, products.clone())),
        catalog: Arc::new(CatalogService::new(products)),
    };

    let app = router(state);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MarketError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

    log::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = ctrl_c().await;
            log::info!("Shutting down...");
        })
        .await
        .map_err(|e| MarketError::Internal(format!("Server error: {}", e)))?;

    log::info!("Shutdown complete. Goodbye!");
    Ok(())
}
