// tests/common/mod.rs
// Shared wiring for integration tests: every test runs against the real
// use cases over fresh in-memory stores.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use vendora::adapter::http::AppState;
use vendora::application::usecase::{
    CartService, CatalogService, CheckoutService, OrderService, RatingService, ReviewService,
};
use vendora::domain::model::{Product, UserId};
use vendora::domain::repository::ProductRepository;
use vendora::infrastructure::memory::{
    MemoryCartRepository, MemoryOrderRepository, MemoryProductRepository, MemoryReviewRepository,
};

pub struct TestApp {
    pub products: Arc<MemoryProductRepository>,
    pub order_store: Arc<MemoryOrderRepository>,
    pub cart_store: Arc<MemoryCartRepository>,
    pub review_store: Arc<MemoryReviewRepository>,
    pub checkout: Arc<CheckoutService>,
    pub orders: Arc<OrderService>,
    pub reviews: Arc<ReviewService>,
    pub cart: Arc<CartService>,
    pub catalog: Arc<CatalogService>,
}

pub fn test_app() -> TestApp {
    let products = Arc::new(MemoryProductRepository::new());
    let order_store = Arc::new(MemoryOrderRepository::new());
    let cart_store = Arc::new(MemoryCartRepository::new());
    let review_store = Arc::new(MemoryReviewRepository::new());

    let rating = Arc::new(RatingService::new(review_store.clone(), products.clone()));

    TestApp {
        checkout: Arc::new(CheckoutService::new(
            products.clone(),
            order_store.clone(),
            cart_store.clone(),
        )),
        orders: Arc::new(OrderService::new(order_store.clone(), products.clone())),
        reviews: Arc::new(ReviewService::new(
            review_store.clone(),
            products.clone(),
            rating,
        )),
        cart: Arc::new(CartService::new(cart_store.clone(), products.clone())),
        catalog: Arc::new(CatalogService::new(products.clone())),
        products,
        order_store,
        cart_store,
        review_store,
    }
}

pub fn app_state(app: &TestApp) -> AppState {
    AppState {
        checkout: app.checkout.clone(),
        orders: app.orders.clone(),
        reviews: app.reviews.clone(),
        cart: app.cart.clone(),
        catalog: app.catalog.clone(),
    }
}

pub fn make_product(vendor_id: UserId, price: Decimal, stock: u32) -> Product {
    let now = Utc::now();
    Product {
        id: Uuid::new_v4(),
        vendor_id,
        name: "widget".to_string(),
        description: None,
        price,
        stock_quantity: stock,
        sold_count: 0,
        category_id: None,
        image_url: None,
        sku: None,
        is_active: true,
        average_rating: Decimal::ZERO,
        total_reviews: 0,
        created_at: now,
        updated_at: now,
    }
}

pub async fn seed_product(
    products: &dyn ProductRepository,
    vendor_id: UserId,
    price: Decimal,
    stock: u32,
) -> Product {
    let product = make_product(vendor_id, price, stock);
    products.insert(product.clone()).await.unwrap();
    product
}
