// src/domain/repository/mod.rs
// Repository interfaces for the backing stores

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::errors::MarketResult;
use crate::domain::model::{Cart, Order, OrderId, Product, ProductId, Review, ReviewId, UserId};

/// Repository interface for the product catalog.
///
/// All stock mutation flows through `decrement_stock` / `increase_stock`;
/// implementations must make each of them a single indivisible step so the
/// net effect of concurrent calls equals their sequential application.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn insert(&self, product: Product) -> MarketResult<()>;
    async fn find(&self, id: ProductId) -> MarketResult<Option<Product>>;
    async fn update(&self, product: Product) -> MarketResult<()>;
    async fn list_active(&self) -> MarketResult<Vec<Product>>;

    /// Atomically decrement stock by `quantity` and bump the sold counter,
    /// only if the remaining stock would stay non-negative. Returns whether
    /// the decrement was applied.
    async fn decrement_stock(&self, id: ProductId, quantity: u32) -> MarketResult<bool>;

    /// Unconditionally credit stock back and debit the sold counter
    /// (cancellation reversal and checkout rollback).
    async fn increase_stock(&self, id: ProductId, quantity: u32) -> MarketResult<()>;

    /// Write the derived rating view. Returns false when the product no
    /// longer exists.
    async fn write_rating(&self, id: ProductId, average: Decimal, count: u32)
        -> MarketResult<bool>;
}

/// Repository interface for customer carts: one cart per customer,
/// read / full-replace semantics.
#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn find_by_customer(&self, customer_id: UserId) -> MarketResult<Option<Cart>>;
    async fn upsert(&self, cart: Cart) -> MarketResult<()>;
}

/// Repository interface for placed orders.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn insert(&self, order: Order) -> MarketResult<()>;
    async fn find(&self, id: OrderId) -> MarketResult<Option<Order>>;
    async fn update(&self, order: Order) -> MarketResult<()>;

    /// Compensating deletion of a provisionally created order.
    async fn delete(&self, id: OrderId) -> MarketResult<()>;

    /// Customer's orders, newest first.
    async fn list_by_customer(&self, customer_id: UserId) -> MarketResult<Vec<Order>>;

    /// Vendor's incoming orders, newest first.
    async fn list_by_vendor(&self, vendor_id: UserId) -> MarketResult<Vec<Order>>;

    /// Flip the stock-reversal latch, only if it is still unset. Returns
    /// whether this call won the flip; losers must not credit stock again.
    async fn mark_stock_reversed(&self, id: OrderId) -> MarketResult<bool>;
}

/// Store-level aggregate over a product's current review set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingAggregate {
    pub rating_sum: u64,
    pub review_count: u32,
}

/// Repository interface for reviews. Uniqueness of (product, customer) is
/// enforced here, not by an application-level check-then-insert.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Fails with `DuplicateReview` when the (product, customer) pair
    /// already has a review; check and insert are one indivisible step.
    async fn insert(&self, review: Review) -> MarketResult<()>;
    async fn find(&self, id: ReviewId) -> MarketResult<Option<Review>>;
    async fn update(&self, review: Review) -> MarketResult<()>;
    async fn delete(&self, id: ReviewId) -> MarketResult<()>;

    /// A product's reviews, newest first.
    async fn list_for_product(&self, product_id: ProductId) -> MarketResult<Vec<Review>>;

    async fn aggregate_for_product(&self, product_id: ProductId) -> MarketResult<RatingAggregate>;
}
