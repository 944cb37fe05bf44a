// src/infrastructure/memory/mod.rs
// Thread-safe in-memory stores
//
// Every critical invariant (conditional decrement, review uniqueness,
// reversal latch) is enforced inside a single write-lock acquisition, so
// each primitive is one indivisible step per store. Locks are sync and
// never held across an await.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::domain::errors::{MarketError, MarketResult};
use crate::domain::model::{
    Cart, Order, OrderId, Product, ProductId, Review, ReviewId, UserId,
};
use crate::domain::repository::{
    CartRepository, OrderRepository, ProductRepository, RatingAggregate, ReviewRepository,
};

/// In-memory product catalog.
#[derive(Clone, Default)]
pub struct MemoryProductRepository {
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
}

impl MemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn insert(&self, product: Product) -> MarketResult<()> {
        let mut products = self.products.write().expect("RwLock poisoned");
        products.insert(product.id, product);
        Ok(())
    }

    async fn find(&self, id: ProductId) -> MarketResult<Option<Product>> {
        let products = self.products.read().expect("RwLock poisoned");
        Ok(products.get(&id).cloned())
    }

    async fn update(&self, product: Product) -> MarketResult<()> {
        let mut products = self.products.write().expect("RwLock poisoned");
        if !products.contains_key(&product.id) {
            return Err(MarketError::not_found("product", product.id));
        }
        products.insert(product.id, product);
        Ok(())
    }

    async fn list_active(&self) -> MarketResult<Vec<Product>> {
        let products = self.products.read().expect("RwLock poisoned");
        let mut active: Vec<Product> = products.values().filter(|p| p.is_active).cloned().collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(active)
    }

    async fn decrement_stock(&self, id: ProductId, quantity: u32) -> MarketResult<bool> {
        let mut products = self.products.write().expect("RwLock poisoned");
        let product = products
            .get_mut(&id)
            .ok_or_else(|| MarketError::not_found("product", id))?;

        // Check and apply under the same lock; this is the linearization
        // point for concurrent checkouts.
        if product.stock_quantity < quantity {
            return Ok(false);
        }
        product.stock_quantity -= quantity;
        product.sold_count += quantity;
        product.updated_at = Utc::now();
        Ok(true)
    }

    async fn increase_stock(&self, id: ProductId, quantity: u32) -> MarketResult<()> {
        let mut products = self.products.write().expect("RwLock poisoned");
        let product = products
            .get_mut(&id)
            .ok_or_else(|| MarketError::not_found("product", id))?;

        product.stock_quantity += quantity;
        product.sold_count = product.sold_count.saturating_sub(quantity);
        product.updated_at = Utc::now();
        Ok(())
    }

    async fn write_rating(
        &self,
        id: ProductId,
        average: Decimal,
        count: u32,
    ) -> MarketResult<bool> {
        let mut products = self.products.write().expect("RwLock poisoned");
        match products.get_mut(&id) {
            Some(product) => {
                product.average_rating = average;
                product.total_reviews = count;
                product.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// In-memory carts, one slot per customer.
#[derive(Clone, Default)]
pub struct MemoryCartRepository {
    carts: Arc<RwLock<HashMap<UserId, Cart>>>,
}

impl MemoryCartRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartRepository for MemoryCartRepository {
    async fn find_by_customer(&self, customer_id: UserId) -> MarketResult<Option<Cart>> {
        let carts = self.carts.read().expect("RwLock poisoned");
        Ok(carts.get(&customer_id).cloned())
    }

    async fn upsert(&self, cart: Cart) -> MarketResult<()> {
        let mut carts = self.carts.write().expect("RwLock poisoned");
        carts.insert(cart.customer_id, cart);
        Ok(())
    }
}

/// In-memory order store.
#[derive(Clone, Default)]
pub struct MemoryOrderRepository {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl MemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for MemoryOrderRepository {
    async fn insert(&self, order: Order) -> MarketResult<()> {
        let mut orders = self.orders.write().expect("RwLock poisoned");
        orders.insert(order.id, order);
        Ok(())
    }

    async fn find(&self, id: OrderId) -> MarketResult<Option<Order>> {
        let orders = self.orders.read().expect("RwLock poisoned");
        Ok(orders.get(&id).cloned())
    }

    async fn update(&self, order: Order) -> MarketResult<()> {
        let mut orders = self.orders.write().expect("RwLock poisoned");
        if !orders.contains_key(&order.id) {
            return Err(MarketError::not_found("order", order.id));
        }
        orders.insert(order.id, order);
        Ok(())
    }

    async fn delete(&self, id: OrderId) -> MarketResult<()> {
        let mut orders = self.orders.write().expect("RwLock poisoned");
        orders.remove(&id);
        Ok(())
    }

    async fn list_by_customer(&self, customer_id: UserId) -> MarketResult<Vec<Order>> {
        let orders = self.orders.read().expect("RwLock poisoned");
        let mut matched: Vec<Order> = orders
            .values()
            .filter(|o| o.customer_id == customer_id)
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matched)
    }

    async fn list_by_vendor(&self, vendor_id: UserId) -> MarketResult<Vec<Order>> {
        let orders = self.orders.read().expect("RwLock poisoned");
        let mut matched: Vec<Order> = orders
            .values()
            .filter(|o| o.vendor_id == vendor_id)
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matched)
    }

    async fn mark_stock_reversed(&self, id: OrderId) -> MarketResult<bool> {
        let mut orders = self.orders.write().expect("RwLock poisoned");
        let order = orders
            .get_mut(&id)
            .ok_or_else(|| MarketError::not_found("order", id))?;

        if order.stock_reversed {
            return Ok(false);
        }
        order.stock_reversed = true;
        order.updated_at = Utc::now();
        Ok(true)
    }
}

#[derive(Default)]
struct ReviewTable {
    reviews: HashMap<ReviewId, Review>,
    // Unique compound index on (product, customer)
    by_pair: HashMap<(ProductId, UserId), ReviewId>,
}

/// In-memory review store with a unique (product, customer) index
/// maintained under the same lock as the row itself.
#[derive(Clone, Default)]
pub struct MemoryReviewRepository {
    table: Arc<RwLock<ReviewTable>>,
}

impl MemoryReviewRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewRepository for MemoryReviewRepository {
    async fn insert(&self, review: Review) -> MarketResult<()> {
        let mut table = self.table.write().expect("RwLock poisoned");
        let pair = (review.product_id, review.customer_id);

        if table.by_pair.contains_key(&pair) {
            return Err(MarketError::DuplicateReview {
                product_id: review.product_id.to_string(),
            });
        }
        table.by_pair.insert(pair, review.id);
        table.reviews.insert(review.id, review);
        Ok(())
    }

    async fn find(&self, id: ReviewId) -> MarketResult<Option<Review>> {
        let table = self.table.read().expect("RwLock poisoned");
        Ok(table.reviews.get(&id).cloned())
    }

    async fn update(&self, review: Review) -> MarketResult<()> {
        let mut table = self.table.write().expect("RwLock poisoned");
        if !table.reviews.contains_key(&review.id) {
            return Err(MarketError::not_found("review", review.id));
        }
        table.reviews.insert(review.id, review);
        Ok(())
    }

    async fn delete(&self, id: ReviewId) -> MarketResult<()> {
        let mut table = self.table.write().expect("RwLock poisoned");
        if let Some(review) = table.reviews.remove(&id) {
            table
                .by_pair
                .remove(&(review.product_id, review.customer_id));
        }
        Ok(())
    }

    async fn list_for_product(&self, product_id: ProductId) -> MarketResult<Vec<Review>> {
        let table = self.table.read().expect("RwLock poisoned");
        let mut matched: Vec<Review> = table
            .reviews
            .values()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matched)
    }

    async fn aggregate_for_product(&self, product_id: ProductId) -> MarketResult<RatingAggregate> {
        let table = self.table.read().expect("RwLock poisoned");
        let mut aggregate = RatingAggregate::default();
        for review in table.reviews.values() {
            if review.product_id == product_id {
                aggregate.rating_sum += u64::from(review.rating);
                aggregate.review_count += 1;
            }
        }
        Ok(aggregate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn product(stock: u32) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4(),
            vendor_id: Uuid::new_v4(),
            name: "widget".to_string(),
            description: None,
            price: dec!(9.99),
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

    fn review(product_id: ProductId, customer_id: UserId, rating: u8) -> Review {
        let now = Utc::now();
        Review {
            id: Uuid::new_v4(),
            product_id,
            customer_id,
            rating,
            comment: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn decrement_refuses_to_go_negative() {
        let repo = MemoryProductRepository::new();
        let p = product(3);
        let id = p.id;
        repo.insert(p).await.unwrap();

        assert!(repo.decrement_stock(id, 3).await.unwrap());
        assert!(!repo.decrement_stock(id, 1).await.unwrap());

        let stored = repo.find(id).await.unwrap().unwrap();
        assert_eq!(stored.stock_quantity, 0);
        assert_eq!(stored.sold_count, 3);
    }

    #[tokio::test]
    async fn concurrent_decrements_for_last_unit_admit_exactly_one() {
        let repo = Arc::new(MemoryProductRepository::new());
        let p = product(1);
        let id = p.id;
        repo.insert(p).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let repo = repo.clone();
            handles.push(tokio::spawn(
                async move { repo.decrement_stock(id, 1).await },
            ));
        }

        let mut wins = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap() {
                wins += 1;
            }
        }

        assert_eq!(wins, 1);
        let stored = repo.find(id).await.unwrap().unwrap();
        assert_eq!(stored.stock_quantity, 0);
        assert_eq!(stored.sold_count, 1);
    }

    #[tokio::test]
    async fn increase_reverses_sold_count() {
        let repo = MemoryProductRepository::new();
        let p = product(5);
        let id = p.id;
        repo.insert(p).await.unwrap();

        repo.decrement_stock(id, 4).await.unwrap();
        repo.increase_stock(id, 4).await.unwrap();

        let stored = repo.find(id).await.unwrap().unwrap();
        assert_eq!(stored.stock_quantity, 5);
        assert_eq!(stored.sold_count, 0);
    }

    #[tokio::test]
    async fn second_review_for_same_pair_is_rejected() {
        let repo = MemoryReviewRepository::new();
        let product_id = Uuid::new_v4();
        let customer_id = Uuid::new_v4();

        repo.insert(review(product_id, customer_id, 5)).await.unwrap();
        let err = repo
            .insert(review(product_id, customer_id, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, MarketError::DuplicateReview { .. }));

        // A different customer is still welcome.
        repo.insert(review(product_id, Uuid::new_v4(), 4))
            .await
            .unwrap();
        let aggregate = repo.aggregate_for_product(product_id).await.unwrap();
        assert_eq!(aggregate.review_count, 2);
        assert_eq!(aggregate.rating_sum, 9);
    }

    #[tokio::test]
    async fn deleting_a_review_frees_the_pair() {
        let repo = MemoryReviewRepository::new();
        let product_id = Uuid::new_v4();
        let customer_id = Uuid::new_v4();

        let first = review(product_id, customer_id, 2);
        let first_id = first.id;
        repo.insert(first).await.unwrap();
        repo.delete(first_id).await.unwrap();

        repo.insert(review(product_id, customer_id, 4)).await.unwrap();
    }

    #[tokio::test]
    async fn reversal_latch_flips_once() {
        let repo = MemoryOrderRepository::new();
        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            vendor_id: Uuid::new_v4(),
            items: Vec::new(),
            total_amount: Decimal::ZERO,
            status: crate::domain::model::OrderStatus::Cancelled,
            payment_status: crate::domain::model::PaymentStatus::Unpaid,
            payment_method: Default::default(),
            shipping_address: "1 Main St".to_string(),
            stock_reversed: false,
            created_at: now,
            updated_at: now,
        };
        let id = order.id;
        repo.insert(order).await.unwrap();

        assert!(repo.mark_stock_reversed(id).await.unwrap());
        assert!(!repo.mark_stock_reversed(id).await.unwrap());
        assert!(!repo.mark_stock_reversed(id).await.unwrap());
    }
}
