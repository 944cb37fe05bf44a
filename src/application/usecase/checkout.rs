// src/application/usecase/checkout.rs
// Order placement engine

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::application::dto::PlaceOrderRequest;
use crate::domain::errors::{MarketError, MarketResult};
use crate::domain::model::{
    Actor, Cart, Order, OrderStatus, PaymentStatus, Product, ProductId, UserId,
};
use crate::domain::repository::{CartRepository, OrderRepository, ProductRepository};
use crate::domain::service::partition_by_vendor;

/// Places multi-item, multi-vendor checkouts.
///
/// The engine validates against an advisory read, partitions the request
/// into vendor groups, provisionally creates one order per group, and only
/// then applies the authoritative conditional stock decrements. A decrement
/// that loses a race triggers compensating rollback of everything this call
/// wrote, so no order ever exists whose stock was not actually reserved.
///
/// Checkout clears the customer's entire cart, including lines absent from
/// the submitted items. Flagged for product-owner confirmation; preserved
/// as the documented behavior for now.
pub struct CheckoutService {
    products: Arc<dyn ProductRepository>,
    orders: Arc<dyn OrderRepository>,
    carts: Arc<dyn CartRepository>,
}

impl CheckoutService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        orders: Arc<dyn OrderRepository>,
        carts: Arc<dyn CartRepository>,
    ) -> Self {
        Self {
            products,
            orders,
            carts,
        }
    }

    /// Place an order for every vendor represented in `request.items`.
    /// Returns the created orders in vendor first-appearance order.
    pub async fn place_order(
        &self,
        actor: Actor,
        request: PlaceOrderRequest,
    ) -> MarketResult<Vec<Order>> {
        if request.items.is_empty() {
            return Err(MarketError::validation("order contains no items"));
        }
        if request.shipping_address.trim().is_empty() {
            return Err(MarketError::validation("shipping address is required"));
        }
        if request.items.iter().any(|item| item.quantity == 0) {
            return Err(MarketError::validation("quantity must be at least 1"));
        }

        // Advisory validation pass; nothing is mutated before it completes
        // for every line.
        let mut lines: Vec<(Product, u32)> = Vec::with_capacity(request.items.len());
        for item in &request.items {
            let product = self
                .products
                .find(item.product)
                .await?
                .filter(|p| p.is_active)
                .ok_or_else(|| MarketError::not_found("product", item.product))?;

            if !product.is_in_stock(item.quantity) {
                return Err(MarketError::InsufficientStock {
                    product_id: product.id.to_string(),
                    requested: item.quantity,
                    available: product.stock_quantity,
                });
            }

            lines.push((product, item.quantity));
        }

        let groups = partition_by_vendor(&lines);
        let payment_method = request.payment_method.unwrap_or_default();

        // Provisional order rows first, stock adjustment last (rollback of
        // the rows is possible, un-losing a decrement is not).
        let mut created: Vec<Order> = Vec::with_capacity(groups.len());
        for group in groups {
            let now = Utc::now();
            let order = Order {
                id: Uuid::new_v4(),
                customer_id: actor.user_id,
                vendor_id: group.vendor_id,
                items: group.items,
                total_amount: group.total_amount,
                status: OrderStatus::Pending,
                payment_status: PaymentStatus::Unpaid,
                payment_method,
                shipping_address: request.shipping_address.clone(),
                stock_reversed: false,
                created_at: now,
                updated_at: now,
            };

            if let Err(e) = self.orders.insert(order.clone()).await {
                self.roll_back(&created, &[]).await;
                return Err(e);
            }
            created.push(order);
        }

        // Authoritative commit: the conditional decrement re-checks stock at
        // the moment of the write, closing the window between the advisory
        // read and here.
        let mut applied: Vec<(ProductId, u32)> = Vec::new();
        for order in &created {
            for item in &order.items {
                match self
                    .products
                    .decrement_stock(item.product_id, item.quantity)
                    .await
                {
                    Ok(true) => applied.push((item.product_id, item.quantity)),
                    Ok(false) => {
                        self.roll_back(&created, &applied).await;
                        log::warn!(
                            "checkout by {} lost stock race on product {}",
                            actor.user_id,
                            item.product_id
                        );
                        return Err(MarketError::StockConflict {
                            product_id: item.product_id.to_string(),
                        });
                    }
                    Err(e) => {
                        self.roll_back(&created, &applied).await;
                        return Err(e);
                    }
                }
            }
        }

        self.clear_cart(actor.user_id).await?;

        log::info!(
            "customer {} placed {} order(s)",
            actor.user_id,
            created.len()
        );
        Ok(created)
    }

    /// Compensating rollback of this call's own writes: credit back every
    /// decrement already applied, then delete every provisional order.
    async fn roll_back(&self, created: &[Order], applied: &[(ProductId, u32)]) {
        for (product_id, quantity) in applied {
            if let Err(e) = self.products.increase_stock(*product_id, *quantity).await {
                log::error!(
                    "rollback: failed to restore {} unit(s) of product {}: {}",
                    quantity,
                    product_id,
                    e
                );
            }
        }
        for order in created {
            if let Err(e) = self.orders.delete(order.id).await {
                log::error!("rollback: failed to delete provisional order {}: {}", order.id, e);
            }
        }
    }

    async fn clear_cart(&self, customer_id: UserId) -> MarketResult<()> {
        let mut cart = self
            .carts
            .find_by_customer(customer_id)
            .await?
            .unwrap_or_else(|| Cart::empty(customer_id));
        cart.items.clear();
        cart.updated_at = Utc::now();
        self.carts.upsert(cart).await
    }
}
