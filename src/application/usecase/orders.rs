// src/application/usecase/orders.rs
// Order queries, status transitions, cancellation stock reversal

use std::sync::Arc;

use chrono::Utc;

use crate::domain::errors::{MarketError, MarketResult};
use crate::domain::model::{Actor, Order, OrderId, OrderStatus};
use crate::domain::repository::{OrderRepository, ProductRepository};

/// Read and lifecycle operations on placed orders. Status transitions are
/// restricted to the order's vendor and admins; customers read only.
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    products: Arc<dyn ProductRepository>,
}

impl OrderService {
    pub fn new(orders: Arc<dyn OrderRepository>, products: Arc<dyn ProductRepository>) -> Self {
        Self { orders, products }
    }

    /// The calling customer's orders, newest first.
    pub async fn my_orders(&self, actor: Actor) -> MarketResult<Vec<Order>> {
        self.orders.list_by_customer(actor.user_id).await
    }

    /// The calling vendor's incoming orders, newest first.
    pub async fn vendor_orders(&self, actor: Actor) -> MarketResult<Vec<Order>> {
        self.orders.list_by_vendor(actor.user_id).await
    }

    /// A single order, readable by its customer, its vendor, or an admin.
    pub async fn get_order(&self, actor: Actor, id: OrderId) -> MarketResult<Order> {
        let order = self
            .orders
            .find(id)
            .await?
            .ok_or_else(|| MarketError::not_found("order", id))?;

        if order.customer_id != actor.user_id
            && order.vendor_id != actor.user_id
            && !actor.is_admin()
        {
            return Err(MarketError::forbidden("not a party to this order"));
        }

        Ok(order)
    }

    /// Transition an order along the status machine. The raw client value
    /// is parsed here so an unknown status is a validation failure, not a
    /// deserialization one.
    pub async fn update_status(
        &self,
        actor: Actor,
        id: OrderId,
        status: &str,
    ) -> MarketResult<Order> {
        let next = OrderStatus::parse(status)
            .ok_or_else(|| MarketError::validation(format!("invalid status value: {status}")))?;

        let mut order = self
            .orders
            .find(id)
            .await?
            .ok_or_else(|| MarketError::not_found("order", id))?;

        if order.vendor_id != actor.user_id && !actor.is_admin() {
            return Err(MarketError::forbidden("only the order's vendor may update status"));
        }

        if !order.status.can_transition_to(next) {
            return Err(MarketError::validation(format!(
                "cannot transition order from {} to {}",
                order.status, next
            )));
        }

        order.status = next;
        order.updated_at = Utc::now();
        self.orders.update(order.clone()).await?;

        log::info!("order {} moved to {}", order.id, order.status);
        Ok(order)
    }

    /// Restore the stock a cancelled order had reserved. Idempotent: the
    /// reversal latch on the order is flipped by a conditional store
    /// primitive, so racing or repeated calls credit stock exactly once.
    pub async fn reverse_stock(&self, actor: Actor, id: OrderId) -> MarketResult<Order> {
        let order = self
            .orders
            .find(id)
            .await?
            .ok_or_else(|| MarketError::not_found("order", id))?;

        if order.vendor_id != actor.user_id && !actor.is_admin() {
            return Err(MarketError::forbidden("only the order's vendor may reverse stock"));
        }

        if order.status != OrderStatus::Cancelled {
            return Err(MarketError::validation(
                "stock can only be reversed for a cancelled order",
            ));
        }

        let won_flip = self.orders.mark_stock_reversed(id).await?;
        if !won_flip {
            // Already reversed; report the current state without crediting
            // anything again.
            return self
                .orders
                .find(id)
                .await?
                .ok_or_else(|| MarketError::not_found("order", id));
        }

        for item in &order.items {
            if let Err(e) = self
                .products
                .increase_stock(item.product_id, item.quantity)
                .await
            {
                // The product may have been deleted since the order was
                // placed; the credit is orphaned, not disputable elsewhere.
                log::warn!(
                    "stock reversal for order {}: could not credit product {}: {}",
                    id,
                    item.product_id,
                    e
                );
            }
        }

        log::info!("stock reversed for cancelled order {}", id);
        self.orders
            .find(id)
            .await?
            .ok_or_else(|| MarketError::not_found("order", id))
    }
}
