// src/application/usecase/cart.rs
// Customer cart surface

use std::sync::Arc;

use chrono::Utc;

use crate::application::dto::AddCartItemRequest;
use crate::domain::errors::{MarketError, MarketResult};
use crate::domain::model::{Actor, Cart, CartItem, ProductId};
use crate::domain::repository::{CartRepository, ProductRepository};

/// Cart reads and mutations. Stock checks here are advisory conveniences;
/// checkout re-validates and the store's conditional decrement is the only
/// authority.
pub struct CartService {
    carts: Arc<dyn CartRepository>,
    products: Arc<dyn ProductRepository>,
}

impl CartService {
    pub fn new(carts: Arc<dyn CartRepository>, products: Arc<dyn ProductRepository>) -> Self {
        Self { carts, products }
    }

    /// The customer's cart, created empty on first access.
    pub async fn get(&self, actor: Actor) -> MarketResult<Cart> {
        match self.carts.find_by_customer(actor.user_id).await? {
            Some(cart) => Ok(cart),
            None => {
                let cart = Cart::empty(actor.user_id);
                self.carts.upsert(cart.clone()).await?;
                Ok(cart)
            }
        }
    }

    /// Add a line, merging by quantity when the product is already present.
    pub async fn add_item(&self, actor: Actor, request: AddCartItemRequest) -> MarketResult<Cart> {
        if request.quantity == 0 {
            return Err(MarketError::validation("quantity must be at least 1"));
        }

        let product = self
            .products
            .find(request.product_id)
            .await?
            .filter(|p| p.is_active)
            .ok_or_else(|| MarketError::not_found("product", request.product_id))?;

        if !product.is_in_stock(request.quantity) {
            return Err(MarketError::InsufficientStock {
                product_id: product.id.to_string(),
                requested: request.quantity,
                available: product.stock_quantity,
            });
        }

        let mut cart = self
            .carts
            .find_by_customer(actor.user_id)
            .await?
            .unwrap_or_else(|| Cart::empty(actor.user_id));

        match cart
            .items
            .iter_mut()
            .find(|item| item.product_id == request.product_id)
        {
            Some(item) => item.quantity += request.quantity,
            None => cart.items.push(CartItem {
                product_id: request.product_id,
                quantity: request.quantity,
            }),
        }
        cart.updated_at = Utc::now();

        self.carts.upsert(cart.clone()).await?;
        Ok(cart)
    }

    /// Set an existing line's quantity.
    pub async fn update_item(
        &self,
        actor: Actor,
        product_id: ProductId,
        quantity: u32,
    ) -> MarketResult<Cart> {
        if quantity == 0 {
            return Err(MarketError::validation("quantity must be at least 1"));
        }

        let mut cart = self
            .carts
            .find_by_customer(actor.user_id)
            .await?
            .ok_or_else(|| MarketError::not_found("cart", actor.user_id))?;

        let item = cart
            .items
            .iter_mut()
            .find(|item| item.product_id == product_id)
            .ok_or_else(|| MarketError::not_found("cart item", product_id))?;

        let product = self
            .products
            .find(product_id)
            .await?
            .ok_or_else(|| MarketError::not_found("product", product_id))?;

        if !product.is_in_stock(quantity) {
            return Err(MarketError::InsufficientStock {
                product_id: product.id.to_string(),
                requested: quantity,
                available: product.stock_quantity,
            });
        }

        item.quantity = quantity;
        cart.updated_at = Utc::now();

        self.carts.upsert(cart.clone()).await?;
        Ok(cart)
    }

    pub async fn remove_item(&self, actor: Actor, product_id: ProductId) -> MarketResult<Cart> {
        let mut cart = self
            .carts
            .find_by_customer(actor.user_id)
            .await?
            .ok_or_else(|| MarketError::not_found("cart", actor.user_id))?;

        cart.items.retain(|item| item.product_id != product_id);
        cart.updated_at = Utc::now();

        self.carts.upsert(cart.clone()).await?;
        Ok(cart)
    }

    /// Replace the item list with the empty list.
    pub async fn clear(&self, actor: Actor) -> MarketResult<Cart> {
        let mut cart = self
            .carts
            .find_by_customer(actor.user_id)
            .await?
            .unwrap_or_else(|| Cart::empty(actor.user_id));

        cart.items.clear();
        cart.updated_at = Utc::now();

        self.carts.upsert(cart.clone()).await?;
        Ok(cart)
    }
}
