// src/application/usecase/catalog.rs
// Vendor-facing catalog management and public reads

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::application::dto::{CreateProductRequest, UpdateProductRequest};
use crate::domain::errors::{MarketError, MarketResult};
use crate::domain::model::{Actor, Product, ProductId};
use crate::domain::repository::ProductRepository;

const MAX_NAME_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 2000;

/// Catalog writes are owned by the product's vendor (admin override);
/// reads are public. Price edits never touch already-placed order
/// snapshots, which carry their own immutable copy.
pub struct CatalogService {
    products: Arc<dyn ProductRepository>,
}

impl CatalogService {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }

    pub async fn get(&self, id: ProductId) -> MarketResult<Product> {
        self.products
            .find(id)
            .await?
            .ok_or_else(|| MarketError::not_found("product", id))
    }

    pub async fn list_active(&self) -> MarketResult<Vec<Product>> {
        self.products.list_active().await
    }

    pub async fn create(&self, actor: Actor, request: CreateProductRequest) -> MarketResult<Product> {
        validate_name(&request.name)?;
        validate_description(request.description.as_deref())?;
        validate_price(request.price)?;

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            vendor_id: actor.user_id,
            name: request.name,
            description: request.description,
            price: request.price,
            stock_quantity: request.stock_quantity,
            sold_count: 0,
            category_id: request.category_id,
            image_url: request.image_url,
            sku: request.sku,
            is_active: true,
            average_rating: Decimal::ZERO,
            total_reviews: 0,
            created_at: now,
            updated_at: now,
        };

        self.products.insert(product.clone()).await?;
        log::info!("vendor {} listed product {}", actor.user_id, product.id);
        Ok(product)
    }

    pub async fn update(
        &self,
        actor: Actor,
        id: ProductId,
        request: UpdateProductRequest,
    ) -> MarketResult<Product> {
        let mut product = self.owned_product(actor, id).await?;

        if let Some(name) = request.name {
            validate_name(&name)?;
            product.name = name;
        }
        if let Some(description) = request.description {
            validate_description(Some(&description))?;
            product.description = Some(description);
        }
        if let Some(price) = request.price {
            validate_price(price)?;
            product.price = price;
        }
        if let Some(stock_quantity) = request.stock_quantity {
            product.stock_quantity = stock_quantity;
        }
        if let Some(category_id) = request.category_id {
            product.category_id = Some(category_id);
        }
        if let Some(image_url) = request.image_url {
            product.image_url = Some(image_url);
        }
        if let Some(sku) = request.sku {
            product.sku = Some(sku);
        }
        if let Some(is_active) = request.is_active {
            product.is_active = is_active;
        }
        product.updated_at = Utc::now();

        self.products.update(product.clone()).await?;
        Ok(product)
    }

    /// Soft delete: the product disappears from listings and checkout but
    /// keeps its record for existing order and review references.
    pub async fn deactivate(&self, actor: Actor, id: ProductId) -> MarketResult<Product> {
        let mut product = self.owned_product(actor, id).await?;

        product.is_active = false;
        product.updated_at = Utc::now();

        self.products.update(product.clone()).await?;
        log::info!("product {} deactivated", product.id);
        Ok(product)
    }

    async fn owned_product(&self, actor: Actor, id: ProductId) -> MarketResult<Product> {
        let product = self
            .products
            .find(id)
            .await?
            .ok_or_else(|| MarketError::not_found("product", id))?;

        if product.vendor_id != actor.user_id && !actor.is_admin() {
            return Err(MarketError::forbidden("not the owner of this product"));
        }

        Ok(product)
    }
}

fn validate_name(name: &str) -> MarketResult<()> {
    if name.trim().is_empty() {
        return Err(MarketError::validation("product name is required"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(MarketError::validation(format!(
            "product name cannot exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_description(description: Option<&str>) -> MarketResult<()> {
    match description {
        Some(d) if d.chars().count() > MAX_DESCRIPTION_LEN => Err(MarketError::validation(
            format!("description cannot exceed {MAX_DESCRIPTION_LEN} characters"),
        )),
        _ => Ok(()),
    }
}

fn validate_price(price: Decimal) -> MarketResult<()> {
    if price.is_sign_negative() {
        Err(MarketError::validation("price cannot be negative"))
    } else {
        Ok(())
    }
}
