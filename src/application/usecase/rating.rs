// src/application/usecase/rating.rs
// Derived rating aggregation

use std::sync::Arc;

use crate::domain::errors::MarketResult;
use crate::domain::model::ProductId;
use crate::domain::repository::{ProductRepository, ReviewRepository};
use crate::domain::service::mean_rating;

/// Recomputes a product's `average_rating` / `total_reviews` view from the
/// full current review set. Always a full recompute, never incremental
/// running-average math, so repeated invocations are idempotent and
/// concurrent edits cannot make the view drift.
pub struct RatingService {
    reviews: Arc<dyn ReviewRepository>,
    products: Arc<dyn ProductRepository>,
}

impl RatingService {
    pub fn new(reviews: Arc<dyn ReviewRepository>, products: Arc<dyn ProductRepository>) -> Self {
        Self { reviews, products }
    }

    /// Recompute and persist the aggregate for one product. A product that
    /// disappeared concurrently is logged and discarded; the orphaned
    /// aggregate is not an error anywhere else.
    pub async fn recompute(&self, product_id: ProductId) -> MarketResult<()> {
        let aggregate = self.reviews.aggregate_for_product(product_id).await?;
        let average = mean_rating(aggregate.rating_sum, aggregate.review_count);

        let found = self
            .products
            .write_rating(product_id, average, aggregate.review_count)
            .await?;

        if found {
            log::debug!(
                "product {} rating recomputed: {} over {} review(s)",
                product_id,
                average,
                aggregate.review_count
            );
        } else {
            log::warn!(
                "rating recompute: product {} no longer exists, aggregate discarded",
                product_id
            );
        }

        Ok(())
    }
}
