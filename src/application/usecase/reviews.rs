// src/application/usecase/reviews.rs
// Review mutations with synchronous rating recomputation

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::application::dto::{CreateReviewRequest, UpdateReviewRequest};
use crate::application::usecase::rating::RatingService;
use crate::domain::errors::{MarketError, MarketResult};
use crate::domain::model::{Actor, ProductId, Review, ReviewId};
use crate::domain::repository::{ProductRepository, ReviewRepository};

const MAX_COMMENT_LEN: usize = 500;

/// Review create/update/delete. Every mutation triggers the rating
/// recompute before the caller sees success; a failed aggregate write is
/// logged rather than failing the response, since the review itself is
/// durable (the one accepted eventual-consistency gap).
pub struct ReviewService {
    reviews: Arc<dyn ReviewRepository>,
    products: Arc<dyn ProductRepository>,
    rating: Arc<RatingService>,
}

impl ReviewService {
    pub fn new(
        reviews: Arc<dyn ReviewRepository>,
        products: Arc<dyn ProductRepository>,
        rating: Arc<RatingService>,
    ) -> Self {
        Self {
            reviews,
            products,
            rating,
        }
    }

    /// A product's reviews, newest first.
    pub async fn list_for_product(&self, product_id: ProductId) -> MarketResult<Vec<Review>> {
        self.reviews.list_for_product(product_id).await
    }

    pub async fn create(&self, actor: Actor, request: CreateReviewRequest) -> MarketResult<Review> {
        validate_rating(request.rating)?;
        validate_comment(request.comment.as_deref())?;

        self.products
            .find(request.product_id)
            .await?
            .ok_or_else(|| MarketError::not_found("product", request.product_id))?;

        let now = Utc::now();
        let review = Review {
            id: Uuid::new_v4(),
            product_id: request.product_id,
            customer_id: actor.user_id,
            rating: request.rating,
            comment: request.comment,
            created_at: now,
            updated_at: now,
        };

        // Uniqueness of (product, customer) is the store's job; a losing
        // racer surfaces here as DuplicateReview.
        self.reviews.insert(review.clone()).await?;
        self.recompute_or_log(review.product_id).await;

        Ok(review)
    }

    pub async fn update(
        &self,
        actor: Actor,
        id: ReviewId,
        request: UpdateReviewRequest,
    ) -> MarketResult<Review> {
        let mut review = self
            .reviews
            .find(id)
            .await?
            .ok_or_else(|| MarketError::not_found("review", id))?;

        if review.customer_id != actor.user_id {
            return Err(MarketError::forbidden("not the author of this review"));
        }

        if let Some(rating) = request.rating {
            validate_rating(rating)?;
            review.rating = rating;
        }
        if let Some(comment) = request.comment {
            validate_comment(Some(&comment))?;
            review.comment = Some(comment);
        }
        review.updated_at = Utc::now();

        self.reviews.update(review.clone()).await?;
        self.recompute_or_log(review.product_id).await;

        Ok(review)
    }

    pub async fn delete(&self, actor: Actor, id: ReviewId) -> MarketResult<()> {
        let review = self
            .reviews
            .find(id)
            .await?
            .ok_or_else(|| MarketError::not_found("review", id))?;

        if review.customer_id != actor.user_id && !actor.is_admin() {
            return Err(MarketError::forbidden("not the author of this review"));
        }

        self.reviews.delete(id).await?;
        self.recompute_or_log(review.product_id).await;

        Ok(())
    }

    /// The recompute runs synchronously in the mutation path; its failure
    /// is logged instead of failing the already-durable review write.
    async fn recompute_or_log(&self, product_id: ProductId) {
        if let Err(e) = self.rating.recompute(product_id).await {
            log::error!("rating recompute failed for product {}: {}", product_id, e);
        }
    }
}

fn validate_rating(rating: u8) -> MarketResult<()> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err(MarketError::validation("rating must be between 1 and 5"))
    }
}

fn validate_comment(comment: Option<&str>) -> MarketResult<()> {
    match comment {
        Some(c) if c.chars().count() > MAX_COMMENT_LEN => Err(MarketError::validation(format!(
            "comment cannot exceed {MAX_COMMENT_LEN} characters"
        ))),
        _ => Ok(()),
    }
}
