//! PostgreSQL implementation of the review service

use async_trait::async_trait;
use tracing::{info, warn};

use super::ReviewService;
use crate::{
    error::{ServiceError, ServiceResult},
    models::{Principal, Review},
    repositories::ReviewRepository,
    validation,
};

#[derive(Clone)]
pub struct ReviewServiceImpl {
    reviews: ReviewRepository,
}

impl ReviewServiceImpl {
    pub fn new(reviews: ReviewRepository) -> Self {
        Self { reviews }
    }
}

#[async_trait]
impl ReviewService for ReviewServiceImpl {
    async fn add_review(
        &self,
        user_name: &str,
        code: &str,
        comment: &str,
    ) -> ServiceResult<Review> {
        if let Err(message) = validation::validate_comment(comment) {
            return Err(ServiceError::invalid("comment", message));
        }

        let id = self
            .reviews
            .insert(user_name, code, comment.trim())
            .await?
            .ok_or(ServiceError::NotFound("Movie"))?;

        info!("{} reviewed movie {}", user_name, code);
        self.reviews
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound("Review"))
    }

    async fn delete_review(&self, principal: &Principal, review_id: i64) -> ServiceResult<()> {
        let review = self
            .reviews
            .find_by_id(review_id)
            .await?
            .ok_or(ServiceError::NotFound("Review"))?;

        if !principal.may_modify(&review.author) {
            warn!(
                "{} tried to delete review {} by {}",
                principal.name, review_id, review.author
            );
            return Err(ServiceError::Forbidden);
        }

        if self.reviews.delete(review_id).await? {
            Ok(())
        } else {
            Err(ServiceError::NotFound("Review"))
        }
    }
}
