/// Reviews and sitter ratings
///
/// A booking gets at most one review, written by the booking's owner. The
/// reviewed sitter is always taken from the booking.

use std::sync::Arc;

use tracing::info;

use crate::auth::authorization::require_self_or_admin;
use crate::auth::middleware::AuthContext;
use crate::error::{ServiceError, ServiceResult};
use crate::models::review::{validate_rating, CreateReview, RatingSummary, Review, UpdateReview};
use crate::repository::{BookingRepository, ReviewRepository};

#[derive(Clone)]
pub struct ReviewService {
    reviews: Arc<dyn ReviewRepository>,
    bookings: Arc<dyn BookingRepository>,
}

impl ReviewService {
    pub fn new(reviews: Arc<dyn ReviewRepository>, bookings: Arc<dyn BookingRepository>) -> Self {
        Self { reviews, bookings }
    }

    /// Reviews `booking_id` as the caller
    pub async fn create(
        &self,
        ctx: &AuthContext,
        booking_id: i64,
        fields: UpdateReview,
    ) -> ServiceResult<Review> {
        validate_rating(fields.rating).map_err(ServiceError::Validation)?;

        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("booking"))?;
        if booking.owner_id != ctx.user_id {
            return Err(ServiceError::Forbidden(
                "only the booking's owner can review it".to_string(),
            ));
        }

        let review = self
            .reviews
            .create(CreateReview {
                booking_id,
                owner_id: booking.owner_id,
                sitter_id: booking.sitter_id,
                rating: fields.rating,
                comment: fields.comment.trim().to_string(),
            })
            .await?;

        info!(
            review_id = review.id,
            booking_id,
            sitter_id = review.sitter_id,
            rating = review.rating,
            "Review created"
        );
        Ok(review)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Review> {
        self.reviews
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("review"))
    }

    pub async fn get_by_booking(&self, booking_id: i64) -> ServiceResult<Review> {
        self.reviews
            .find_by_booking(booking_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("review"))
    }

    pub async fn list_by_sitter(&self, sitter_id: i64) -> ServiceResult<Vec<Review>> {
        Ok(self.reviews.list_by_sitter(sitter_id).await?)
    }

    /// Average rating and count; 0.0 when the sitter has no reviews
    pub async fn rating_summary(&self, sitter_id: i64) -> ServiceResult<RatingSummary> {
        Ok(self.reviews.rating_summary(sitter_id).await?)
    }

    pub async fn update(
        &self,
        ctx: &AuthContext,
        id: i64,
        mut fields: UpdateReview,
    ) -> ServiceResult<Review> {
        validate_rating(fields.rating).map_err(ServiceError::Validation)?;
        let review = self.get(id).await?;
        require_self_or_admin(ctx, review.owner_id)?;
        fields.comment = fields.comment.trim().to_string();

        self.reviews
            .update(id, fields)
            .await?
            .ok_or_else(|| ServiceError::not_found("review"))
    }

    pub async fn delete(&self, ctx: &AuthContext, id: i64) -> ServiceResult<()> {
        let review = self.get(id).await?;
        require_self_or_admin(ctx, review.owner_id)?;

        if !self.reviews.delete(id).await? {
            return Err(ServiceError::not_found("review"));
        }

        info!(review_id = id, "Review deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::{Booking, BookingStatus};
    use crate::models::user::Role;
    use crate::repository::memory::InMemoryStore;
    use chrono::{Duration, Utc};

    fn fixture() -> (InMemoryStore, ReviewService) {
        let store = InMemoryStore::new();
        let now = Utc::now();
        store.insert_booking(Booking {
            id: 5,
            owner_id: 1,
            sitter_id: 2,
            pet_id: 3,
            service_id: 4,
            start_time: now - Duration::hours(4),
            end_time: now - Duration::hours(2),
            status: BookingStatus::Completed,
            created_at: now - Duration::days(2),
            updated_at: now,
        });

        let shared = Arc::new(store.clone());
        let service = ReviewService::new(shared.clone(), shared);
        (store, service)
    }

    fn rating(rating: i32) -> UpdateReview {
        UpdateReview {
            rating,
            comment: "Great with dogs".to_string(),
        }
    }

    #[tokio::test]
    async fn test_one_review_per_booking() {
        let (_store, reviews) = fixture();
        let owner = AuthContext::new(1, Role::Owner);

        let review = reviews.create(&owner, 5, rating(4)).await.unwrap();
        assert_eq!(review.sitter_id, 2);
        assert_eq!(reviews.get_by_booking(5).await.unwrap().id, review.id);

        let second = reviews.create(&owner, 5, rating(5)).await.unwrap_err();
        assert!(matches!(second, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_rating_bounds_and_reviewer() {
        let (_store, reviews) = fixture();
        let owner = AuthContext::new(1, Role::Owner);

        for bad in [0, 6] {
            assert!(matches!(
                reviews.create(&owner, 5, rating(bad)).await.unwrap_err(),
                ServiceError::Validation(_)
            ));
        }

        let stranger = AuthContext::new(8, Role::Owner);
        assert!(matches!(
            reviews.create(&stranger, 5, rating(3)).await.unwrap_err(),
            ServiceError::Forbidden(_)
        ));

        assert!(matches!(
            reviews.create(&owner, 404, rating(3)).await.unwrap_err(),
            ServiceError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_rating_summary() {
        let (_store, reviews) = fixture();

        let empty = reviews.rating_summary(2).await.unwrap();
        assert_eq!(empty.review_count, 0);
        assert_eq!(empty.average_rating, 0.0);

        let owner = AuthContext::new(1, Role::Owner);
        reviews.create(&owner, 5, rating(4)).await.unwrap();

        let summary = reviews.rating_summary(2).await.unwrap();
        assert_eq!(summary.review_count, 1);
        assert_eq!(summary.average_rating, 4.0);
    }

    #[tokio::test]
    async fn test_update_and_delete_by_author() {
        let (_store, reviews) = fixture();
        let owner = AuthContext::new(1, Role::Owner);
        let review = reviews.create(&owner, 5, rating(4)).await.unwrap();

        let sitter = AuthContext::new(2, Role::Sitter);
        assert!(matches!(
            reviews.update(&sitter, review.id, rating(1)).await.unwrap_err(),
            ServiceError::Forbidden(_)
        ));

        let updated = reviews.update(&owner, review.id, rating(5)).await.unwrap();
        assert_eq!(updated.rating, 5);

        reviews.delete(&owner, review.id).await.unwrap();
        assert!(reviews.list_by_sitter(2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_out_of_range_keeps_rating() {
        let (_store, reviews) = fixture();
        let owner = AuthContext::new(1, Role::Owner);
        let review = reviews.create(&owner, 5, rating(4)).await.unwrap();

        for bad in [0, 6] {
            assert!(matches!(
                reviews.update(&owner, review.id, rating(bad)).await.unwrap_err(),
                ServiceError::Validation(_)
            ));
        }

        let stored = reviews.get(review.id).await.unwrap();
        assert_eq!(stored.rating, 4);
    }
}
