/// Review model
///
/// One review per booking, enforced by `UNIQUE (booking_id)`. The sitter id
/// is copied from the booking at creation so listings by sitter need no join.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// Checks the rating lies in [1, 5]
pub fn validate_rating(rating: i32) -> Result<(), String> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(format!(
            "rating must be between {} and {}",
            MIN_RATING, MAX_RATING
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: i64,
    pub booking_id: i64,
    pub owner_id: i64,
    pub sitter_id: i64,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateReview {
    pub booking_id: i64,
    pub owner_id: i64,
    pub sitter_id: i64,
    pub rating: i32,
    pub comment: String,
}

#[derive(Debug, Clone)]
pub struct UpdateReview {
    pub rating: i32,
    pub comment: String,
}

/// Aggregate rating for one sitter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RatingSummary {
    pub sitter_id: i64,
    /// 0.0 when the sitter has no reviews
    pub average_rating: f64,
    pub review_count: i64,
}
