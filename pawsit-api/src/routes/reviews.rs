/// Review endpoints
///
/// - `POST   /api/reviews` - Owner of the booking reviews its sitter
/// - `GET    /api/reviews/:id`
/// - `PUT    /api/reviews/:id` - Author or admin
/// - `DELETE /api/reviews/:id` - Author or admin
/// - `GET    /api/bookings/:id/review`
/// - `GET    /api/sitters/:id/reviews`
/// - `GET    /api/sitters/:id/rating`

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{parse_id, Path, ValidatedJson},
};
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use pawsit_shared::{
    auth::middleware::AuthContext,
    models::review::{RatingSummary, Review, UpdateReview},
};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(range(min = 1, message = "must be a positive integer"))]
    pub booking_id: i64,

    #[validate(range(min = 1, max = 5, message = "must be between 1 and 5"))]
    pub rating: i32,

    #[serde(default)]
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub comment: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateReviewRequest {
    #[validate(range(min = 1, max = 5, message = "must be between 1 and 5"))]
    pub rating: i32,

    #[serde(default)]
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub comment: String,
}

pub async fn create_review(
    State(state): State<AppState>,
    auth: AuthContext,
    ValidatedJson(req): ValidatedJson<CreateReviewRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let review = state
        .services
        .reviews
        .create(
            &auth,
            req.booking_id,
            UpdateReview {
                rating: req.rating,
                comment: req.comment,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "review created successfully",
            "review_id": review.id,
        })),
    ))
}

pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Review>> {
    let id = parse_id(id, "id")?;
    Ok(Json(state.services.reviews.get(id).await?))
}

pub async fn get_booking_review(
    State(state): State<AppState>,
    Path(booking_id): Path<i64>,
) -> ApiResult<Json<Review>> {
    let booking_id = parse_id(booking_id, "booking_id")?;
    Ok(Json(state.services.reviews.get_by_booking(booking_id).await?))
}

pub async fn update_review(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateReviewRequest>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(id, "id")?;
    state
        .services
        .reviews
        .update(
            &auth,
            id,
            UpdateReview {
                rating: req.rating,
                comment: req.comment,
            },
        )
        .await?;

    Ok(Json(json!({ "message": "review updated successfully" })))
}

pub async fn delete_review(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(id, "id")?;
    state.services.reviews.delete(&auth, id).await?;

    Ok(Json(json!({ "message": "review deleted successfully" })))
}

pub async fn list_sitter_reviews(
    State(state): State<AppState>,
    Path(sitter_id): Path<i64>,
) -> ApiResult<Json<Vec<Review>>> {
    let sitter_id = parse_id(sitter_id, "sitter_id")?;
    Ok(Json(state.services.reviews.list_by_sitter(sitter_id).await?))
}

pub async fn sitter_rating(
    State(state): State<AppState>,
    Path(sitter_id): Path<i64>,
) -> ApiResult<Json<RatingSummary>> {
    let sitter_id = parse_id(sitter_id, "sitter_id")?;
    Ok(Json(state.services.reviews.rating_summary(sitter_id).await?))
}
