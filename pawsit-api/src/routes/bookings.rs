/// Booking endpoints
///
/// - `POST /api/bookings` - Owner books a sitter
/// - `GET  /api/bookings/:id`
/// - `POST /api/bookings/:id/confirm` - Sitter of the booking or admin
/// - `POST /api/bookings/:id/cancel` - Owner or sitter of the booking, or admin
/// - `POST /api/bookings/:id/complete` - Sitter of the booking or admin
/// - `GET  /api/owners/:id/bookings`
/// - `GET  /api/sitters/:id/bookings`
///
/// Illegal transitions (confirming a cancelled booking, cancelling a
/// completed one, ...) answer 400 and leave the booking unchanged.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{parse_id, Path, ValidatedJson},
};
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use pawsit_shared::{
    auth::{
        authorization::{require_role, require_self_or_admin},
        middleware::AuthContext,
    },
    models::{
        booking::{validate_duration, Booking, BookingStatus, CreateBooking},
        user::Role,
    },
};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

/// Create booking request
///
/// `owner_id` defaults to the caller; only admins may book for someone else.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingRequest {
    #[validate(range(min = 1, message = "must be a positive integer"))]
    pub owner_id: Option<i64>,

    #[validate(range(min = 1, message = "must be a positive integer"))]
    pub sitter_id: i64,

    #[validate(range(min = 1, message = "must be a positive integer"))]
    pub pet_id: i64,

    #[validate(range(min = 1, message = "must be a positive integer"))]
    pub service_id: i64,

    /// RFC 3339
    pub start_time: DateTime<Utc>,

    pub end_time: DateTime<Utc>,
}

pub async fn create_booking(
    State(state): State<AppState>,
    auth: AuthContext,
    ValidatedJson(req): ValidatedJson<CreateBookingRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    require_role(&auth, &[Role::Owner, Role::Admin])?;

    let owner_id = req.owner_id.unwrap_or(auth.user_id);
    require_self_or_admin(&auth, owner_id)?;

    if req.end_time > req.start_time {
        validate_duration(req.start_time, req.end_time).map_err(ApiError::BadRequest)?;
    }

    let booking = state
        .services
        .bookings
        .create(CreateBooking {
            owner_id,
            sitter_id: req.sitter_id,
            pet_id: req.pet_id,
            service_id: req.service_id,
            start_time: req.start_time,
            end_time: req.end_time,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "booking created successfully",
            "booking_id": booking.id,
        })),
    ))
}

/// Visible to the booking's owner, its sitter and admins
pub async fn get_booking(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
) -> ApiResult<Json<Booking>> {
    let id = parse_id(id, "id")?;
    let booking = state.services.bookings.get(id).await?;

    if !auth.is_admin() && auth.user_id != booking.owner_id && auth.user_id != booking.sitter_id {
        return Err(ApiError::Forbidden(
            "Not authorized to access this resource".to_string(),
        ));
    }

    Ok(Json(booking))
}

pub async fn confirm_booking(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    transition(&state, &auth, id, BookingStatus::Confirmed).await?;
    Ok(Json(json!({ "message": "booking confirmed" })))
}

pub async fn cancel_booking(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    transition(&state, &auth, id, BookingStatus::Cancelled).await?;
    Ok(Json(json!({ "message": "booking cancelled" })))
}

pub async fn complete_booking(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    transition(&state, &auth, id, BookingStatus::Completed).await?;
    Ok(Json(json!({ "message": "booking completed" })))
}

pub async fn list_owner_bookings(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(owner_id): Path<i64>,
) -> ApiResult<Json<Vec<Booking>>> {
    let owner_id = parse_id(owner_id, "owner_id")?;
    require_self_or_admin(&auth, owner_id)?;

    Ok(Json(state.services.bookings.list_by_owner(owner_id).await?))
}

pub async fn list_sitter_bookings(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(sitter_id): Path<i64>,
) -> ApiResult<Json<Vec<Booking>>> {
    let sitter_id = parse_id(sitter_id, "sitter_id")?;
    require_self_or_admin(&auth, sitter_id)?;

    Ok(Json(state.services.bookings.list_by_sitter(sitter_id).await?))
}

async fn transition(
    state: &AppState,
    auth: &AuthContext,
    id: i64,
    target: BookingStatus,
) -> ApiResult<Booking> {
    let id = parse_id(id, "id")?;
    let bookings = &state.services.bookings;

    bookings.authorize_transition(auth, id, target).await?;

    let booking = match target {
        BookingStatus::Confirmed => bookings.confirm(id).await?,
        BookingStatus::Completed => bookings.complete(id).await?,
        BookingStatus::Cancelled => bookings.cancel(id).await?,
        BookingStatus::Pending => {
            return Err(ApiError::BadRequest(
                "bookings cannot return to pending".to_string(),
            ))
        }
    };

    Ok(booking)
}
