/// Sitter service endpoints
///
/// - `POST   /api/services` - Calling sitter publishes a service
/// - `GET    /api/services/search?type=&location=` - Approved sitters only
/// - `GET    /api/services/:id`
/// - `PUT    /api/services/:id` - Owning sitter or admin
/// - `DELETE /api/services/:id` - Owning sitter or admin
/// - `GET    /api/sitters/:id/services`

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{parse_id, Path, Query, ValidatedJson},
};
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use pawsit_shared::{
    auth::middleware::AuthContext,
    models::offering::{
        Offering, OfferingListing, OfferingSearch, SearchParams, ServiceType, UpdateOffering,
    },
};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

/// Create/update service request
#[derive(Debug, Deserialize, Validate)]
pub struct OfferingRequest {
    /// walking, boarding or home-care
    #[serde(rename = "type")]
    pub service_type: ServiceType,

    #[validate(range(exclusive_min = 0.0, message = "must be greater than 0"))]
    pub price_per_hour: f64,

    #[serde(default)]
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub description: String,
}

impl From<OfferingRequest> for UpdateOffering {
    fn from(req: OfferingRequest) -> Self {
        UpdateOffering {
            service_type: req.service_type,
            price_per_hour: req.price_per_hour,
            description: req.description,
        }
    }
}

pub async fn create_offering(
    State(state): State<AppState>,
    auth: AuthContext,
    ValidatedJson(req): ValidatedJson<OfferingRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let offering = state.services.offerings.create(&auth, req.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "service created successfully",
            "service_id": offering.id,
        })),
    ))
}

pub async fn get_offering(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Offering>> {
    let id = parse_id(id, "id")?;
    Ok(Json(state.services.offerings.get(id).await?))
}

pub async fn update_offering(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<OfferingRequest>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(id, "id")?;
    state.services.offerings.update(&auth, id, req.into()).await?;

    Ok(Json(json!({ "message": "service updated successfully" })))
}

pub async fn delete_offering(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(id, "id")?;
    state.services.offerings.delete(&auth, id).await?;

    Ok(Json(json!({ "message": "service deleted successfully" })))
}

pub async fn list_sitter_offerings(
    State(state): State<AppState>,
    Path(sitter_id): Path<i64>,
) -> ApiResult<Json<Vec<Offering>>> {
    let sitter_id = parse_id(sitter_id, "sitter_id")?;
    Ok(Json(state.services.offerings.list_by_sitter(sitter_id).await?))
}

/// Search by optional `type` and `location` (case-insensitive substring)
pub async fn search_offerings(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<OfferingListing>>> {
    let filter =
        OfferingSearch::try_from(params).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    Ok(Json(state.services.offerings.search(&filter).await?))
}
