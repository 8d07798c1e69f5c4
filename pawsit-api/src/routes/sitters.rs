/// Public sitter profile
///
/// - `GET /api/sitters/:id` - Approved sitters with rating and review count

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{parse_id, Path},
};
use axum::{extract::State, Json};
use pawsit_shared::models::sitter::SitterDetails;

pub async fn get_sitter(
    State(state): State<AppState>,
    Path(sitter_id): Path<i64>,
) -> ApiResult<Json<SitterDetails>> {
    let sitter_id = parse_id(sitter_id, "sitter_id")?;
    Ok(Json(state.services.sitters.public_profile(sitter_id).await?))
}
