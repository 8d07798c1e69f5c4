/// Admin endpoints (role `admin` only)
///
/// - `GET    /api/admin/sitters/pending`
/// - `GET    /api/admin/sitters/:id` - Profile, rating and review count
/// - `POST   /api/admin/sitters/:id/approve`
/// - `POST   /api/admin/sitters/:id/reject`
/// - `GET    /api/admin/users`
/// - `GET    /api/admin/users/:id`
/// - `DELETE /api/admin/users/:id`

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{parse_id, Path},
};
use axum::{extract::State, Json};
use pawsit_shared::{
    auth::middleware::AuthContext,
    models::{
        sitter::{SitterDetails, SitterProfile},
        user::User,
    },
};
use serde_json::{json, Value};

pub async fn pending_sitters(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<Vec<SitterProfile>>> {
    Ok(Json(state.services.admin.pending_sitters(&auth).await?))
}

pub async fn sitter_details(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
) -> ApiResult<Json<SitterDetails>> {
    let id = parse_id(id, "id")?;
    Ok(Json(state.services.admin.sitter_details(&auth, id).await?))
}

pub async fn approve_sitter(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(id, "id")?;
    state.services.admin.approve_sitter(&auth, id).await?;

    Ok(Json(json!({ "message": "sitter approved successfully" })))
}

pub async fn reject_sitter(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(id, "id")?;
    state.services.admin.reject_sitter(&auth, id).await?;

    Ok(Json(json!({ "message": "sitter rejected" })))
}

pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.services.admin.list_users(&auth).await?))
}

pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
) -> ApiResult<Json<User>> {
    let id = parse_id(id, "id")?;
    Ok(Json(state.services.admin.get_user(&auth, id).await?))
}

pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(id, "id")?;
    state.services.admin.delete_user(&auth, id).await?;

    Ok(Json(json!({ "message": "user deleted successfully" })))
}
