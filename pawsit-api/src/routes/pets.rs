/// Pet endpoints
///
/// - `POST   /api/pets` - Register a pet for the caller
/// - `GET    /api/pets/:id`
/// - `PUT    /api/pets/:id` - Owner or admin
/// - `DELETE /api/pets/:id` - Owner or admin
/// - `GET    /api/owners/:id/pets`

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
    models::pet::{Pet, UpdatePet},
};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

/// Create/update pet request
#[derive(Debug, Deserialize, Validate)]
pub struct PetRequest {
    #[validate(length(min = 1, max = 100, message = "must be 1 to 100 characters"))]
    pub name: String,

    /// One of dog, cat, bird, rat, reptile, other
    pub species: String,

    #[validate(range(min = 0, max = 100, message = "must be between 0 and 100"))]
    pub age: i32,

    #[serde(default)]
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub notes: String,
}

impl From<PetRequest> for UpdatePet {
    fn from(req: PetRequest) -> Self {
        UpdatePet {
            name: req.name,
            species: req.species,
            age: req.age,
            notes: req.notes,
        }
    }
}

pub async fn create_pet(
    State(state): State<AppState>,
    auth: AuthContext,
    ValidatedJson(req): ValidatedJson<PetRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let pet = state.services.pets.create(&auth, req.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "pet created successfully",
            "pet_id": pet.id,
        })),
    ))
}

pub async fn get_pet(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Pet>> {
    let id = parse_id(id, "id")?;
    Ok(Json(state.services.pets.get(id).await?))
}

pub async fn update_pet(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<PetRequest>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(id, "id")?;
    state.services.pets.update(&auth, id, req.into()).await?;

    Ok(Json(json!({ "message": "pet updated successfully" })))
}

pub async fn delete_pet(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(id, "id")?;
    state.services.pets.delete(&auth, id).await?;

    Ok(Json(json!({ "message": "pet deleted successfully" })))
}

pub async fn list_owner_pets(
    State(state): State<AppState>,
    Path(owner_id): Path<i64>,
) -> ApiResult<Json<Vec<Pet>>> {
    let owner_id = parse_id(owner_id, "owner_id")?;
    Ok(Json(state.services.pets.list_by_owner(owner_id).await?))
}
