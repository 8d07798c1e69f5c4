/// Pet registry
///
/// Owners manage their own pets. Admins can edit or remove any pet.

use std::sync::Arc;

use tracing::info;

use crate::auth::authorization::{require_role, require_self_or_admin};
use crate::auth::middleware::AuthContext;
use crate::error::{ServiceError, ServiceResult};
use crate::models::pet::{is_allowed_species, CreatePet, Pet, UpdatePet, ALLOWED_SPECIES};
use crate::models::user::Role;
use crate::repository::PetRepository;

#[derive(Clone)]
pub struct PetService {
    pets: Arc<dyn PetRepository>,
}

impl PetService {
    pub fn new(pets: Arc<dyn PetRepository>) -> Self {
        Self { pets }
    }

    /// Registers a pet owned by the caller
    pub async fn create(&self, ctx: &AuthContext, fields: UpdatePet) -> ServiceResult<Pet> {
        require_role(ctx, &[Role::Owner, Role::Admin])?;
        let fields = validate(fields)?;

        let pet = self
            .pets
            .create(CreatePet {
                owner_id: ctx.user_id,
                name: fields.name,
                species: fields.species,
                age: fields.age,
                notes: fields.notes,
            })
            .await?;

        info!(pet_id = pet.id, owner_id = pet.owner_id, "Pet registered");
        Ok(pet)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Pet> {
        self.pets
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("pet"))
    }

    pub async fn list_by_owner(&self, owner_id: i64) -> ServiceResult<Vec<Pet>> {
        Ok(self.pets.list_by_owner(owner_id).await?)
    }

    pub async fn update(
        &self,
        ctx: &AuthContext,
        id: i64,
        fields: UpdatePet,
    ) -> ServiceResult<Pet> {
        let pet = self.get(id).await?;
        require_self_or_admin(ctx, pet.owner_id)?;
        let fields = validate(fields)?;

        self.pets
            .update(id, fields)
            .await?
            .ok_or_else(|| ServiceError::not_found("pet"))
    }

    pub async fn delete(&self, ctx: &AuthContext, id: i64) -> ServiceResult<()> {
        let pet = self.get(id).await?;
        require_self_or_admin(ctx, pet.owner_id)?;

        if !self.pets.delete(id).await? {
            return Err(ServiceError::not_found("pet"));
        }

        info!(pet_id = id, "Pet removed");
        Ok(())
    }
}

fn validate(mut fields: UpdatePet) -> ServiceResult<UpdatePet> {
    fields.name = fields.name.trim().to_string();
    if fields.name.is_empty() {
        return Err(ServiceError::Validation("name is required".to_string()));
    }

    if !is_allowed_species(&fields.species) {
        return Err(ServiceError::Validation(format!(
            "species must be one of: {}",
            ALLOWED_SPECIES.join(", ")
        )));
    }
    fields.species = fields.species.trim().to_lowercase();

    if fields.age < 0 {
        return Err(ServiceError::Validation("age cannot be negative".to_string()));
    }

    Ok(fields)
}
