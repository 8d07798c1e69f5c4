/// Pet model
///
/// Pets belong to exactly one owner. Only that owner may update or delete
/// them; the check happens in [`crate::services::pet::PetService`].

use serde::{Deserialize, Serialize};

/// Species accepted at registration
pub const ALLOWED_SPECIES: [&str; 6] = ["dog", "cat", "bird", "rat", "reptile", "other"];

/// Returns true when `species` is one of [`ALLOWED_SPECIES`] (case-insensitive)
pub fn is_allowed_species(species: &str) -> bool {
    let species = species.trim().to_ascii_lowercase();
    ALLOWED_SPECIES.contains(&species.as_str())
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Pet {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub species: String,
    pub age: i32,
    pub notes: String,
}

#[derive(Debug, Clone)]
pub struct CreatePet {
    pub owner_id: i64,
    pub name: String,
    pub species: String,
    pub age: i32,
    pub notes: String,
}

/// Full replacement of the mutable pet fields
#[derive(Debug, Clone)]
pub struct UpdatePet {
    pub name: String,
    pub species: String,
    pub age: i32,
    pub notes: String,
}
