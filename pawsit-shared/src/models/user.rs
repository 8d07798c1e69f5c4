/// User model
///
/// Every account (owner, sitter or admin) is a row in `users`. Sitters get an
/// additional row in `sitters` sharing the same id.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     full_name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     phone VARCHAR(50) NOT NULL DEFAULT '',
///     password_hash VARCHAR(255) NOT NULL,
///     role VARCHAR(16) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::string_enum;

/// Account role, carried in the JWT `role` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Registers pets and books sitters
    Owner,

    /// Offers pet-care services once approved
    Sitter,

    /// Approves sitters and manages users
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Owner, Role::Sitter, Role::Admin];

    /// Converts role to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Sitter => "sitter",
            Role::Admin => "admin",
        }
    }
}

string_enum!(Role, "role");

/// Checks a Kazakhstan mobile number: `+7` followed by exactly ten digits
pub fn validate_phone(phone: &str) -> Result<(), String> {
    let valid = phone
        .strip_prefix("+7")
        .is_some_and(|rest| rest.len() == 10 && rest.bytes().all(|b| b.is_ascii_digit()));

    if !valid {
        return Err("phone must be +7 followed by 10 digits".to_string());
    }
    Ok(())
}

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: i64,

    /// Display name
    pub full_name: String,

    /// Email address, unique across all users
    pub email: String,

    /// Contact phone number
    pub phone: String,

    /// Argon2id password hash, never serialized in responses
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Account role
    #[sqlx(try_from = "String")]
    pub role: Role,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    /// Argon2id hash (NOT the plaintext password)
    pub password_hash: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!("owner".parse::<Role>().unwrap(), Role::Owner);
        assert_eq!("Sitter".parse::<Role>().unwrap(), Role::Sitter);
        assert_eq!(Role::try_from("admin".to_string()).unwrap(), Role::Admin);
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: 1,
            full_name: "Ada Owner".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+77011234567".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: Role::Owner,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2id"));
        assert!(json.contains("\"role\":\"owner\""));
    }

    #[test]
    fn test_phone_format() {
        assert!(validate_phone("+77011234567").is_ok());
        assert!(validate_phone("87011234567").is_err());
        assert!(validate_phone("+7701123456").is_err());
        assert!(validate_phone("+770112345678").is_err());
        assert!(validate_phone("+7701-123-456").is_err());
        assert!(validate_phone("555-0100").is_err());
        assert!(validate_phone("").is_err());
    }
}
