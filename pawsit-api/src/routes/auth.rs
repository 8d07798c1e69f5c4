/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/register/owner` - Register a pet owner
/// - `POST /api/auth/register/sitter` - Register a sitter (pending approval)
/// - `POST /api/auth/login` - Exchange credentials for a 72 h token

use crate::{app::AppState, error::ApiResult, extract::ValidatedJson};
use axum::{extract::State, http::StatusCode, Json};
use pawsit_shared::{
    models::{
        sitter::CreateSitterProfile,
        user::{validate_phone, Role},
    },
    services::auth::Registration,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::{Validate, ValidationError};

fn phone_format(phone: &str) -> Result<(), ValidationError> {
    validate_phone(phone.trim()).map_err(|message| {
        let mut error = ValidationError::new("phone");
        error.message = Some(message.into());
        error
    })
}

/// Owner registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterOwnerRequest {
    #[validate(length(min = 2, max = 100, message = "must be 2 to 100 characters"))]
    pub full_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(function = "phone_format"))]
    pub phone: String,

    /// Strength is checked again by the service
    #[validate(length(min = 8, max = 72, message = "must be 8 to 72 characters"))]
    pub password: String,
}

/// Sitter registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterSitterRequest {
    #[validate(length(min = 2, max = 100, message = "must be 2 to 100 characters"))]
    pub full_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(function = "phone_format"))]
    pub phone: String,

    #[validate(length(min = 8, max = 72, message = "must be 8 to 72 characters"))]
    pub password: String,

    #[validate(range(min = 0, max = 50, message = "must be between 0 and 50"))]
    pub experience_years: i32,

    #[serde(default)]
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub certificates: String,

    #[serde(default)]
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub preferences: String,

    #[validate(length(min = 2, max = 200, message = "must be 2 to 200 characters"))]
    pub location: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user_id: i64,
    pub role: Role,
    pub email: String,
    pub full_name: String,
    pub token: String,
}

/// Register a pet owner
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or weak password
/// - `409 Conflict`: Email already registered
pub async fn register_owner(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterOwnerRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let user = state
        .services
        .auth
        .register_owner(Registration {
            full_name: req.full_name,
            email: req.email,
            phone: req.phone,
            password: req.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "owner registered successfully",
            "user_id": user.id,
        })),
    ))
}

/// Register a sitter
///
/// The profile starts out `pending` and is invisible in search until an
/// admin approves it.
pub async fn register_sitter(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterSitterRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let (user, _) = state
        .services
        .auth
        .register_sitter(
            Registration {
                full_name: req.full_name,
                email: req.email,
                phone: req.phone,
                password: req.password,
            },
            CreateSitterProfile {
                experience_years: req.experience_years,
                certificates: req.certificates,
                preferences: req.preferences,
                location: req.location,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "sitter registered, awaiting approval",
            "user_id": user.id,
        })),
    ))
}

/// Log in
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown email or wrong password (same message)
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let outcome = state
        .services
        .auth
        .login(&req.email, &req.password)
        .await?;

    Ok(Json(LoginResponse {
        message: "login successful".to_string(),
        user_id: outcome.user.id,
        role: outcome.user.role,
        email: outcome.user.email,
        full_name: outcome.user.full_name,
        token: outcome.token,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_owner_validation() {
        let valid = RegisterOwnerRequest {
            full_name: "Ada Owner".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+77011234567".to_string(),
            password: "walkies123".to_string(),
        };
        assert!(valid.validate().is_ok());

        let invalid = RegisterOwnerRequest {
            full_name: "A".to_string(),
            email: "not-an-email".to_string(),
            phone: String::new(),
            password: "short".to_string(),
        };
        let errors = invalid.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("full_name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("phone"));
    }

    #[test]
    fn test_register_sitter_experience_range() {
        let request = RegisterSitterRequest {
            full_name: "Sam Sitter".to_string(),
            email: "sam@example.com".to_string(),
            phone: "+77011234567".to_string(),
            password: "walkies123".to_string(),
            experience_years: 51,
            certificates: String::new(),
            preferences: String::new(),
            location: "Almaty".to_string(),
        };

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("experience_years"));
        assert!(!errors.field_errors().contains_key("phone"));
    }
}
