/// Service-layer errors
///
/// Every service returns [`ServiceError`]. The API crate maps each variant to
/// an HTTP status; the message is safe to show to callers except for
/// `Internal`, whose detail is only logged.

use crate::auth::authorization::AuthzError;
use crate::auth::jwt::JwtError;
use crate::auth::password::PasswordError;
use crate::repository::RepoError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Input failed a business rule (bad window, rating out of range, ...)
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// The resource is in a state that forbids the operation
    #[error("{0}")]
    Conflict(String),

    /// A unique value is already taken
    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn not_found(what: &str) -> Self {
        ServiceError::NotFound(format!("{} not found", what))
    }
}

impl From<RepoError> for ServiceError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => ServiceError::NotFound("record not found".to_string()),
            RepoError::Conflict(constraint) => match constraint.as_str() {
                "users_email_key" => {
                    ServiceError::Duplicate("email already registered".to_string())
                }
                "reviews_booking_id_key" => {
                    ServiceError::Conflict("booking already has a review".to_string())
                }
                "bookings_no_overlap" => ServiceError::Conflict(
                    "sitter already has a booking in this time window".to_string(),
                ),
                other => ServiceError::Conflict(format!("duplicate value violates {}", other)),
            },
            RepoError::MissingReference(constraint) => {
                ServiceError::NotFound(format!("referenced record not found ({})", constraint))
            }
            RepoError::Database(e) => ServiceError::Internal(e.to_string()),
        }
    }
}

impl From<AuthzError> for ServiceError {
    fn from(err: AuthzError) -> Self {
        ServiceError::Forbidden(err.to_string())
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

impl From<JwtError> for ServiceError {
    fn from(err: JwtError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}
