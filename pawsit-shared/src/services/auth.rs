/// Registration and login
///
/// Emails are trimmed and lowercased before storage and lookup. Login fails
/// with the same message for an unknown email and a wrong password.

use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::jwt::{create_token, Claims};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{ServiceError, ServiceResult};
use crate::models::sitter::{CreateSitterProfile, Sitter};
use crate::models::user::{validate_phone, CreateUser, Role, User};
use crate::repository::UserRepository;

const BAD_CREDENTIALS: &str = "incorrect email or password";

/// Account fields shared by owner and sitter registration
#[derive(Debug, Clone)]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

/// Successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub token: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt_secret: Arc<str>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt_secret: impl Into<Arc<str>>) -> Self {
        Self {
            users,
            jwt_secret: jwt_secret.into(),
        }
    }

    /// Registers a pet owner
    pub async fn register_owner(&self, registration: Registration) -> ServiceResult<User> {
        let data = self.prepare(registration, Role::Owner)?;
        let user = self.users.create(data).await?;

        info!(user_id = user.id, "Owner registered");
        Ok(user)
    }

    /// Registers a sitter with a `pending` profile
    pub async fn register_sitter(
        &self,
        registration: Registration,
        profile: CreateSitterProfile,
    ) -> ServiceResult<(User, Sitter)> {
        if profile.experience_years < 0 {
            return Err(ServiceError::Validation(
                "experience_years cannot be negative".to_string(),
            ));
        }
        if profile.location.trim().is_empty() {
            return Err(ServiceError::Validation("location is required".to_string()));
        }

        let data = self.prepare(registration, Role::Sitter)?;
        let (user, sitter) = self.users.create_sitter(data, profile).await?;

        info!(user_id = user.id, location = %sitter.location, "Sitter registered");
        Ok((user, sitter))
    }

    /// Verifies credentials and issues a 72 h token
    pub async fn login(&self, email: &str, password: &str) -> ServiceResult<LoginOutcome> {
        let email = normalize_email(email);

        let Some(user) = self.users.find_by_email(&email).await? else {
            warn!("Login attempt for unknown email");
            return Err(ServiceError::Unauthorized(BAD_CREDENTIALS.to_string()));
        };

        if !verify_password(password, &user.password_hash)? {
            warn!(user_id = user.id, "Login attempt with wrong password");
            return Err(ServiceError::Unauthorized(BAD_CREDENTIALS.to_string()));
        }

        let token = create_token(&Claims::new(user.id, user.role), &self.jwt_secret)?;

        info!(user_id = user.id, role = %user.role, "User logged in");
        Ok(LoginOutcome { user, token })
    }

    fn prepare(&self, registration: Registration, role: Role) -> ServiceResult<CreateUser> {
        validate_password_strength(&registration.password).map_err(ServiceError::Validation)?;

        let full_name = registration.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(ServiceError::Validation("full_name is required".to_string()));
        }

        let phone = registration.phone.trim().to_string();
        validate_phone(&phone).map_err(ServiceError::Validation)?;

        Ok(CreateUser {
            full_name,
            email: normalize_email(&registration.email),
            phone,
            password_hash: hash_password(&registration.password)?,
            role,
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::validate_token;
    use crate::models::sitter::SitterStatus;
    use crate::repository::memory::InMemoryStore;

    const SECRET: &str = "test-secret-key-that-is-long-enough";

    fn service() -> AuthService {
        AuthService::new(Arc::new(InMemoryStore::new()), SECRET)
    }

    fn registration(email: &str) -> Registration {
        Registration {
            full_name: "Ada Owner".to_string(),
            email: email.to_string(),
            phone: "+77011234567".to_string(),
            password: "walkies123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let auth = service();

        let user = auth
            .register_owner(registration(" Ada@Example.com "))
            .await
            .unwrap();
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.role, Role::Owner);
        assert_ne!(user.password_hash, "walkies123");

        let outcome = auth.login("ADA@example.com", "walkies123").await.unwrap();
        assert_eq!(outcome.user.id, user.id);

        let claims = validate_token(&outcome.token, SECRET).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, Role::Owner);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let auth = service();
        auth.register_owner(registration("ada@example.com"))
            .await
            .unwrap();

        let err = auth
            .register_owner(registration("ADA@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_login_failures_look_the_same() {
        let auth = service();
        auth.register_owner(registration("ada@example.com"))
            .await
            .unwrap();

        let wrong_password = auth.login("ada@example.com", "nope12345").await.unwrap_err();
        let unknown_email = auth.login("bob@example.com", "walkies123").await.unwrap_err();

        assert!(matches!(wrong_password, ServiceError::Unauthorized(_)));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_weak_password_is_rejected() {
        let auth = service();
        let mut weak = registration("ada@example.com");
        weak.password = "password".to_string();

        let err = auth.register_owner(weak).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_phone_must_be_kazakh_mobile() {
        let auth = service();

        for phone in ["", "555-0100", "+7701123456"] {
            let mut bad = registration("ada@example.com");
            bad.phone = phone.to_string();
            let err = auth.register_owner(bad).await.unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)), "{phone:?}");
        }

        let mut spaced = registration("ada@example.com");
        spaced.phone = " +77011234567 ".to_string();
        let user = auth.register_owner(spaced).await.unwrap();
        assert_eq!(user.phone, "+77011234567");
    }

    #[tokio::test]
    async fn test_register_sitter_starts_pending() {
        let auth = service();
        let profile = CreateSitterProfile {
            experience_years: 4,
            location: "Almaty".to_string(),
            ..Default::default()
        };

        let (user, sitter) = auth
            .register_sitter(registration("sam@example.com"), profile)
            .await
            .unwrap();
        assert_eq!(user.role, Role::Sitter);
        assert_eq!(sitter.id, user.id);
        assert_eq!(sitter.status, SitterStatus::Pending);

        let negative = CreateSitterProfile {
            experience_years: -1,
            location: "Almaty".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            auth.register_sitter(registration("pat@example.com"), negative)
                .await
                .unwrap_err(),
            ServiceError::Validation(_)
        ));
    }
}
