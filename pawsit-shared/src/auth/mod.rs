/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and strength checks
/// - [`jwt`]: Token issuing and HMAC-family validation
/// - [`middleware`]: Axum bearer-token middleware and the [`middleware::AuthContext`] extractor
/// - [`authorization`]: Role and ownership policy checks
///
/// # Example
///
/// ```no_run
/// use pawsit_shared::auth::password::{hash_password, verify_password};
/// use pawsit_shared::auth::jwt::{create_token, Claims};
/// use pawsit_shared::models::user::Role;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("Walkies2024")?;
/// assert!(verify_password("Walkies2024", &hash)?);
///
/// let token = create_token(&Claims::new(1, Role::Owner), "secret-key-at-least-32-bytes-long")?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
