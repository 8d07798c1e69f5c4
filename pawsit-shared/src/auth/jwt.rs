/// JWT token generation and validation module
///
/// Tokens are issued at login and carry the user id and role. They are
/// signed with HS256; validation accepts any algorithm of the HMAC family
/// (HS256, HS384, HS512) and rejects everything else, including `none` and
/// asymmetric algorithms presented with the shared secret.
///
/// # Security
///
/// - **Expiration**: 72 hours, no refresh tokens
/// - **Validation**: Signature, algorithm family, expiration, not-before and issuer
/// - **Secret Management**: Secrets should be at least 32 bytes (256 bits)
///
/// # Example
///
/// ```
/// use pawsit_shared::auth::jwt::{create_token, validate_token, Claims};
/// use pawsit_shared::models::user::Role;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new(42, Role::Owner);
/// let token = create_token(&claims, "your-secret-key-at-least-32-bytes")?;
///
/// let validated = validate_token(&token, "your-secret-key-at-least-32-bytes")?;
/// assert_eq!(validated.sub, 42);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::user::Role;

/// Issuer claim written into and required from every token
pub const ISSUER: &str = "pawsit";

/// Algorithms accepted on validation
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Lifetime of an issued token
pub fn token_lifetime() -> Duration {
    Duration::hours(72)
}

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Signed with an algorithm outside the HMAC family
    #[error("Unsupported signing algorithm")]
    InvalidAlgorithm,
}

/// JWT claims structure
///
/// - `sub`: user id
/// - `role`: account role at issue time
/// - `iss`: always "pawsit"
/// - `iat` / `nbf` / `exp`: Unix timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub role: Role,
    pub iss: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

impl Claims {
    /// Creates claims expiring after [`token_lifetime`]
    pub fn new(user_id: i64, role: Role) -> Self {
        Self::with_expiration(user_id, role, token_lifetime())
    }

    /// Creates claims with custom expiration
    pub fn with_expiration(user_id: i64, role: Role, expires_in: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            role,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Checks if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Creates an HS256 token from claims
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a token and extracts claims
///
/// Verifies the signature with `secret`, that the header algorithm is one
/// of HS256/HS384/HS512, that the token is within its `nbf`..`exp` window
/// and that the issuer is "pawsit".
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => JwtError::InvalidAlgorithm,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new(7, Role::Sitter);

        assert_eq!(claims.sub, 7);
        assert_eq!(claims.role, Role::Sitter);
        assert_eq!(claims.iss, "pawsit");
        assert_eq!(claims.exp - claims.iat, 72 * 3600);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_create_and_validate_token() {
        let claims = Claims::new(1, Role::Owner);
        let token = create_token(&claims, SECRET).expect("Should create token");

        let validated = validate_token(&token, SECRET).expect("Should validate token");
        assert_eq!(validated.sub, 1);
        assert_eq!(validated.role, Role::Owner);
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new(1, Role::Owner);
        let token = create_token(&claims, SECRET).unwrap();

        assert!(validate_token(&token, "another-secret-key-at-least-32-bytes").is_err());
    }

    #[test]
    fn test_validate_expired_token() {
        let claims = Claims::with_expiration(1, Role::Owner, Duration::seconds(-3600));
        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).unwrap();
        assert!(matches!(validate_token(&token, SECRET), Err(JwtError::Expired)));
    }

    #[test]
    fn test_accepts_other_hmac_algorithms() {
        let claims = Claims::new(3, Role::Admin);
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let validated = validate_token(&token, SECRET).unwrap();
        assert_eq!(validated.role, Role::Admin);
    }

    #[test]
    fn test_rejects_non_hmac_algorithms() {
        // {"sub":1,"role":"admin","iss":"pawsit","iat":1,"nbf":1,"exp":99999999999}
        let payload = concat!(
            "eyJzdWIiOjEsInJvbGUiOiJhZG1pbiIsImlzcyI6InBhd3NpdCIsImlhdCI6MSwibmJmIjox",
            "LCJleHAiOjk5OTk5OTk5OTk5fQ"
        );

        // {"alg":"none","typ":"JWT"}
        let unsigned = format!("eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.{}.", payload);
        assert!(validate_token(&unsigned, SECRET).is_err());

        // {"alg":"RS256","typ":"JWT"}
        let rsa = format!("eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.{}.c2lnbmF0dXJl", payload);
        assert!(validate_token(&rsa, SECRET).is_err());
    }

    #[test]
    fn test_rejects_wrong_issuer() {
        let mut claims = Claims::new(1, Role::Owner);
        claims.iss = "someone-else".to_string();
        let token = create_token(&claims, SECRET).unwrap();

        assert!(validate_token(&token, SECRET).is_err());
    }
}
