/// Password hashing module using Argon2id
///
/// # Security
///
/// - **Algorithm**: Argon2id, PHC string output with a random 16-byte salt
/// - **Memory**: 19 MiB (19456 KiB)
/// - **Iterations**: 2 passes
/// - **Parallelism**: 1 lane
///
/// Verification reads the parameters back from the stored hash, so hashes
/// created with older parameters keep verifying.
///
/// # Example
///
/// ```
/// use pawsit_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("Walkies2024")?;
/// assert!(verify_password("Walkies2024", &hash)?);
/// assert!(!verify_password("walkies2024", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

/// Shortest accepted password
pub const MIN_PASSWORD_LEN: usize = 8;

/// Longest accepted password
pub const MAX_PASSWORD_LEN: usize = 72;

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashError(String),

    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Hashes a password using Argon2id
///
/// Returns the PHC string, e.g. `$argon2id$v=19$m=19456,t=2,p=1$<salt>$<hash>`.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(19456)
        .t_cost(2)
        .p_cost(1)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verifies a password against a stored hash
///
/// `Ok(false)` means the password is wrong; `Err` means the hash itself is
/// unusable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
    }
}

/// Validates password strength at registration
///
/// Requires 8 to 72 characters with at least one letter and one digit.
pub fn validate_password_strength(password: &str) -> Result<(), String> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        ));
    }

    if len > MAX_PASSWORD_LEN {
        return Err(format!(
            "Password must be at most {} characters long",
            MAX_PASSWORD_LEN
        ));
    }

    if !password.chars().any(|c| c.is_alphabetic()) {
        return Err("Password must contain at least one letter".to_string());
    }

    if !password.chars().any(|c| c.is_numeric()) {
        return Err("Password must contain at least one digit".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let hash = hash_password("Walkies2024").expect("Hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("v=19"));
        assert!(hash.contains("m=19456"));
        assert!(hash.contains("t=2"));
        assert!(hash.contains("p=1"));
    }

    #[test]
    fn test_hash_password_produces_different_salts() {
        let hash1 = hash_password("same_password1").unwrap();
        let hash2 = hash_password("same_password1").unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("correct_password1").unwrap();

        assert!(verify_password("correct_password1", &hash).unwrap());
        assert!(!verify_password("wrong_password1", &hash).unwrap());
        assert!(!verify_password("", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(verify_password("password", "invalid_hash").is_err());
        assert!(verify_password("password", "$argon2id$invalid").is_err());
    }

    #[test]
    fn test_validate_password_strength() {
        assert!(validate_password_strength("Walkies2024").is_ok());
        assert!(validate_password_strength("пароль2024").is_ok());

        let short = validate_password_strength("abc12");
        assert!(short.unwrap_err().contains("at least 8"));

        let long = "a1".repeat(40);
        assert!(validate_password_strength(&long).unwrap_err().contains("at most 72"));

        assert!(validate_password_strength("12345678").unwrap_err().contains("letter"));
        assert!(validate_password_strength("abcdefgh").unwrap_err().contains("digit"));
    }
}
