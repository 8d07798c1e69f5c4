/// Authorization policy checks
///
/// Authentication only proves who the caller is. These helpers decide what
/// the caller may do and are called by services and handlers before acting:
///
/// - [`require_role`]: caller's role is one of a set
/// - [`require_self_or_admin`]: caller is the resource owner, or an admin
///
/// # Example
///
/// ```
/// use pawsit_shared::auth::authorization::{require_role, require_self_or_admin};
/// use pawsit_shared::auth::middleware::AuthContext;
/// use pawsit_shared::models::user::Role;
///
/// let owner = AuthContext::new(1, Role::Owner);
/// assert!(require_role(&owner, &[Role::Owner]).is_ok());
/// assert!(require_role(&owner, &[Role::Admin]).is_err());
/// assert!(require_self_or_admin(&owner, 1).is_ok());
/// assert!(require_self_or_admin(&owner, 2).is_err());
/// ```

use super::middleware::AuthContext;
use crate::models::user::Role;

/// Error type for authorization checks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    #[error("Role '{actual}' is not allowed to perform this action")]
    InsufficientRole { actual: Role },

    #[error("Not authorized to access this resource")]
    NotAuthorized,
}

/// Requires the caller's role to be one of `allowed`
pub fn require_role(ctx: &AuthContext, allowed: &[Role]) -> Result<(), AuthzError> {
    if allowed.contains(&ctx.role) {
        Ok(())
    } else {
        Err(AuthzError::InsufficientRole { actual: ctx.role })
    }
}

/// Requires the caller to be `owner_id` or an admin
pub fn require_self_or_admin(ctx: &AuthContext, owner_id: i64) -> Result<(), AuthzError> {
    if ctx.user_id == owner_id || ctx.is_admin() {
        Ok(())
    } else {
        Err(AuthzError::NotAuthorized)
    }
}

/// Requires the caller to be one of `participants` or an admin
pub fn require_any_of_or_admin(ctx: &AuthContext, participants: &[i64]) -> Result<(), AuthzError> {
    if ctx.is_admin() || participants.contains(&ctx.user_id) {
        Ok(())
    } else {
        Err(AuthzError::NotAuthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_role() {
        let admin = AuthContext::new(1, Role::Admin);
        let sitter = AuthContext::new(2, Role::Sitter);

        assert!(require_role(&admin, &[Role::Admin]).is_ok());
        assert!(require_role(&sitter, &[Role::Owner, Role::Sitter]).is_ok());
        assert_eq!(
            require_role(&sitter, &[Role::Admin]),
            Err(AuthzError::InsufficientRole {
                actual: Role::Sitter
            })
        );
    }

    #[test]
    fn test_require_self_or_admin() {
        let owner = AuthContext::new(5, Role::Owner);
        let admin = AuthContext::new(1, Role::Admin);

        assert!(require_self_or_admin(&owner, 5).is_ok());
        assert_eq!(require_self_or_admin(&owner, 6), Err(AuthzError::NotAuthorized));
        assert!(require_self_or_admin(&admin, 6).is_ok());
    }

    #[test]
    fn test_require_any_of_or_admin() {
        let sitter = AuthContext::new(2, Role::Sitter);
        let stranger = AuthContext::new(9, Role::Owner);

        assert!(require_any_of_or_admin(&sitter, &[1, 2]).is_ok());
        assert!(require_any_of_or_admin(&stranger, &[1, 2]).is_err());
        assert!(require_any_of_or_admin(&AuthContext::new(3, Role::Admin), &[1, 2]).is_ok());
    }
}
