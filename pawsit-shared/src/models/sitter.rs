/// Sitter profile model
///
/// A sitter is a user with role `sitter` plus a profile row in `sitters`
/// sharing the user's id. New profiles start in `pending` and only an admin
/// can move them to `approved` or `rejected`.
///
/// # Status Machine
///
/// ```text
/// pending → approved
/// pending → rejected
/// ```

use serde::{Deserialize, Serialize};

use super::string_enum;

/// Approval status of a sitter profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SitterStatus {
    /// Awaiting admin review
    Pending,

    /// Bookable
    Approved,

    /// Turned down by an admin
    Rejected,
}

impl SitterStatus {
    pub const ALL: [SitterStatus; 3] = [
        SitterStatus::Pending,
        SitterStatus::Approved,
        SitterStatus::Rejected,
    ];

    /// Converts status to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            SitterStatus::Pending => "pending",
            SitterStatus::Approved => "approved",
            SitterStatus::Rejected => "rejected",
        }
    }
}

string_enum!(SitterStatus, "sitter status");

/// Sitter profile as stored in `sitters`
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Sitter {
    /// Same id as the owning user row
    pub id: i64,

    pub experience_years: i32,

    /// Free-form list of certificates
    pub certificates: String,

    /// Free-form care preferences (pet sizes, species, ...)
    pub preferences: String,

    /// City or area served
    pub location: String,

    #[sqlx(try_from = "String")]
    pub status: SitterStatus,
}

/// Sitter profile joined with the public user fields
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SitterProfile {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub experience_years: i32,
    pub certificates: String,
    pub preferences: String,
    pub location: String,
    #[sqlx(try_from = "String")]
    pub status: SitterStatus,
}

/// Profile plus rating aggregate, shown to admins reviewing an application
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SitterDetails {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub profile: SitterProfile,
    pub rating: f64,
    pub reviews: i64,
}

/// Profile fields submitted at sitter registration
#[derive(Debug, Clone, Default)]
pub struct CreateSitterProfile {
    pub experience_years: i32,
    pub certificates: String,
    pub preferences: String,
    pub location: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sitter_status_roundtrip_names() {
        for status in SitterStatus::ALL {
            assert_eq!(status.as_str().parse::<SitterStatus>().unwrap(), status);
        }
        assert!("banned".parse::<SitterStatus>().is_err());
    }
}
