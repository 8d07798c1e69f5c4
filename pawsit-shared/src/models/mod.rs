/// Domain models for Pawsit
///
/// This module contains the entities stored in PostgreSQL together with the
/// input structs used to create and update them. Persistence lives in
/// [`crate::repository`]; business rules live in [`crate::services`].
///
/// # Models
///
/// - `user`: Accounts for owners, sitters and admins
/// - `sitter`: Sitter profiles awaiting or holding admin approval
/// - `pet`: Pets registered by owners
/// - `offering`: Services offered by sitters (walking, boarding, home-care)
/// - `booking`: Reservations and their status lifecycle
/// - `review`: Ratings left by owners on bookings
///
/// # Enumerations
///
/// Status and role columns are stored as lowercase `VARCHAR` values guarded by
/// `CHECK` constraints. Each enum provides `as_str()` for binding and a
/// `TryFrom<String>` impl so rows decode straight into the typed value.

pub mod booking;
pub mod offering;
pub mod pet;
pub mod review;
pub mod sitter;
pub mod user;

/// Error returned when a stored or submitted value is not a known variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {kind}: '{value}'")]
pub struct ParseEnumError {
    /// Name of the enumeration being parsed (e.g. "booking status")
    pub kind: &'static str,

    /// The rejected input
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Implements `Display`, `FromStr` and `TryFrom<String>` for a string-backed enum
///
/// The enum must provide `as_str(&self) -> &'static str` and an `ALL` constant
/// listing every variant.
macro_rules! string_enum {
    ($ty:ty, $kind:literal) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = $crate::models::ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_ascii_lowercase();
                <$ty>::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == normalized)
                    .ok_or_else(|| $crate::models::ParseEnumError::new($kind, s))
            }
        }

        impl TryFrom<String> for $ty {
            type Error = $crate::models::ParseEnumError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

pub(crate) use string_enum;
