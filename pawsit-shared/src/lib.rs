//! # Pawsit Shared Library
//!
//! Domain types, persistence and business logic shared by the Pawsit API
//! server and the booking expiry worker.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `repository`: Storage traits with PostgreSQL and in-memory backends
//! - `services`: Business rules (bookings, reviews, moderation, ...)
//! - `auth`: Passwords, JWT, request authentication and policy checks
//! - `db`: Connection pool and migrations
//! - `error`: Service error type

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

/// Current version of the Pawsit shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
