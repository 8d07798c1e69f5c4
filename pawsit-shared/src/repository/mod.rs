/// Persistence layer
///
/// One trait per domain, each with a PostgreSQL implementation
/// ([`postgres`]) and an in-memory implementation ([`memory`]) used by tests
/// and by dependent crates through the `test-utils` feature.
///
/// Repositories only translate between rows and models. Business rules such
/// as ownership and status checks live in [`crate::services`]; the one
/// exception is the guarded status update, which takes the set of allowed
/// source states so the check and the write happen in one statement.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::booking::{Booking, BookingStatus, CreateBooking};
use crate::models::offering::{
    CreateOffering, Offering, OfferingListing, OfferingSearch, UpdateOffering,
};
use crate::models::pet::{CreatePet, Pet, UpdatePet};
use crate::models::review::{CreateReview, RatingSummary, Review, UpdateReview};
use crate::models::sitter::{
    CreateSitterProfile, Sitter, SitterDetails, SitterProfile, SitterStatus,
};
use crate::models::user::{CreateUser, User};

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod postgres;

/// PostgreSQL error codes mapped to typed repository errors
const UNIQUE_VIOLATION: &str = "23505";
const EXCLUSION_VIOLATION: &str = "23P01";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Repository errors
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Record not found")]
    NotFound,

    /// A unique or exclusion constraint was violated; carries the constraint name
    #[error("Constraint violated: {0}")]
    Conflict(String),

    /// A referenced row does not exist (e.g. the user was deleted while their
    /// token is still valid); carries the constraint name
    #[error("Referenced record missing: {0}")]
    MissingReference(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::RowNotFound = err {
            return RepoError::NotFound;
        }

        if let Some(db_err) = err.as_database_error() {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION | EXCLUSION_VIOLATION) => {
                    return RepoError::Conflict(constraint);
                }
                Some(FOREIGN_KEY_VIOLATION) => return RepoError::MissingReference(constraint),
                _ => {}
            }
        }

        RepoError::Database(err)
    }
}

pub type RepoResult<T> = Result<T, RepoError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user; duplicate email yields [`RepoError::Conflict`]
    async fn create(&self, data: CreateUser) -> RepoResult<User>;

    /// Inserts a sitter user and its `pending` profile atomically
    async fn create_sitter(
        &self,
        user: CreateUser,
        profile: CreateSitterProfile,
    ) -> RepoResult<(User, Sitter)>;

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Newest first
    async fn list(&self) -> RepoResult<Vec<User>>;

    /// Deletes the user and everything referencing it; false if absent
    async fn delete(&self, id: i64) -> RepoResult<bool>;
}

#[async_trait]
pub trait SitterRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Sitter>>;

    async fn find_profile(&self, id: i64) -> RepoResult<Option<SitterProfile>>;

    /// Profile with average rating and review count
    async fn find_details(&self, id: i64) -> RepoResult<Option<SitterDetails>>;

    async fn list_by_status(&self, status: SitterStatus) -> RepoResult<Vec<SitterProfile>>;

    /// Sets `status` only if the current status is in `allowed`
    ///
    /// Returns `None` when no row matched (absent or not in an allowed state).
    async fn update_status(
        &self,
        id: i64,
        status: SitterStatus,
        allowed: &[SitterStatus],
    ) -> RepoResult<Option<Sitter>>;
}

#[async_trait]
pub trait PetRepository: Send + Sync {
    async fn create(&self, data: CreatePet) -> RepoResult<Pet>;

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Pet>>;

    async fn list_by_owner(&self, owner_id: i64) -> RepoResult<Vec<Pet>>;

    async fn update(&self, id: i64, data: UpdatePet) -> RepoResult<Option<Pet>>;

    async fn delete(&self, id: i64) -> RepoResult<bool>;
}

#[async_trait]
pub trait OfferingRepository: Send + Sync {
    async fn create(&self, data: CreateOffering) -> RepoResult<Offering>;

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Offering>>;

    async fn list_by_sitter(&self, sitter_id: i64) -> RepoResult<Vec<Offering>>;

    /// Offerings of approved sitters matching the filters, best rated first
    async fn search(&self, filter: &OfferingSearch) -> RepoResult<Vec<OfferingListing>>;

    async fn update(&self, id: i64, data: UpdateOffering) -> RepoResult<Option<Offering>>;

    async fn delete(&self, id: i64) -> RepoResult<bool>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts a `pending` booking
    async fn create(&self, data: CreateBooking) -> RepoResult<Booking>;

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Booking>>;

    async fn list_by_owner(&self, owner_id: i64) -> RepoResult<Vec<Booking>>;

    async fn list_by_sitter(&self, sitter_id: i64) -> RepoResult<Vec<Booking>>;

    /// True if the sitter has a pending or confirmed booking intersecting
    /// `[start, end)`
    async fn has_overlap(
        &self,
        sitter_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<bool>;

    /// Sets `status` only if the current status is in `allowed`
    ///
    /// Returns `None` when no row matched; callers re-read to tell a missing
    /// booking from an illegal transition.
    async fn transition(
        &self,
        id: i64,
        status: BookingStatus,
        allowed: &[BookingStatus],
    ) -> RepoResult<Option<Booking>>;

    /// Ids of pending bookings starting before `cutoff`
    async fn list_stale_pending(&self, cutoff: DateTime<Utc>) -> RepoResult<Vec<i64>>;
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Inserts a review; a second review for the booking yields
    /// [`RepoError::Conflict`]
    async fn create(&self, data: CreateReview) -> RepoResult<Review>;

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Review>>;

    async fn find_by_booking(&self, booking_id: i64) -> RepoResult<Option<Review>>;

    async fn list_by_sitter(&self, sitter_id: i64) -> RepoResult<Vec<Review>>;

    async fn update(&self, id: i64, data: UpdateReview) -> RepoResult<Option<Review>>;

    async fn delete(&self, id: i64) -> RepoResult<bool>;

    async fn rating_summary(&self, sitter_id: i64) -> RepoResult<RatingSummary>;
}
