/// Business logic for Pawsit
///
/// Each service owns the rules for one area and talks to storage only
/// through the repository traits, so the same code runs against PostgreSQL
/// in production and [`crate::repository::memory::InMemoryStore`] in tests.
///
/// - `auth`: registration and login
/// - `pet`: pet registry
/// - `offering`: sitter services and search
/// - `booking`: booking lifecycle and stale-booking expiry
/// - `review`: reviews and rating summaries
/// - `sitter`: public sitter profiles
/// - `admin`: sitter approval and user management

pub mod admin;
pub mod auth;
pub mod booking;
pub mod offering;
pub mod pet;
pub mod review;
pub mod sitter;

use std::sync::Arc;

use sqlx::PgPool;

use crate::repository::postgres::{
    PgBookingRepository, PgOfferingRepository, PgPetRepository, PgReviewRepository,
    PgSitterRepository, PgUserRepository,
};
use crate::repository::{
    BookingRepository, OfferingRepository, PetRepository, ReviewRepository, SitterRepository,
    UserRepository,
};

pub use admin::AdminService;
pub use auth::AuthService;
pub use booking::BookingService;
pub use offering::OfferingService;
pub use pet::PetService;
pub use review::ReviewService;
pub use sitter::SitterService;

/// Every service wired to one set of repositories
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub pets: PetService,
    pub offerings: OfferingService,
    pub bookings: BookingService,
    pub reviews: ReviewService,
    pub sitters: SitterService,
    pub admin: AdminService,
}

impl Services {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sitters: Arc<dyn SitterRepository>,
        pets: Arc<dyn PetRepository>,
        offerings: Arc<dyn OfferingRepository>,
        bookings: Arc<dyn BookingRepository>,
        reviews: Arc<dyn ReviewRepository>,
        jwt_secret: &str,
    ) -> Self {
        Self {
            auth: AuthService::new(users.clone(), jwt_secret),
            pets: PetService::new(pets.clone()),
            offerings: OfferingService::new(offerings.clone(), sitters.clone()),
            bookings: BookingService::new(bookings.clone(), pets, offerings, sitters.clone()),
            reviews: ReviewService::new(reviews, bookings),
            sitters: SitterService::new(sitters.clone()),
            admin: AdminService::new(users, sitters),
        }
    }

    /// Services backed by PostgreSQL
    pub fn postgres(pool: PgPool, jwt_secret: &str) -> Self {
        Self::new(
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgSitterRepository::new(pool.clone())),
            Arc::new(PgPetRepository::new(pool.clone())),
            Arc::new(PgOfferingRepository::new(pool.clone())),
            Arc::new(PgBookingRepository::new(pool.clone())),
            Arc::new(PgReviewRepository::new(pool)),
            jwt_secret,
        )
    }

    /// Services sharing one in-memory store
    #[cfg(any(test, feature = "test-utils"))]
    pub fn in_memory(store: crate::repository::memory::InMemoryStore, jwt_secret: &str) -> Self {
        let store = Arc::new(store);
        Self::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            jwt_secret,
        )
    }
}
