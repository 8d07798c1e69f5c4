/// In-memory repositories for tests
///
/// [`InMemoryStore`] implements every repository trait over one set of
/// tables behind a mutex, so cascades and joins behave like the PostgreSQL
/// schema. Clones share the same tables.
///
/// The `insert_*` helpers store rows with caller-chosen ids, which lets tests
/// build fixtures such as "owner 1, sitter 2, pet 3, service 4" directly.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{
    BookingRepository, OfferingRepository, PetRepository, RepoError, RepoResult,
    ReviewRepository, SitterRepository, UserRepository,
};
use crate::models::booking::{Booking, BookingStatus, CreateBooking};
use crate::models::offering::{
    CreateOffering, Offering, OfferingListing, OfferingSearch, ServiceType, UpdateOffering,
};
use crate::models::pet::{CreatePet, Pet, UpdatePet};
use crate::models::review::{CreateReview, RatingSummary, Review, UpdateReview};
use crate::models::sitter::{
    CreateSitterProfile, Sitter, SitterDetails, SitterProfile, SitterStatus,
};
use crate::models::user::{CreateUser, Role, User};

struct Table<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    fn allocate(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn put(&mut self, id: i64, row: T) {
        self.next_id = self.next_id.max(id + 1);
        self.rows.insert(id, row);
    }
}

#[derive(Default)]
struct Tables {
    users: Table<User>,
    sitters: Table<Sitter>,
    pets: Table<Pet>,
    offerings: Table<Offering>,
    bookings: Table<Booking>,
    reviews: Table<Review>,
}

impl Tables {
    fn profile(&self, id: i64) -> Option<SitterProfile> {
        let sitter = self.sitters.rows.get(&id)?;
        let user = self.users.rows.get(&id)?;
        Some(SitterProfile {
            id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            experience_years: sitter.experience_years,
            certificates: sitter.certificates.clone(),
            preferences: sitter.preferences.clone(),
            location: sitter.location.clone(),
            status: sitter.status,
        })
    }

    fn rating(&self, sitter_id: i64) -> (f64, i64) {
        let ratings: Vec<i32> = self
            .reviews
            .rows
            .values()
            .filter(|r| r.sitter_id == sitter_id)
            .map(|r| r.rating)
            .collect();

        if ratings.is_empty() {
            return (0.0, 0);
        }

        let count = ratings.len() as i64;
        let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
        (sum as f64 / count as f64, count)
    }

    /// Mirrors a foreign key on `users(id)`
    fn require_user(&self, id: i64, constraint: &str) -> RepoResult<()> {
        if self.users.rows.contains_key(&id) {
            Ok(())
        } else {
            Err(RepoError::MissingReference(constraint.to_string()))
        }
    }

    fn email_taken(&self, email: &str) -> bool {
        self.users.rows.values().any(|u| u.email == email)
    }

    fn insert_user(&mut self, data: CreateUser) -> RepoResult<User> {
        if self.email_taken(&data.email) {
            return Err(RepoError::Conflict("users_email_key".to_string()));
        }

        let id = self.users.allocate();
        let user = User {
            id,
            full_name: data.full_name,
            email: data.email,
            phone: data.phone,
            password_hash: data.password_hash,
            role: data.role,
            created_at: Utc::now(),
        };
        self.users.put(id, user.clone());
        Ok(user)
    }
}

/// Shared in-memory tables implementing all repository traits
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        // A panic while holding the lock only happens inside a failing test
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Stores a user with an explicit id
    pub fn insert_user(&self, id: i64, full_name: &str, email: &str, role: Role) -> User {
        let user = User {
            id,
            full_name: full_name.to_string(),
            email: email.to_string(),
            phone: String::new(),
            password_hash: String::new(),
            role,
            created_at: Utc::now(),
        };
        self.tables().users.put(id, user.clone());
        user
    }

    /// Stores a sitter user and profile with an explicit id
    pub fn insert_sitter(
        &self,
        id: i64,
        full_name: &str,
        location: &str,
        status: SitterStatus,
    ) -> Sitter {
        let email = format!("sitter{}@example.com", id);
        self.insert_user(id, full_name, &email, Role::Sitter);

        let sitter = Sitter {
            id,
            experience_years: 3,
            certificates: String::new(),
            preferences: String::new(),
            location: location.to_string(),
            status,
        };
        self.tables().sitters.put(id, sitter.clone());
        sitter
    }

    /// Stores a pet with an explicit id
    pub fn insert_pet(&self, id: i64, owner_id: i64, name: &str, species: &str) -> Pet {
        let pet = Pet {
            id,
            owner_id,
            name: name.to_string(),
            species: species.to_string(),
            age: 2,
            notes: String::new(),
        };
        self.tables().pets.put(id, pet.clone());
        pet
    }

    /// Stores an offering with an explicit id
    pub fn insert_offering(
        &self,
        id: i64,
        sitter_id: i64,
        service_type: ServiceType,
        price_per_hour: f64,
    ) -> Offering {
        let offering = Offering {
            id,
            sitter_id,
            service_type,
            price_per_hour,
            description: String::new(),
        };
        self.tables().offerings.put(id, offering.clone());
        offering
    }

    /// Stores a booking as-is, bypassing every check
    pub fn insert_booking(&self, booking: Booking) -> Booking {
        self.tables().bookings.put(booking.id, booking.clone());
        booking
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, data: CreateUser) -> RepoResult<User> {
        self.tables().insert_user(data)
    }

    async fn create_sitter(
        &self,
        user: CreateUser,
        profile: CreateSitterProfile,
    ) -> RepoResult<(User, Sitter)> {
        let mut tables = self.tables();
        let user = tables.insert_user(user)?;

        let sitter = Sitter {
            id: user.id,
            experience_years: profile.experience_years,
            certificates: profile.certificates,
            preferences: profile.preferences,
            location: profile.location,
            status: SitterStatus::Pending,
        };
        tables.sitters.put(user.id, sitter.clone());

        Ok((user, sitter))
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>> {
        Ok(self.tables().users.rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self
            .tables()
            .users
            .rows
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self) -> RepoResult<Vec<User>> {
        Ok(self.tables().users.rows.values().rev().cloned().collect())
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let mut tables = self.tables();
        if tables.users.rows.remove(&id).is_none() {
            return Ok(false);
        }

        tables.sitters.rows.remove(&id);
        tables.pets.rows.retain(|_, p| p.owner_id != id);
        tables.offerings.rows.retain(|_, o| o.sitter_id != id);

        let Tables {
            pets,
            offerings,
            bookings,
            reviews,
            ..
        } = &mut *tables;
        bookings.rows.retain(|_, b| {
            b.owner_id != id
                && b.sitter_id != id
                && pets.rows.contains_key(&b.pet_id)
                && offerings.rows.contains_key(&b.service_id)
        });
        reviews.rows.retain(|_, r| {
            r.owner_id != id && r.sitter_id != id && bookings.rows.contains_key(&r.booking_id)
        });

        Ok(true)
    }
}

#[async_trait]
impl SitterRepository for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Sitter>> {
        Ok(self.tables().sitters.rows.get(&id).cloned())
    }

    async fn find_profile(&self, id: i64) -> RepoResult<Option<SitterProfile>> {
        Ok(self.tables().profile(id))
    }

    async fn find_details(&self, id: i64) -> RepoResult<Option<SitterDetails>> {
        let tables = self.tables();
        let Some(profile) = tables.profile(id) else {
            return Ok(None);
        };
        let (rating, reviews) = tables.rating(id);

        Ok(Some(SitterDetails {
            profile,
            rating,
            reviews,
        }))
    }

    async fn list_by_status(&self, status: SitterStatus) -> RepoResult<Vec<SitterProfile>> {
        let tables = self.tables();
        Ok(tables
            .sitters
            .rows
            .values()
            .rev()
            .filter(|s| s.status == status)
            .filter_map(|s| tables.profile(s.id))
            .collect())
    }

    async fn update_status(
        &self,
        id: i64,
        status: SitterStatus,
        allowed: &[SitterStatus],
    ) -> RepoResult<Option<Sitter>> {
        let mut tables = self.tables();
        match tables.sitters.rows.get_mut(&id) {
            Some(sitter) if allowed.contains(&sitter.status) => {
                sitter.status = status;
                Ok(Some(sitter.clone()))
            }
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl PetRepository for InMemoryStore {
    async fn create(&self, data: CreatePet) -> RepoResult<Pet> {
        let mut tables = self.tables();
        tables.require_user(data.owner_id, "pets_owner_id_fkey")?;

        let id = tables.pets.allocate();
        let pet = Pet {
            id,
            owner_id: data.owner_id,
            name: data.name,
            species: data.species,
            age: data.age,
            notes: data.notes,
        };
        tables.pets.put(id, pet.clone());
        Ok(pet)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Pet>> {
        Ok(self.tables().pets.rows.get(&id).cloned())
    }

    async fn list_by_owner(&self, owner_id: i64) -> RepoResult<Vec<Pet>> {
        Ok(self
            .tables()
            .pets
            .rows
            .values()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn update(&self, id: i64, data: UpdatePet) -> RepoResult<Option<Pet>> {
        let mut tables = self.tables();
        Ok(tables.pets.rows.get_mut(&id).map(|pet| {
            pet.name = data.name;
            pet.species = data.species;
            pet.age = data.age;
            pet.notes = data.notes;
            pet.clone()
        }))
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let mut tables = self.tables();
        let removed = tables.pets.rows.remove(&id).is_some();
        if removed {
            tables.bookings.rows.retain(|_, b| b.pet_id != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl OfferingRepository for InMemoryStore {
    async fn create(&self, data: CreateOffering) -> RepoResult<Offering> {
        let mut tables = self.tables();
        if !tables.sitters.rows.contains_key(&data.sitter_id) {
            return Err(RepoError::MissingReference(
                "services_sitter_id_fkey".to_string(),
            ));
        }

        let id = tables.offerings.allocate();
        let offering = Offering {
            id,
            sitter_id: data.sitter_id,
            service_type: data.service_type,
            price_per_hour: data.price_per_hour,
            description: data.description,
        };
        tables.offerings.put(id, offering.clone());
        Ok(offering)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Offering>> {
        Ok(self.tables().offerings.rows.get(&id).cloned())
    }

    async fn list_by_sitter(&self, sitter_id: i64) -> RepoResult<Vec<Offering>> {
        Ok(self
            .tables()
            .offerings
            .rows
            .values()
            .filter(|o| o.sitter_id == sitter_id)
            .cloned()
            .collect())
    }

    async fn search(&self, filter: &OfferingSearch) -> RepoResult<Vec<OfferingListing>> {
        let tables = self.tables();
        let location = filter
            .location
            .as_deref()
            .map(|l| l.trim().to_lowercase())
            .filter(|l| !l.is_empty());

        let mut listings: Vec<OfferingListing> = tables
            .offerings
            .rows
            .values()
            .filter(|o| filter.service_type.map_or(true, |t| o.service_type == t))
            .filter_map(|o| {
                let profile = tables.profile(o.sitter_id)?;
                if profile.status != SitterStatus::Approved {
                    return None;
                }
                if let Some(location) = &location {
                    if !profile.location.to_lowercase().contains(location.as_str()) {
                        return None;
                    }
                }
                Some(OfferingListing {
                    offering: o.clone(),
                    sitter_name: profile.full_name,
                    sitter_rating: tables.rating(o.sitter_id).0,
                })
            })
            .collect();

        listings.sort_by(|a, b| {
            b.sitter_rating
                .total_cmp(&a.sitter_rating)
                .then(a.offering.id.cmp(&b.offering.id))
        });

        Ok(listings)
    }

    async fn update(&self, id: i64, data: UpdateOffering) -> RepoResult<Option<Offering>> {
        let mut tables = self.tables();
        Ok(tables.offerings.rows.get_mut(&id).map(|offering| {
            offering.service_type = data.service_type;
            offering.price_per_hour = data.price_per_hour;
            offering.description = data.description;
            offering.clone()
        }))
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let mut tables = self.tables();
        let removed = tables.offerings.rows.remove(&id).is_some();
        if removed {
            tables.bookings.rows.retain(|_, b| b.service_id != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn create(&self, data: CreateBooking) -> RepoResult<Booking> {
        let mut tables = self.tables();
        tables.require_user(data.owner_id, "bookings_owner_id_fkey")?;

        let clashes = tables.bookings.rows.values().any(|b| {
            b.sitter_id == data.sitter_id
                && b.status.is_active()
                && b.overlaps(data.start_time, data.end_time)
        });
        if clashes {
            return Err(RepoError::Conflict("bookings_no_overlap".to_string()));
        }

        let id = tables.bookings.allocate();
        let now = Utc::now();
        let booking = Booking {
            id,
            owner_id: data.owner_id,
            sitter_id: data.sitter_id,
            pet_id: data.pet_id,
            service_id: data.service_id,
            start_time: data.start_time,
            end_time: data.end_time,
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        tables.bookings.put(id, booking.clone());
        Ok(booking)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Booking>> {
        Ok(self.tables().bookings.rows.get(&id).cloned())
    }

    async fn list_by_owner(&self, owner_id: i64) -> RepoResult<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self
            .tables()
            .bookings
            .rows
            .values()
            .filter(|b| b.owner_id == owner_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(bookings)
    }

    async fn list_by_sitter(&self, sitter_id: i64) -> RepoResult<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self
            .tables()
            .bookings
            .rows
            .values()
            .filter(|b| b.sitter_id == sitter_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(bookings)
    }

    async fn has_overlap(
        &self,
        sitter_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<bool> {
        Ok(self.tables().bookings.rows.values().any(|b| {
            b.sitter_id == sitter_id && b.status.is_active() && b.overlaps(start, end)
        }))
    }

    async fn transition(
        &self,
        id: i64,
        status: BookingStatus,
        allowed: &[BookingStatus],
    ) -> RepoResult<Option<Booking>> {
        let mut tables = self.tables();
        match tables.bookings.rows.get_mut(&id) {
            Some(booking) if allowed.contains(&booking.status) => {
                booking.status = status;
                booking.updated_at = Utc::now();
                Ok(Some(booking.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn list_stale_pending(&self, cutoff: DateTime<Utc>) -> RepoResult<Vec<i64>> {
        Ok(self
            .tables()
            .bookings
            .rows
            .values()
            .filter(|b| b.status == BookingStatus::Pending && b.start_time < cutoff)
            .map(|b| b.id)
            .collect())
    }
}

#[async_trait]
impl ReviewRepository for InMemoryStore {
    async fn create(&self, data: CreateReview) -> RepoResult<Review> {
        let mut tables = self.tables();
        if tables
            .reviews
            .rows
            .values()
            .any(|r| r.booking_id == data.booking_id)
        {
            return Err(RepoError::Conflict("reviews_booking_id_key".to_string()));
        }

        let id = tables.reviews.allocate();
        let review = Review {
            id,
            booking_id: data.booking_id,
            owner_id: data.owner_id,
            sitter_id: data.sitter_id,
            rating: data.rating,
            comment: data.comment,
            created_at: Utc::now(),
        };
        tables.reviews.put(id, review.clone());
        Ok(review)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Review>> {
        Ok(self.tables().reviews.rows.get(&id).cloned())
    }

    async fn find_by_booking(&self, booking_id: i64) -> RepoResult<Option<Review>> {
        Ok(self
            .tables()
            .reviews
            .rows
            .values()
            .find(|r| r.booking_id == booking_id)
            .cloned())
    }

    async fn list_by_sitter(&self, sitter_id: i64) -> RepoResult<Vec<Review>> {
        Ok(self
            .tables()
            .reviews
            .rows
            .values()
            .rev()
            .filter(|r| r.sitter_id == sitter_id)
            .cloned()
            .collect())
    }

    async fn update(&self, id: i64, data: UpdateReview) -> RepoResult<Option<Review>> {
        let mut tables = self.tables();
        Ok(tables.reviews.rows.get_mut(&id).map(|review| {
            review.rating = data.rating;
            review.comment = data.comment;
            review.clone()
        }))
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        Ok(self.tables().reviews.rows.remove(&id).is_some())
    }

    async fn rating_summary(&self, sitter_id: i64) -> RepoResult<RatingSummary> {
        let (average_rating, review_count) = self.tables().rating(sitter_id);
        Ok(RatingSummary {
            sitter_id,
            average_rating,
            review_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn booking(id: i64, status: BookingStatus, start: DateTime<Utc>) -> Booking {
        Booking {
            id,
            owner_id: 1,
            sitter_id: 2,
            pet_id: 3,
            service_id: 4,
            start_time: start,
            end_time: start + Duration::hours(2),
            status,
            created_at: start,
            updated_at: start,
        }
    }

    #[tokio::test]
    async fn test_guarded_transition() {
        let store = InMemoryStore::new();
        store.insert_booking(booking(7, BookingStatus::Pending, Utc::now()));

        let confirmed = BookingRepository::transition(
            &store,
            7,
            BookingStatus::Confirmed,
            &[BookingStatus::Pending],
        )
        .await
        .unwrap();
        assert_eq!(confirmed.unwrap().status, BookingStatus::Confirmed);

        let again = BookingRepository::transition(
            &store,
            7,
            BookingStatus::Confirmed,
            &[BookingStatus::Pending],
        )
        .await
        .unwrap();
        assert!(again.is_none());

        let missing = BookingRepository::transition(
            &store,
            99,
            BookingStatus::Confirmed,
            &[BookingStatus::Pending],
        )
        .await
        .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_stale_pending_listing() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        store.insert_booking(booking(1, BookingStatus::Pending, now - Duration::hours(30)));
        store.insert_booking(booking(2, BookingStatus::Pending, now - Duration::hours(1)));
        store.insert_booking(booking(3, BookingStatus::Confirmed, now - Duration::hours(30)));

        let stale = store
            .list_stale_pending(now - Duration::hours(24))
            .await
            .unwrap();
        assert_eq!(stale, vec![1]);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflict() {
        let store = InMemoryStore::new();
        let data = CreateUser {
            full_name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: String::new(),
            password_hash: "hash".to_string(),
            role: Role::Owner,
        };

        UserRepository::create(&store, data.clone()).await.unwrap();
        let err = UserRepository::create(&store, data).await.unwrap_err();
        assert!(matches!(err, RepoError::Conflict(c) if c == "users_email_key"));
    }

    #[tokio::test]
    async fn test_search_filters_and_orders() {
        let store = InMemoryStore::new();
        store.insert_sitter(2, "Sam Sitter", "Almaty Center", SitterStatus::Approved);
        store.insert_sitter(5, "Pending Pat", "Almaty", SitterStatus::Pending);
        store.insert_sitter(6, "Top Tess", "North Almaty", SitterStatus::Approved);
        store.insert_offering(10, 2, ServiceType::Walking, 10.0);
        store.insert_offering(11, 5, ServiceType::Walking, 10.0);
        store.insert_offering(12, 6, ServiceType::Walking, 12.0);
        store.insert_offering(13, 6, ServiceType::Boarding, 30.0);

        ReviewRepository::create(
            &store,
            CreateReview {
                booking_id: 100,
                owner_id: 1,
                sitter_id: 6,
                rating: 5,
                comment: String::new(),
            },
        )
        .await
        .unwrap();

        let filter = OfferingSearch {
            service_type: Some(ServiceType::Walking),
            location: Some("almaty".to_string()),
        };
        let hits = store.search(&filter).await.unwrap();
        let ids: Vec<i64> = hits.iter().map(|h| h.offering.id).collect();
        assert_eq!(ids, vec![12, 10]);
        assert_eq!(hits[0].sitter_name, "Top Tess");
        assert_eq!(hits[0].sitter_rating, 5.0);
    }

    #[tokio::test]
    async fn test_delete_user_cascades() {
        let store = InMemoryStore::new();
        store.insert_user(1, "Owner", "owner@example.com", Role::Owner);
        store.insert_sitter(2, "Sitter", "Almaty", SitterStatus::Approved);
        store.insert_pet(3, 1, "Rex", "dog");
        store.insert_offering(4, 2, ServiceType::Walking, 10.0);
        store.insert_booking(booking(5, BookingStatus::Pending, Utc::now()));

        assert!(UserRepository::delete(&store, 1).await.unwrap());
        assert!(PetRepository::find_by_id(&store, 3).await.unwrap().is_none());
        assert!(BookingRepository::find_by_id(&store, 5).await.unwrap().is_none());
        assert!(OfferingRepository::find_by_id(&store, 4).await.unwrap().is_some());
        assert!(!UserRepository::delete(&store, 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_for_missing_user_is_missing_reference() {
        let store = InMemoryStore::new();
        let pet = CreatePet {
            owner_id: 1,
            name: "Rex".to_string(),
            species: "dog".to_string(),
            age: 3,
            notes: String::new(),
        };

        let err = PetRepository::create(&store, pet.clone()).await.unwrap_err();
        assert!(matches!(err, RepoError::MissingReference(c) if c == "pets_owner_id_fkey"));

        store.insert_user(1, "Owner", "owner@example.com", Role::Owner);
        assert!(PetRepository::create(&store, pet).await.is_ok());
    }

    #[tokio::test]
    async fn test_overlapping_insert_is_conflict() {
        let store = InMemoryStore::new();
        store.insert_user(1, "Owner", "owner@example.com", Role::Owner);
        let start = Utc::now() + Duration::hours(24);
        store.insert_booking(booking(5, BookingStatus::Confirmed, start));

        let clash = CreateBooking {
            owner_id: 1,
            sitter_id: 2,
            pet_id: 3,
            service_id: 4,
            start_time: start + Duration::hours(1),
            end_time: start + Duration::hours(3),
        };
        let err = BookingRepository::create(&store, clash.clone()).await.unwrap_err();
        assert!(matches!(err, RepoError::Conflict(c) if c == "bookings_no_overlap"));

        // Back-to-back windows do not intersect
        let adjacent = CreateBooking {
            start_time: start + Duration::hours(2),
            end_time: start + Duration::hours(4),
            ..clash
        };
        assert!(BookingRepository::create(&store, adjacent).await.is_ok());
    }
}
