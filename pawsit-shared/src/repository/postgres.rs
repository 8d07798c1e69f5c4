/// PostgreSQL repositories
///
/// All queries use runtime-checked `sqlx::query_as` so the crate builds
/// without a live database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{
    BookingRepository, OfferingRepository, PetRepository, RepoResult, ReviewRepository,
    SitterRepository, UserRepository,
};
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

/// Escapes LIKE metacharacters so user input matches literally
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, data: CreateUser) -> RepoResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (full_name, email, phone, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, full_name, email, phone, password_hash, role, created_at
            "#,
        )
        .bind(data.full_name)
        .bind(data.email)
        .bind(data.phone)
        .bind(data.password_hash)
        .bind(data.role.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_sitter(
        &self,
        user: CreateUser,
        profile: CreateSitterProfile,
    ) -> RepoResult<(User, Sitter)> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (full_name, email, phone, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, full_name, email, phone, password_hash, role, created_at
            "#,
        )
        .bind(user.full_name)
        .bind(user.email)
        .bind(user.phone)
        .bind(user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let sitter = sqlx::query_as::<_, Sitter>(
            r#"
            INSERT INTO sitters (id, experience_years, certificates, preferences, location, status)
            VALUES ($1, $2, $3, $4, $5, 'pending')
            RETURNING id, experience_years, certificates, preferences, location, status
            "#,
        )
        .bind(user.id)
        .bind(profile.experience_years)
        .bind(profile.certificates)
        .bind(profile.preferences)
        .bind(profile.location)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((user, sitter))
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, full_name, email, phone, password_hash, role, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, full_name, email, phone, password_hash, role, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list(&self) -> RepoResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, full_name, email, phone, password_hash, role, created_at
            FROM users
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(Clone)]
pub struct PgSitterRepository {
    pool: PgPool,
}

impl PgSitterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SitterRepository for PgSitterRepository {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Sitter>> {
        let sitter = sqlx::query_as::<_, Sitter>(
            r#"
            SELECT id, experience_years, certificates, preferences, location, status
            FROM sitters
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sitter)
    }

    async fn find_profile(&self, id: i64) -> RepoResult<Option<SitterProfile>> {
        let profile = sqlx::query_as::<_, SitterProfile>(
            r#"
            SELECT s.id, u.full_name, u.email, u.phone,
                   s.experience_years, s.certificates, s.preferences, s.location, s.status
            FROM sitters s
            JOIN users u ON u.id = s.id
            WHERE s.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn find_details(&self, id: i64) -> RepoResult<Option<SitterDetails>> {
        let details = sqlx::query_as::<_, SitterDetails>(
            r#"
            SELECT s.id, u.full_name, u.email, u.phone,
                   s.experience_years, s.certificates, s.preferences, s.location, s.status,
                   COALESCE(AVG(r.rating), 0)::FLOAT8 AS rating,
                   COUNT(r.id) AS reviews
            FROM sitters s
            JOIN users u ON u.id = s.id
            LEFT JOIN reviews r ON r.sitter_id = s.id
            WHERE s.id = $1
            GROUP BY s.id, u.id
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(details)
    }

    async fn list_by_status(&self, status: SitterStatus) -> RepoResult<Vec<SitterProfile>> {
        let profiles = sqlx::query_as::<_, SitterProfile>(
            r#"
            SELECT s.id, u.full_name, u.email, u.phone,
                   s.experience_years, s.certificates, s.preferences, s.location, s.status
            FROM sitters s
            JOIN users u ON u.id = s.id
            WHERE s.status = $1
            ORDER BY s.id DESC
            "#,
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(profiles)
    }

    async fn update_status(
        &self,
        id: i64,
        status: SitterStatus,
        allowed: &[SitterStatus],
    ) -> RepoResult<Option<Sitter>> {
        let allowed: Vec<&str> = allowed.iter().map(|s| s.as_str()).collect();

        let sitter = sqlx::query_as::<_, Sitter>(
            r#"
            UPDATE sitters
            SET status = $2
            WHERE id = $1 AND status = ANY($3)
            RETURNING id, experience_years, certificates, preferences, location, status
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(&allowed)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sitter)
    }
}

#[derive(Clone)]
pub struct PgPetRepository {
    pool: PgPool,
}

impl PgPetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PetRepository for PgPetRepository {
    async fn create(&self, data: CreatePet) -> RepoResult<Pet> {
        let pet = sqlx::query_as::<_, Pet>(
            r#"
            INSERT INTO pets (owner_id, name, species, age, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, owner_id, name, species, age, notes
            "#,
        )
        .bind(data.owner_id)
        .bind(data.name)
        .bind(data.species)
        .bind(data.age)
        .bind(data.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(pet)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Pet>> {
        let pet = sqlx::query_as::<_, Pet>(
            "SELECT id, owner_id, name, species, age, notes FROM pets WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(pet)
    }

    async fn list_by_owner(&self, owner_id: i64) -> RepoResult<Vec<Pet>> {
        let pets = sqlx::query_as::<_, Pet>(
            r#"
            SELECT id, owner_id, name, species, age, notes
            FROM pets
            WHERE owner_id = $1
            ORDER BY id
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(pets)
    }

    async fn update(&self, id: i64, data: UpdatePet) -> RepoResult<Option<Pet>> {
        let pet = sqlx::query_as::<_, Pet>(
            r#"
            UPDATE pets
            SET name = $2, species = $3, age = $4, notes = $5
            WHERE id = $1
            RETURNING id, owner_id, name, species, age, notes
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.species)
        .bind(data.age)
        .bind(data.notes)
        .fetch_optional(&self.pool)
        .await?;

        Ok(pet)
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM pets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(Clone)]
pub struct PgOfferingRepository {
    pool: PgPool,
}

impl PgOfferingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OfferingRepository for PgOfferingRepository {
    async fn create(&self, data: CreateOffering) -> RepoResult<Offering> {
        let offering = sqlx::query_as::<_, Offering>(
            r#"
            INSERT INTO services (sitter_id, service_type, price_per_hour, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, sitter_id, service_type, price_per_hour, description
            "#,
        )
        .bind(data.sitter_id)
        .bind(data.service_type.as_str())
        .bind(data.price_per_hour)
        .bind(data.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(offering)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Offering>> {
        let offering = sqlx::query_as::<_, Offering>(
            r#"
            SELECT id, sitter_id, service_type, price_per_hour, description
            FROM services
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(offering)
    }

    async fn list_by_sitter(&self, sitter_id: i64) -> RepoResult<Vec<Offering>> {
        let offerings = sqlx::query_as::<_, Offering>(
            r#"
            SELECT id, sitter_id, service_type, price_per_hour, description
            FROM services
            WHERE sitter_id = $1
            ORDER BY id
            "#,
        )
        .bind(sitter_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(offerings)
    }

    async fn search(&self, filter: &OfferingSearch) -> RepoResult<Vec<OfferingListing>> {
        let service_type = filter.service_type.map(|t| t.as_str());
        let location = filter
            .location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| format!("%{}%", escape_like(l)));

        let listings = sqlx::query_as::<_, OfferingListing>(
            r#"
            SELECT s.id, s.sitter_id, s.service_type, s.price_per_hour, s.description,
                   u.full_name AS sitter_name,
                   COALESCE(AVG(r.rating), 0)::FLOAT8 AS sitter_rating
            FROM services s
            JOIN sitters st ON st.id = s.sitter_id
            JOIN users u ON u.id = st.id
            LEFT JOIN reviews r ON r.sitter_id = st.id
            WHERE st.status = 'approved'
              AND ($1::TEXT IS NULL OR s.service_type = $1)
              AND ($2::TEXT IS NULL OR st.location ILIKE $2 ESCAPE '\')
            GROUP BY s.id, u.full_name
            ORDER BY sitter_rating DESC, s.id
            "#,
        )
        .bind(service_type)
        .bind(location)
        .fetch_all(&self.pool)
        .await?;

        Ok(listings)
    }

    async fn update(&self, id: i64, data: UpdateOffering) -> RepoResult<Option<Offering>> {
        let offering = sqlx::query_as::<_, Offering>(
            r#"
            UPDATE services
            SET service_type = $2, price_per_hour = $3, description = $4
            WHERE id = $1
            RETURNING id, sitter_id, service_type, price_per_hour, description
            "#,
        )
        .bind(id)
        .bind(data.service_type.as_str())
        .bind(data.price_per_hour)
        .bind(data.description)
        .fetch_optional(&self.pool)
        .await?;

        Ok(offering)
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(Clone)]
pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn create(&self, data: CreateBooking) -> RepoResult<Booking> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings
                (owner_id, sitter_id, pet_id, service_id, start_time, end_time, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'pending')
            RETURNING id, owner_id, sitter_id, pet_id, service_id, start_time, end_time,
                      status, created_at, updated_at
            "#,
        )
        .bind(data.owner_id)
        .bind(data.sitter_id)
        .bind(data.pet_id)
        .bind(data.service_id)
        .bind(data.start_time)
        .bind(data.end_time)
        .fetch_one(&self.pool)
        .await?;

        Ok(booking)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, owner_id, sitter_id, pet_id, service_id, start_time, end_time,
                   status, created_at, updated_at
            FROM bookings
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    async fn list_by_owner(&self, owner_id: i64) -> RepoResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, owner_id, sitter_id, pet_id, service_id, start_time, end_time,
                   status, created_at, updated_at
            FROM bookings
            WHERE owner_id = $1
            ORDER BY start_time DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    async fn list_by_sitter(&self, sitter_id: i64) -> RepoResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, owner_id, sitter_id, pet_id, service_id, start_time, end_time,
                   status, created_at, updated_at
            FROM bookings
            WHERE sitter_id = $1
            ORDER BY start_time DESC
            "#,
        )
        .bind(sitter_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    async fn has_overlap(
        &self,
        sitter_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<bool> {
        let overlap: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM bookings
                WHERE sitter_id = $1
                  AND status IN ('pending', 'confirmed')
                  AND start_time < $3
                  AND end_time > $2
            )
            "#,
        )
        .bind(sitter_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(overlap)
    }

    async fn transition(
        &self,
        id: i64,
        status: BookingStatus,
        allowed: &[BookingStatus],
    ) -> RepoResult<Option<Booking>> {
        let allowed: Vec<&str> = allowed.iter().map(|s| s.as_str()).collect();

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = $2,
                updated_at = NOW()
            WHERE id = $1 AND status = ANY($3)
            RETURNING id, owner_id, sitter_id, pet_id, service_id, start_time, end_time,
                      status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(&allowed)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    async fn list_stale_pending(&self, cutoff: DateTime<Utc>) -> RepoResult<Vec<i64>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT id FROM bookings
            WHERE status = 'pending' AND start_time < $1
            ORDER BY start_time
            "#,
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}

#[derive(Clone)]
pub struct PgReviewRepository {
    pool: PgPool,
}

impl PgReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewRepository for PgReviewRepository {
    async fn create(&self, data: CreateReview) -> RepoResult<Review> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (booking_id, owner_id, sitter_id, rating, comment)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, booking_id, owner_id, sitter_id, rating, comment, created_at
            "#,
        )
        .bind(data.booking_id)
        .bind(data.owner_id)
        .bind(data.sitter_id)
        .bind(data.rating)
        .bind(data.comment)
        .fetch_one(&self.pool)
        .await?;

        Ok(review)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Review>> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, booking_id, owner_id, sitter_id, rating, comment, created_at
            FROM reviews
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }

    async fn find_by_booking(&self, booking_id: i64) -> RepoResult<Option<Review>> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, booking_id, owner_id, sitter_id, rating, comment, created_at
            FROM reviews
            WHERE booking_id = $1
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }

    async fn list_by_sitter(&self, sitter_id: i64) -> RepoResult<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, booking_id, owner_id, sitter_id, rating, comment, created_at
            FROM reviews
            WHERE sitter_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(sitter_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    async fn update(&self, id: i64, data: UpdateReview) -> RepoResult<Option<Review>> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            UPDATE reviews
            SET rating = $2, comment = $3
            WHERE id = $1
            RETURNING id, booking_id, owner_id, sitter_id, rating, comment, created_at
            "#,
        )
        .bind(id)
        .bind(data.rating)
        .bind(data.comment)
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn rating_summary(&self, sitter_id: i64) -> RepoResult<RatingSummary> {
        let summary = sqlx::query_as::<_, RatingSummary>(
            r#"
            SELECT $1::BIGINT AS sitter_id,
                   COALESCE(AVG(rating), 0)::FLOAT8 AS average_rating,
                   COUNT(*) AS review_count
            FROM reviews
            WHERE sitter_id = $1
            "#,
        )
        .bind(sitter_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("Almaty"), "Almaty");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("north_side"), "north\\_side");
        assert_eq!(escape_like(r"a\b"), r"a\\b");
    }
}
