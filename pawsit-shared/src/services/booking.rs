/// Booking lifecycle service
///
/// Creation validates the time window and that pet, offering and sitter fit
/// together. Status changes go through one guarded transition path used by
/// the HTTP handlers and by the expiry sweeper alike:
///
/// | operation  | allowed from                  | to          |
/// |------------|-------------------------------|-------------|
/// | `confirm`  | pending                       | confirmed   |
/// | `complete` | confirmed                     | completed   |
/// | `cancel`   | pending, confirmed, cancelled | cancelled   |
/// | `expire`   | pending (start > 24 h ago)    | cancelled   |

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::auth::authorization::{require_any_of_or_admin, require_self_or_admin};
use crate::auth::middleware::AuthContext;
use crate::error::{ServiceError, ServiceResult};
use crate::models::booking::{
    pending_expiry, validate_window, Booking, BookingStatus, CreateBooking,
};
use crate::models::sitter::SitterStatus;
use crate::repository::{BookingRepository, OfferingRepository, PetRepository, SitterRepository};

#[derive(Clone)]
pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    pets: Arc<dyn PetRepository>,
    offerings: Arc<dyn OfferingRepository>,
    sitters: Arc<dyn SitterRepository>,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        pets: Arc<dyn PetRepository>,
        offerings: Arc<dyn OfferingRepository>,
        sitters: Arc<dyn SitterRepository>,
    ) -> Self {
        Self {
            bookings,
            pets,
            offerings,
            sitters,
        }
    }

    /// Creates a `pending` booking
    ///
    /// Rejects `end <= start` and `start` in the past, then checks that the
    /// pet belongs to the owner, the offering belongs to the sitter, the
    /// sitter is approved and the sitter is free for the whole window.
    pub async fn create(&self, data: CreateBooking) -> ServiceResult<Booking> {
        validate_window(data.start_time, data.end_time, Utc::now())
            .map_err(ServiceError::Validation)?;

        let pet = self
            .pets
            .find_by_id(data.pet_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("pet"))?;
        if pet.owner_id != data.owner_id {
            return Err(ServiceError::Validation(
                "pet does not belong to this owner".to_string(),
            ));
        }

        let offering = self
            .offerings
            .find_by_id(data.service_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("service"))?;
        if offering.sitter_id != data.sitter_id {
            return Err(ServiceError::Validation(
                "service is not offered by this sitter".to_string(),
            ));
        }

        let sitter = self
            .sitters
            .find_by_id(data.sitter_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("sitter"))?;
        if sitter.status != SitterStatus::Approved {
            return Err(ServiceError::Validation(
                "sitter is not approved".to_string(),
            ));
        }

        if self
            .bookings
            .has_overlap(data.sitter_id, data.start_time, data.end_time)
            .await?
        {
            return Err(ServiceError::Conflict(
                "sitter already has a booking in this time window".to_string(),
            ));
        }

        let booking = self.bookings.create(data).await?;
        info!(
            booking_id = booking.id,
            owner_id = booking.owner_id,
            sitter_id = booking.sitter_id,
            "Booking created"
        );

        Ok(booking)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Booking> {
        self.bookings
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("booking"))
    }

    pub async fn list_by_owner(&self, owner_id: i64) -> ServiceResult<Vec<Booking>> {
        Ok(self.bookings.list_by_owner(owner_id).await?)
    }

    pub async fn list_by_sitter(&self, sitter_id: i64) -> ServiceResult<Vec<Booking>> {
        Ok(self.bookings.list_by_sitter(sitter_id).await?)
    }

    pub async fn confirm(&self, id: i64) -> ServiceResult<Booking> {
        self.transition(id, BookingStatus::Confirmed).await
    }

    pub async fn cancel(&self, id: i64) -> ServiceResult<Booking> {
        self.transition(id, BookingStatus::Cancelled).await
    }

    pub async fn complete(&self, id: i64) -> ServiceResult<Booking> {
        self.transition(id, BookingStatus::Completed).await
    }

    /// Checks `ctx` may move booking `id` to `target`
    ///
    /// Confirm and complete belong to the booking's sitter; cancel to either
    /// participant. Admins may do all three.
    pub async fn authorize_transition(
        &self,
        ctx: &AuthContext,
        id: i64,
        target: BookingStatus,
    ) -> ServiceResult<Booking> {
        let booking = self.get(id).await?;

        match target {
            BookingStatus::Cancelled => {
                require_any_of_or_admin(ctx, &[booking.owner_id, booking.sitter_id])?
            }
            _ => require_self_or_admin(ctx, booking.sitter_id)?,
        }

        Ok(booking)
    }

    /// Cancels pending bookings whose start is more than 24 h before `now`
    ///
    /// Returns how many bookings were cancelled. A booking confirmed between
    /// listing and update is skipped by the guarded transition.
    pub async fn expire_stale(&self, now: DateTime<Utc>) -> ServiceResult<usize> {
        let cutoff = now - pending_expiry();
        let stale = self.bookings.list_stale_pending(cutoff).await?;

        let mut cancelled = 0;
        for id in stale {
            match self
                .bookings
                .transition(id, BookingStatus::Cancelled, &[BookingStatus::Pending])
                .await
            {
                Ok(Some(_)) => {
                    info!(booking_id = id, "Expired stale pending booking");
                    cancelled += 1;
                }
                Ok(None) => {}
                Err(e) => warn!(booking_id = id, error = %e, "Failed to expire booking"),
            }
        }

        Ok(cancelled)
    }

    async fn transition(&self, id: i64, target: BookingStatus) -> ServiceResult<Booking> {
        if let Some(booking) = self
            .bookings
            .transition(id, target, target.allowed_sources())
            .await?
        {
            info!(booking_id = id, status = %target, "Booking status changed");
            return Ok(booking);
        }

        let current = self
            .bookings
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("booking"))?;

        let message = match target {
            BookingStatus::Confirmed => "only pending bookings can be confirmed",
            BookingStatus::Completed => "only confirmed bookings can be completed",
            BookingStatus::Cancelled => "completed bookings cannot be cancelled",
            BookingStatus::Pending => "bookings cannot return to pending",
        };
        warn!(
            booking_id = id,
            current = %current.status,
            target = %target,
            "Rejected booking transition"
        );

        Err(ServiceError::Conflict(message.to_string()))
    }
}
