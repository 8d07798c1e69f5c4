/// Booking model
///
/// # Status Machine
///
/// ```text
/// pending → confirmed → completed
///    ↓          ↓
/// cancelled ←───┘
/// ```
///
/// Transitions are persisted with a guarded `UPDATE ... WHERE status = ANY($n)`
/// so two concurrent callers cannot both move a booking out of the same state.
/// The allowed source states for each transition are listed here and used by
/// both the repository and the service layer.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::string_enum;

/// Booking status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Requested by the owner, awaiting the sitter
    Pending,

    /// Accepted by the sitter
    Confirmed,

    /// Cancelled by a participant or expired by the sweeper
    Cancelled,

    /// Care delivered (terminal)
    Completed,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Cancelled,
        BookingStatus::Completed,
    ];

    /// Converts status to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    /// Source states from which a booking may move to `self`
    ///
    /// Cancelling an already cancelled booking is accepted and leaves it
    /// cancelled.
    pub fn allowed_sources(&self) -> &'static [BookingStatus] {
        match self {
            BookingStatus::Pending => &[],
            BookingStatus::Confirmed => &[BookingStatus::Pending],
            BookingStatus::Completed => &[BookingStatus::Confirmed],
            BookingStatus::Cancelled => &[
                BookingStatus::Pending,
                BookingStatus::Confirmed,
                BookingStatus::Cancelled,
            ],
        }
    }

    /// Returns true if a booking in `self` may move to `next`
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        next.allowed_sources().contains(self)
    }

    /// Statuses that block the sitter's calendar
    pub fn is_active(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

string_enum!(BookingStatus, "booking status");

/// Booking
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Booking {
    pub id: i64,
    pub owner_id: i64,
    pub sitter_id: i64,
    pub pet_id: i64,
    pub service_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[sqlx(try_from = "String")]
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Returns true if this booking's window intersects `[start, end)`
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && start < self.end_time
    }
}

/// Input for creating a booking
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub owner_id: i64,
    pub sitter_id: i64,
    pub pet_id: i64,
    pub service_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Shortest accepted booking, exclusive
pub fn min_duration() -> Duration {
    Duration::minutes(30)
}

/// Longest accepted booking, inclusive
pub fn max_duration() -> Duration {
    Duration::hours(24)
}

/// How long a pending booking may sit past its start before the sweeper
/// cancels it
pub fn pending_expiry() -> Duration {
    Duration::hours(24)
}

/// Checks `end > start` and that `start` is not before `now`
pub fn validate_window(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), String> {
    if end <= start {
        return Err("end_time must be after start_time".to_string());
    }
    if start < now {
        return Err("start_time cannot be in the past".to_string());
    }
    Ok(())
}

/// Checks the booking length lies in (30 min, 24 h]
pub fn validate_duration(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), String> {
    let duration = end - start;
    if duration <= min_duration() {
        return Err("booking must be longer than 30 minutes".to_string());
    }
    if duration > max_duration() {
        return Err("booking cannot be longer than 24 hours".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        use BookingStatus::*;

        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(Cancelled.can_transition_to(Cancelled));

        assert!(!Confirmed.can_transition_to(Confirmed));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(!Completed.can_transition_to(Pending));
    }

    #[test]
    fn test_validate_window() {
        let now = Utc::now();
        let start = now + Duration::hours(24);

        assert!(validate_window(start, start + Duration::hours(2), now).is_ok());
        assert!(validate_window(start, start, now).is_err());
        assert!(validate_window(start, start - Duration::hours(1), now).is_err());
        assert!(validate_window(now - Duration::hours(1), now + Duration::hours(1), now).is_err());
    }

    #[test]
    fn test_validate_duration() {
        let start = Utc::now();

        assert!(validate_duration(start, start + Duration::minutes(30)).is_err());
        assert!(validate_duration(start, start + Duration::minutes(31)).is_ok());
        assert!(validate_duration(start, start + Duration::hours(24)).is_ok());
        assert!(validate_duration(start, start + Duration::hours(25)).is_err());
    }

    #[test]
    fn test_overlaps() {
        let start = Utc::now();
        let booking = Booking {
            id: 1,
            owner_id: 1,
            sitter_id: 2,
            pet_id: 3,
            service_id: 4,
            start_time: start,
            end_time: start + Duration::hours(2),
            status: BookingStatus::Pending,
            created_at: start,
            updated_at: start,
        };

        assert!(booking.overlaps(start + Duration::hours(1), start + Duration::hours(3)));
        assert!(!booking.overlaps(start + Duration::hours(2), start + Duration::hours(3)));
        assert!(!booking.overlaps(start - Duration::hours(1), start));
    }
}
