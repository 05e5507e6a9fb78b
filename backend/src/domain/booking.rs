//! Booking aggregate and status lifecycle.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::dates::BookingPeriod;

/// Reservation lifecycle state.
///
/// The only permitted transition is confirmed → cancelled. A cancelled
/// booking never returns to confirmed and is permanently excluded from
/// conflict checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    /// Holds a reservation slot; participates in overlap checks.
    Confirmed,
    /// Released; keeps the historical record but frees the dates.
    Cancelled,
}

impl BookingStatus {
    /// Stable persisted representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a persisted status string is not a known lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown booking status {value:?}")]
pub struct UnknownBookingStatus {
    pub value: String,
}

impl std::str::FromStr for BookingStatus {
    type Err = UnknownBookingStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownBookingStatus {
                value: other.to_owned(),
            }),
        }
    }
}

/// A reservation of one vehicle for an inclusive calendar-date range.
///
/// Bookings are owned by the store; the core never caches them. Every
/// conflict decision is taken against a fresh read inside the active
/// transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub vehicle_id: Uuid,
    pub period: BookingPeriod,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Whether this booking currently holds its reservation slot.
    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }

    /// Whether this booking would conflict with a candidate period.
    ///
    /// Cancelled bookings never conflict.
    pub fn conflicts_with(&self, candidate: &BookingPeriod) -> bool {
        self.is_confirmed() && self.period.overlaps(candidate)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn day(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid test date")
    }

    fn booking(status: BookingStatus) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            period: BookingPeriod::new(day("2030-06-01"), day("2030-06-03"))
                .expect("valid test period"),
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn status_round_trips_through_persisted_form() {
        for status in [BookingStatus::Confirmed, BookingStatus::Cancelled] {
            let parsed: BookingStatus = status.as_str().parse().expect("parses back");
            assert_eq!(parsed, status);
        }
        assert!("pending".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn cancelled_bookings_never_conflict() {
        let candidate = BookingPeriod::new(day("2030-06-02"), day("2030-06-02"))
            .expect("valid test period");

        assert!(booking(BookingStatus::Confirmed).conflicts_with(&candidate));
        assert!(!booking(BookingStatus::Cancelled).conflicts_with(&candidate));
    }
}
