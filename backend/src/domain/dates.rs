//! Date normalization for booking requests.
//!
//! Bookings span inclusive calendar-date ranges with no time-of-day
//! semantics. A plain `YYYY-MM-DD` string is taken as that exact calendar
//! day; interpreting it through a local timezone could shift it to the
//! previous or next day, so the plain form never goes through timestamp
//! parsing. Any other input must be an RFC 3339 timestamp and is truncated
//! to its UTC calendar day.

use chrono::{DateTime, NaiveDate, Utc};

/// Failure kinds raised while normalizing booking dates.
///
/// Each variant maps to an invalid-request response with a distinguishing
/// machine-readable detail code attached by the service layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateValidationError {
    /// The raw string is neither a plain date nor an RFC 3339 timestamp.
    #[error("{value:?} is not a valid date")]
    Unparseable { value: String },

    /// The start date lies after the end date.
    #[error("start date {start} is after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// The start date lies strictly before today (UTC calendar day).
    #[error("start date {start} is in the past")]
    PastStart { start: NaiveDate },
}

/// Parse a raw booking date into a calendar day.
///
/// # Errors
///
/// Returns [`DateValidationError::Unparseable`] when the input matches
/// neither accepted form.
///
/// # Examples
/// ```
/// use backend::domain::dates::parse_booking_date;
///
/// let plain = parse_booking_date("2030-06-01").expect("plain date");
/// let stamped = parse_booking_date("2030-06-01T23:30:00+02:00").expect("timestamp");
/// assert_eq!(plain.to_string(), "2030-06-01");
/// // The timestamp is 21:30 UTC, still June 1st.
/// assert_eq!(stamped, plain);
/// ```
pub fn parse_booking_date(raw: &str) -> Result<NaiveDate, DateValidationError> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|stamp| stamp.with_timezone(&Utc).date_naive())
        .map_err(|_| DateValidationError::Unparseable {
            value: raw.to_owned(),
        })
}

/// An inclusive calendar-date range.
///
/// ## Invariants
/// - `start <= end`, enforced at construction.
///
/// A single-day rental is expressed as `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl BookingPeriod {
    /// Build a period, rejecting reversed ranges.
    ///
    /// # Errors
    ///
    /// Returns [`DateValidationError::InvalidRange`] when `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateValidationError> {
        if start > end {
            return Err(DateValidationError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// First rented day.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last rented day (inclusive).
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Reject periods starting strictly before `today`.
    ///
    /// `today` is the UTC calendar day at the time of the check; a booking
    /// starting today is valid.
    ///
    /// # Errors
    ///
    /// Returns [`DateValidationError::PastStart`] when the period starts in
    /// the past.
    pub fn ensure_not_past(&self, today: NaiveDate) -> Result<(), DateValidationError> {
        if self.start < today {
            return Err(DateValidationError::PastStart { start: self.start });
        }
        Ok(())
    }

    /// Inclusive-range intersection test.
    ///
    /// Two periods overlap when they share at least one calendar day:
    /// `NOT (self.end < other.start OR self.start > other.end)`. The SQL
    /// conflict query evaluates exactly this predicate.
    pub fn overlaps(&self, other: &Self) -> bool {
        !(self.end < other.start || self.start > other.end)
    }
}

impl std::fmt::Display for BookingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
