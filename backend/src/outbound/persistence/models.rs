//! Diesel row types and conversions into domain entities.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::booking::{Booking, BookingStatus};
use crate::domain::dates::BookingPeriod;
use crate::domain::ports::BookingStoreError;
use crate::domain::vehicle::{Vehicle, VehicleType};

use super::schema::{bookings, vehicle_types, vehicles};

/// Queryable booking row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookingRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub vehicle_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable booking row; `created_at` comes from the table default.
#[derive(Debug, Insertable)]
#[diesel(table_name = bookings)]
pub(crate) struct NewBookingRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub vehicle_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: &'a str,
}

/// Queryable vehicle row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = vehicles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VehicleRow {
    pub id: Uuid,
    pub name: String,
    pub registration_number: String,
    pub type_id: Uuid,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
}

/// Queryable vehicle type row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = vehicle_types)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VehicleTypeRow {
    pub id: Uuid,
    pub name: String,
    pub wheels: i16,
    pub created_at: DateTime<Utc>,
}

/// Convert a stored row into a validated domain booking.
///
/// Rows violating domain invariants (unknown status, reversed period) can
/// only appear through out-of-band writes; they surface as query errors
/// rather than panics.
pub(crate) fn booking_from_row(row: BookingRow) -> Result<Booking, BookingStoreError> {
    let status: BookingStatus = row
        .status
        .parse()
        .map_err(|err| BookingStoreError::query(format!("decode booking {}: {err}", row.id)))?;

    let period = BookingPeriod::new(row.start_date, row.end_date)
        .map_err(|err| BookingStoreError::query(format!("decode booking {}: {err}", row.id)))?;

    Ok(Booking {
        id: row.id,
        user_id: row.user_id,
        vehicle_id: row.vehicle_id,
        period,
        status,
        created_at: row.created_at,
    })
}

impl From<VehicleRow> for Vehicle {
    fn from(row: VehicleRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            registration_number: row.registration_number,
            type_id: row.type_id,
            metadata: row.metadata,
        }
    }
}

impl From<VehicleTypeRow> for VehicleType {
    fn from(row: VehicleTypeRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            wheels: row.wheels,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn valid_row() -> BookingRow {
        BookingRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            start_date: NaiveDate::parse_from_str("2030-06-01", "%Y-%m-%d")
                .expect("valid test date"),
            end_date: NaiveDate::parse_from_str("2030-06-03", "%Y-%m-%d")
                .expect("valid test date"),
            status: "confirmed".to_owned(),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn valid_rows_convert(valid_row: BookingRow) {
        let booking = booking_from_row(valid_row).expect("converts");
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.period.start().to_string(), "2030-06-01");
    }

    #[rstest]
    fn unknown_statuses_are_query_errors(mut valid_row: BookingRow) {
        valid_row.status = "pending".to_owned();

        let error = booking_from_row(valid_row).expect_err("unknown status");
        assert!(matches!(error, BookingStoreError::Query { .. }));
        assert!(error.to_string().contains("pending"));
    }

    #[rstest]
    fn reversed_periods_are_query_errors(mut valid_row: BookingRow) {
        std::mem::swap(&mut valid_row.start_date, &mut valid_row.end_date);

        let error = booking_from_row(valid_row).expect_err("reversed period");
        assert!(matches!(error, BookingStoreError::Query { .. }));
    }
}
