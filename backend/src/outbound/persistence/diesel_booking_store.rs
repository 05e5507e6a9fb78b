//! PostgreSQL-backed `BookingStore` implementation using Diesel.
//!
//! Creation runs the whole protocol (vehicle re-check, locked conflict
//! read, insert) inside one database transaction. The conflict read takes
//! its row lock via `FOR UPDATE` on the overlap query itself, so two
//! transactions racing on the same vehicle serialize exactly at that read:
//! the loser blocks until the winner commits (then sees the new row and
//! rejects) or rolls back (then proceeds on a clean view). Transactions for
//! different vehicles touch disjoint rows and never wait on each other.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::booking::{Booking, BookingStatus};
use crate::domain::dates::BookingPeriod;
use crate::domain::ports::{BookingStore, BookingStoreError, BookingWithVehicle, NewBooking};
use crate::domain::vehicle::{Vehicle, VehicleType};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{BookingRow, NewBookingRow, VehicleRow, VehicleTypeRow, booking_from_row};
use super::pool::DbPool;
use super::schema::{bookings, vehicle_types, vehicles};

/// Diesel-backed implementation of the booking store port.
#[derive(Clone)]
pub struct DieselBookingStore {
    pool: DbPool,
}

impl DieselBookingStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure channel inside the creation transaction.
///
/// Returning any error aborts the transaction, so a conflict or missing
/// vehicle rolls everything back without a partial write.
enum CreateTxError {
    VehicleMissing,
    Overlap,
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for CreateTxError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

fn join_rows(
    row: BookingRow,
    vehicle: VehicleRow,
    vehicle_type: VehicleTypeRow,
) -> Result<BookingWithVehicle, BookingStoreError> {
    Ok(BookingWithVehicle {
        booking: booking_from_row(row)?,
        vehicle: Vehicle::from(vehicle),
        vehicle_type: VehicleType::from(vehicle_type),
    })
}

#[async_trait]
impl BookingStore for DieselBookingStore {
    async fn create_confirmed(
        &self,
        new_booking: NewBooking,
    ) -> Result<BookingWithVehicle, BookingStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let period = new_booking.period;

        let result = conn
            .transaction::<(BookingRow, VehicleRow, VehicleTypeRow), CreateTxError, _>(|conn| {
                async move {
                    let vehicle: Option<VehicleRow> = vehicles::table
                        .find(new_booking.vehicle_id)
                        .select(VehicleRow::as_select())
                        .first(conn)
                        .await
                        .optional()?;
                    let Some(vehicle) = vehicle else {
                        return Err(CreateTxError::VehicleMissing);
                    };

                    // The serialization point: lock the vehicle's confirmed
                    // bookings intersecting the candidate period. The lock
                    // is held until this transaction commits or aborts.
                    let conflicting: Vec<Uuid> = bookings::table
                        .filter(bookings::vehicle_id.eq(new_booking.vehicle_id))
                        .filter(bookings::status.eq(BookingStatus::Confirmed.as_str()))
                        .filter(
                            bookings::start_date
                                .le(period.end())
                                .and(bookings::end_date.ge(period.start())),
                        )
                        .select(bookings::id)
                        .for_update()
                        .load(conn)
                        .await?;
                    if !conflicting.is_empty() {
                        return Err(CreateTxError::Overlap);
                    }

                    let row: BookingRow = diesel::insert_into(bookings::table)
                        .values(&NewBookingRow {
                            id: Uuid::new_v4(),
                            user_id: new_booking.user_id,
                            vehicle_id: new_booking.vehicle_id,
                            start_date: period.start(),
                            end_date: period.end(),
                            status: BookingStatus::Confirmed.as_str(),
                        })
                        .returning(BookingRow::as_returning())
                        .get_result(conn)
                        .await?;

                    let vehicle_type: VehicleTypeRow = vehicle_types::table
                        .find(vehicle.type_id)
                        .select(VehicleTypeRow::as_select())
                        .first(conn)
                        .await?;

                    Ok((row, vehicle, vehicle_type))
                }
                .scope_boxed()
            })
            .await;

        match result {
            Ok((row, vehicle, vehicle_type)) => join_rows(row, vehicle, vehicle_type),
            Err(CreateTxError::VehicleMissing) => Err(BookingStoreError::VehicleMissing),
            Err(CreateTxError::Overlap) => Err(BookingStoreError::Overlap),
            Err(CreateTxError::Diesel(error)) => Err(map_diesel_error(error)),
        }
    }

    async fn cancel(&self, booking_id: Uuid) -> Result<Booking, BookingStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<BookingRow> =
            diesel::update(bookings::table.filter(bookings::id.eq(booking_id)))
                .set(bookings::status.eq(BookingStatus::Cancelled.as_str()))
                .returning(BookingRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;

        row.map_or(Err(BookingStoreError::BookingMissing), booking_from_row)
    }

    async fn list_for_vehicle(&self, vehicle_id: Uuid) -> Result<Vec<Booking>, BookingStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<BookingRow> = bookings::table
            .filter(bookings::vehicle_id.eq(vehicle_id))
            .order(bookings::start_date.asc())
            .select(BookingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(booking_from_row).collect()
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<BookingWithVehicle>, BookingStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<BookingRow> = bookings::table
            .filter(bookings::user_id.eq(user_id))
            .order(bookings::created_at.desc())
            .select(BookingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let vehicle_ids: Vec<Uuid> = rows.iter().map(|row| row.vehicle_id).collect();
        let vehicle_rows: Vec<VehicleRow> = vehicles::table
            .filter(vehicles::id.eq_any(&vehicle_ids))
            .select(VehicleRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let type_ids: Vec<Uuid> = vehicle_rows.iter().map(|row| row.type_id).collect();
        let type_rows: Vec<VehicleTypeRow> = vehicle_types::table
            .filter(vehicle_types::id.eq_any(&type_ids))
            .select(VehicleTypeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let types_by_id: HashMap<Uuid, VehicleTypeRow> =
            type_rows.into_iter().map(|row| (row.id, row)).collect();
        let vehicles_by_id: HashMap<Uuid, VehicleRow> =
            vehicle_rows.into_iter().map(|row| (row.id, row)).collect();

        rows.into_iter()
            .map(|row| {
                let vehicle = vehicles_by_id.get(&row.vehicle_id).cloned().ok_or_else(|| {
                    BookingStoreError::query(format!(
                        "booking {} references missing vehicle {}",
                        row.id, row.vehicle_id
                    ))
                })?;
                let vehicle_type = types_by_id.get(&vehicle.type_id).cloned().ok_or_else(|| {
                    BookingStoreError::query(format!(
                        "vehicle {} references missing type {}",
                        vehicle.id, vehicle.type_id
                    ))
                })?;
                join_rows(row, vehicle, vehicle_type)
            })
            .collect()
    }

    async fn has_confirmed_overlap(
        &self,
        vehicle_id: Uuid,
        period: BookingPeriod,
    ) -> Result<bool, BookingStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Advisory read: same predicate as the creation path, but no lock
        // and no transaction, so the answer can go stale immediately.
        let matches: i64 = bookings::table
            .filter(bookings::vehicle_id.eq(vehicle_id))
            .filter(bookings::status.eq(BookingStatus::Confirmed.as_str()))
            .filter(
                bookings::start_date
                    .le(period.end())
                    .and(bookings::end_date.ge(period.start())),
            )
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(matches > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_errors_preserve_their_category() {
        let err = CreateTxError::from(diesel::result::Error::RollbackTransaction);
        assert!(matches!(err, CreateTxError::Diesel(_)));
    }
}
