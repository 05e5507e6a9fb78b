//! Booking lifecycle domain service.
//!
//! Implements the booking driving ports over a [`BookingStore`]: input
//! presence checks and date normalization happen here, while the
//! concurrency-critical conflict check lives behind the store's atomic
//! creation protocol. The service never caches bookings; every decision is
//! delegated to a fresh store read.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::Error;
use crate::domain::dates::{BookingPeriod, DateValidationError, parse_booking_date};
use crate::domain::ports::{
    AvailabilityRequest, AvailabilityResponse, BookingDetailsPayload, BookingPayload, BookingStore,
    BookingStoreError, BookingsCommand, BookingsQuery, CancelBookingRequest, CreateBookingRequest,
    NewBooking, UserBookingsRequest, UserBookingsResponse, VehicleBookingsRequest,
    VehicleBookingsResponse,
};

fn map_store_error(error: BookingStoreError) -> Error {
    match error {
        BookingStoreError::Connection { message } => {
            Error::service_unavailable(format!("booking store unavailable: {message}"))
        }
        BookingStoreError::Query { message } => {
            Error::internal(format!("booking store error: {message}"))
        }
        BookingStoreError::VehicleMissing => Error::invalid_request("Vehicle not found"),
        BookingStoreError::Overlap => Error::conflict(
            "Requested dates overlap with an existing booking for this vehicle",
        ),
        BookingStoreError::BookingMissing => Error::not_found("Booking not found"),
    }
}

fn map_date_error(field: &str, error: DateValidationError) -> Error {
    match error {
        DateValidationError::Unparseable { value } => {
            Error::invalid_request(format!("{field} must be a valid date")).with_details(json!({
                "field": field,
                "value": value,
                "code": "invalid_date",
            }))
        }
        DateValidationError::InvalidRange { start, end } => {
            Error::invalid_request("startDate must be on or before endDate").with_details(json!({
                "startDate": start,
                "endDate": end,
                "code": "invalid_date_range",
            }))
        }
        DateValidationError::PastStart { start } => {
            Error::invalid_request("Cannot book dates in the past").with_details(json!({
                "startDate": start,
                "code": "past_start_date",
            }))
        }
    }
}

fn missing_field(field: &str) -> Error {
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": "missing_field",
    }))
}

/// Booking service implementing the command and query driving ports.
#[derive(Clone)]
pub struct BookingService<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> BookingService<S> {
    /// Create a new service over a booking store and a clock.
    ///
    /// The clock provides "today" for past-date checks; tests pin it to a
    /// fixed instant.
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Parse and validate a range of raw date strings into a period.
    ///
    /// Both fields must be present and parse; the range must be ordered.
    fn normalize_period(&self, raw_start: &str, raw_end: &str) -> Result<BookingPeriod, Error> {
        if raw_start.trim().is_empty() {
            return Err(missing_field("startDate"));
        }
        if raw_end.trim().is_empty() {
            return Err(missing_field("endDate"));
        }

        let start =
            parse_booking_date(raw_start).map_err(|err| map_date_error("startDate", err))?;
        let end = parse_booking_date(raw_end).map_err(|err| map_date_error("endDate", err))?;

        BookingPeriod::new(start, end).map_err(|err| map_date_error("startDate", err))
    }
}

#[async_trait]
impl<S> BookingsCommand for BookingService<S>
where
    S: BookingStore,
{
    async fn create_booking(
        &self,
        request: CreateBookingRequest,
    ) -> Result<BookingDetailsPayload, Error> {
        let period = self.normalize_period(&request.start_date, &request.end_date)?;

        // "Today" is the UTC calendar day; a booking starting today stays
        // valid for the whole day regardless of the caller's timezone.
        let today = self.clock.utc().date_naive();
        period
            .ensure_not_past(today)
            .map_err(|err| map_date_error("startDate", err))?;

        let created = self
            .store
            .create_confirmed(NewBooking {
                user_id: request.user_id,
                vehicle_id: request.vehicle_id,
                period,
            })
            .await
            .map_err(map_store_error)?;

        info!(
            booking_id = %created.booking.id,
            vehicle_id = %created.booking.vehicle_id,
            period = %created.booking.period,
            "booking confirmed"
        );

        Ok(BookingDetailsPayload::from(created))
    }

    async fn cancel_booking(
        &self,
        request: CancelBookingRequest,
    ) -> Result<BookingPayload, Error> {
        let cancelled = self
            .store
            .cancel(request.booking_id)
            .await
            .map_err(map_store_error)?;

        info!(booking_id = %cancelled.id, "booking cancelled");

        Ok(BookingPayload::from(cancelled))
    }
}

#[async_trait]
impl<S> BookingsQuery for BookingService<S>
where
    S: BookingStore,
{
    async fn vehicle_bookings(
        &self,
        request: VehicleBookingsRequest,
    ) -> Result<VehicleBookingsResponse, Error> {
        let bookings = self
            .store
            .list_for_vehicle(request.vehicle_id)
            .await
            .map_err(map_store_error)?;

        Ok(VehicleBookingsResponse {
            bookings: bookings.into_iter().map(BookingPayload::from).collect(),
        })
    }

    async fn user_bookings(
        &self,
        request: UserBookingsRequest,
    ) -> Result<UserBookingsResponse, Error> {
        let bookings = self
            .store
            .list_for_user(request.user_id)
            .await
            .map_err(map_store_error)?;

        Ok(UserBookingsResponse {
            bookings: bookings
                .into_iter()
                .map(BookingDetailsPayload::from)
                .collect(),
        })
    }

    async fn check_availability(
        &self,
        request: AvailabilityRequest,
    ) -> Result<AvailabilityResponse, Error> {
        let period = self.normalize_period(&request.start_date, &request.end_date)?;

        // Advisory only: no lock is taken and no past-date check applies, so
        // a probe for an elapsed range simply reports what the records say.
        let taken = self
            .store
            .has_confirmed_overlap(request.vehicle_id, period)
            .await
            .map_err(map_store_error)?;

        Ok(AvailabilityResponse { available: !taken })
    }
}

#[cfg(test)]
#[path = "booking_service_tests.rs"]
mod tests;
