//! Driving port for booking mutations.
//!
//! Inbound adapters submit raw date strings here; normalization and
//! validation happen behind the port so every adapter gets identical
//! semantics.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::booking::Booking;
use crate::domain::ports::booking_store::BookingWithVehicle;

/// Request to reserve a vehicle for an inclusive date range.
///
/// The date fields carry the caller's raw strings; the service normalizes
/// them (§ date handling) before any store access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub user_id: Uuid,
    pub vehicle_id: Uuid,
    pub start_date: String,
    pub end_date: String,
}

/// Request to cancel one booking by identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingRequest {
    pub booking_id: Uuid,
}

/// Serializable booking record for driving ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub id: Uuid,
    pub user_id: Uuid,
    pub vehicle_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingPayload {
    fn from(value: Booking) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            vehicle_id: value.vehicle_id,
            start_date: value.period.start(),
            end_date: value.period.end(),
            status: value.status.as_str().to_owned(),
            created_at: value.created_at,
        }
    }
}

/// Vehicle projection joined onto booking responses for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSummaryPayload {
    pub id: Uuid,
    pub name: String,
    pub registration_number: String,
    pub type_name: String,
    pub wheels: i16,
    pub metadata: Value,
}

/// A booking joined with its vehicle summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetailsPayload {
    pub booking: BookingPayload,
    pub vehicle: VehicleSummaryPayload,
}

impl From<BookingWithVehicle> for BookingDetailsPayload {
    fn from(value: BookingWithVehicle) -> Self {
        Self {
            booking: BookingPayload::from(value.booking),
            vehicle: VehicleSummaryPayload {
                id: value.vehicle.id,
                name: value.vehicle.name,
                registration_number: value.vehicle.registration_number,
                type_name: value.vehicle_type.name,
                wheels: value.vehicle_type.wheels,
                metadata: value.vehicle.metadata,
            },
        }
    }
}

/// Driving port for booking mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingsCommand: Send + Sync {
    /// Create a confirmed booking, or fail with a validation error (bad
    /// input, unknown vehicle), a conflict (overlap), or an infrastructure
    /// error.
    async fn create_booking(
        &self,
        request: CreateBookingRequest,
    ) -> Result<BookingDetailsPayload, Error>;

    /// Cancel a booking unconditionally; unknown ids are not found.
    /// Cancelling twice is indistinguishable from cancelling once.
    async fn cancel_booking(&self, request: CancelBookingRequest)
    -> Result<BookingPayload, Error>;
}
