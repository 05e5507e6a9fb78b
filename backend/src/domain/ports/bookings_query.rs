//! Driving port for booking read operations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::ports::bookings_command::{BookingDetailsPayload, BookingPayload};

/// Request to list a vehicle's bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleBookingsRequest {
    pub vehicle_id: Uuid,
}

/// A vehicle's bookings, any status, ordered by start date ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleBookingsResponse {
    pub bookings: Vec<BookingPayload>,
}

/// Request to list a user's bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBookingsRequest {
    pub user_id: Uuid,
}

/// A user's bookings, newest first, joined with vehicle summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBookingsResponse {
    pub bookings: Vec<BookingDetailsPayload>,
}

/// Request for an advisory availability probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest {
    pub vehicle_id: Uuid,
    pub start_date: String,
    pub end_date: String,
}

/// Point-in-time availability hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub available: bool,
}

/// Driving port for booking reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingsQuery: Send + Sync {
    /// List a vehicle's bookings ordered by start date.
    async fn vehicle_bookings(
        &self,
        request: VehicleBookingsRequest,
    ) -> Result<VehicleBookingsResponse, Error>;

    /// List a user's bookings newest first, joined for display.
    async fn user_bookings(
        &self,
        request: UserBookingsRequest,
    ) -> Result<UserBookingsResponse, Error>;

    /// Advisory availability probe.
    ///
    /// This read takes no locks and can disagree with a concurrent
    /// creation; treat the answer as a hint. The authoritative check is the
    /// one embedded in booking creation itself.
    async fn check_availability(
        &self,
        request: AvailabilityRequest,
    ) -> Result<AvailabilityResponse, Error>;
}
