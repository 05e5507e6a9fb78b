//! Booking HTTP handlers.
//!
//! ```text
//! POST  /api/v1/bookings
//! PATCH /api/v1/bookings/{id}/cancel
//! GET   /api/v1/bookings/my
//! GET   /api/v1/bookings/availability?vehicleId&startDate&endDate
//! GET   /api/v1/vehicles/{vehicleId}/bookings
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::{
    AvailabilityRequest, BookingDetailsPayload, BookingPayload, CancelBookingRequest,
    CreateBookingRequest, UserBookingsRequest, VehicleBookingsRequest,
};
use crate::domain::quote;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid, require_field};

/// Request payload for creating a booking.
///
/// Dates travel as raw strings; the domain owns their interpretation.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequestBody {
    #[schema(format = "uuid")]
    pub vehicle_id: Option<String>,
    #[schema(example = "2030-06-01")]
    pub start_date: Option<String>,
    #[schema(example = "2030-06-03")]
    pub end_date: Option<String>,
}

/// Vehicle projection embedded in booking responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleBody {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[schema(value_type = Object)]
    pub metadata: Value,
}

/// A booking joined with its vehicle and derived price.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponseBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub vehicle_id: String,
    #[schema(example = "2030-06-01")]
    pub start_date: String,
    #[schema(example = "2030-06-03")]
    pub end_date: String,
    #[schema(example = "confirmed")]
    pub status: String,
    #[schema(format = "date-time")]
    pub created_at: String,
    pub total_amount: f64,
    pub vehicle: VehicleBody,
}

impl From<BookingDetailsPayload> for BookingResponseBody {
    fn from(value: BookingDetailsPayload) -> Self {
        // Derived pricing is a pure presentation step layered on top of the
        // consistency core's result.
        let total_amount = quote::total_amount(
            value.booking.start_date,
            value.booking.end_date,
            &value.vehicle.metadata,
        );

        Self {
            id: value.booking.id.to_string(),
            vehicle_id: value.booking.vehicle_id.to_string(),
            start_date: value.booking.start_date.to_string(),
            end_date: value.booking.end_date.to_string(),
            status: value.booking.status,
            created_at: value.booking.created_at.to_rfc3339(),
            total_amount,
            vehicle: VehicleBody {
                name: value.vehicle.name,
                type_name: value.vehicle.type_name,
                metadata: value.vehicle.metadata,
            },
        }
    }
}

/// A bare booking record without vehicle joins.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummaryBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub user_id: String,
    #[schema(format = "uuid")]
    pub vehicle_id: String,
    #[schema(example = "2030-06-01")]
    pub start_date: String,
    #[schema(example = "2030-06-03")]
    pub end_date: String,
    #[schema(example = "cancelled")]
    pub status: String,
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<BookingPayload> for BookingSummaryBody {
    fn from(value: BookingPayload) -> Self {
        Self {
            id: value.id.to_string(),
            user_id: value.user_id.to_string(),
            vehicle_id: value.vehicle_id.to_string(),
            start_date: value.start_date.to_string(),
            end_date: value.end_date.to_string(),
            status: value.status,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// Query parameters for the availability probe.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityParams {
    pub vehicle_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Availability probe result.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityBody {
    pub available: bool,
}

/// Reserve a vehicle for the session user.
///
/// Creation is atomic against concurrent requests for the same vehicle: at
/// most one of any set of overlapping requests succeeds, the rest receive
/// `409 Conflict`.
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    request_body = CreateBookingRequestBody,
    responses(
        (status = 201, description = "Booking confirmed", body = BookingResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 409, description = "Dates overlap an existing booking", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "createBooking",
    security(("SessionCookie" = []))
)]
#[post("/bookings")]
pub async fn create_booking(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateBookingRequestBody>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let body = payload.into_inner();

    let vehicle_field = FieldName::new("vehicleId");
    let vehicle_id = parse_uuid(&require_field(body.vehicle_id, vehicle_field)?, vehicle_field)?;
    let start_date = require_field(body.start_date, FieldName::new("startDate"))?;
    let end_date = require_field(body.end_date, FieldName::new("endDate"))?;

    let details = state
        .bookings
        .create_booking(CreateBookingRequest {
            user_id,
            vehicle_id,
            start_date,
            end_date,
        })
        .await?;

    Ok(HttpResponse::Created().json(BookingResponseBody::from(details)))
}

/// Cancel a booking.
///
/// Cancelling an already-cancelled booking succeeds and changes nothing.
#[utoipa::path(
    patch,
    path = "/api/v1/bookings/{id}/cancel",
    params(("id" = String, Path, description = "Booking identifier")),
    responses(
        (status = 200, description = "Booking cancelled", body = BookingSummaryBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown booking", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "cancelBooking",
    security([])
)]
#[patch("/bookings/{id}/cancel")]
pub async fn cancel_booking(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<BookingSummaryBody>> {
    let booking_id = parse_uuid(&path.into_inner(), FieldName::new("id"))?;

    let cancelled = state
        .bookings
        .cancel_booking(CancelBookingRequest { booking_id })
        .await?;

    Ok(web::Json(BookingSummaryBody::from(cancelled)))
}

/// List the session user's bookings, newest first, with price quotes.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/my",
    responses(
        (status = 200, description = "The user's bookings", body = [BookingResponseBody]),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "listMyBookings",
    security(("SessionCookie" = []))
)]
#[get("/bookings/my")]
pub async fn list_my_bookings(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<BookingResponseBody>>> {
    let user_id = session.require_user_id()?;

    let listed = state
        .bookings_query
        .user_bookings(UserBookingsRequest { user_id })
        .await?;

    Ok(web::Json(
        listed
            .bookings
            .into_iter()
            .map(BookingResponseBody::from)
            .collect(),
    ))
}

/// Probe whether a vehicle is free for a date range.
///
/// The answer is a point-in-time hint only: it takes no locks and can be
/// stale by the time the caller acts on it. The authoritative conflict check
/// happens inside booking creation.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/availability",
    params(
        ("vehicleId" = String, Query, description = "Vehicle identifier"),
        ("startDate" = String, Query, description = "First day of the range"),
        ("endDate" = String, Query, description = "Last day of the range")
    ),
    responses(
        (status = 200, description = "Availability hint", body = AvailabilityBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "checkAvailability",
    security([])
)]
#[get("/bookings/availability")]
pub async fn check_availability(
    state: web::Data<HttpState>,
    params: web::Query<AvailabilityParams>,
) -> ApiResult<web::Json<AvailabilityBody>> {
    let params = params.into_inner();

    let vehicle_field = FieldName::new("vehicleId");
    let vehicle_id = parse_uuid(&require_field(params.vehicle_id, vehicle_field)?, vehicle_field)?;
    let start_date = require_field(params.start_date, FieldName::new("startDate"))?;
    let end_date = require_field(params.end_date, FieldName::new("endDate"))?;

    let response = state
        .bookings_query
        .check_availability(AvailabilityRequest {
            vehicle_id,
            start_date,
            end_date,
        })
        .await?;

    Ok(web::Json(AvailabilityBody {
        available: response.available,
    }))
}

/// List a vehicle's bookings ordered by start date.
#[utoipa::path(
    get,
    path = "/api/v1/vehicles/{vehicleId}/bookings",
    params(("vehicleId" = String, Path, description = "Vehicle identifier")),
    responses(
        (status = 200, description = "The vehicle's bookings", body = [BookingSummaryBody]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "listVehicleBookings",
    security([])
)]
#[get("/vehicles/{vehicleId}/bookings")]
pub async fn list_vehicle_bookings(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<BookingSummaryBody>>> {
    let vehicle_id = parse_uuid(&path.into_inner(), FieldName::new("vehicleId"))?;

    let listed = state
        .bookings_query
        .vehicle_bookings(VehicleBookingsRequest { vehicle_id })
        .await?;

    Ok(web::Json(
        listed
            .bookings
            .into_iter()
            .map(BookingSummaryBody::from)
            .collect(),
    ))
}

#[cfg(test)]
#[path = "bookings_tests.rs"]
mod tests;
