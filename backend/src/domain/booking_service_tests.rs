//! Tests for the booking lifecycle service.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;
use uuid::Uuid;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::booking::{Booking, BookingStatus};
use crate::domain::ports::{BookingWithVehicle, MockBookingStore};
use crate::domain::vehicle::{Vehicle, VehicleType};

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

/// Clock pinned to 2030-06-01 10:30 UTC.
fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: Utc
            .with_ymd_and_hms(2030, 6, 1, 10, 30, 0)
            .single()
            .expect("valid fixture timestamp"),
    })
}

fn day(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid test date")
}

fn sample_request() -> CreateBookingRequest {
    CreateBookingRequest {
        user_id: Uuid::new_v4(),
        vehicle_id: Uuid::new_v4(),
        start_date: "2030-06-10".to_owned(),
        end_date: "2030-06-12".to_owned(),
    }
}

fn created_fixture(request: &CreateBookingRequest) -> BookingWithVehicle {
    let type_id = Uuid::new_v4();
    BookingWithVehicle {
        booking: Booking {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            vehicle_id: request.vehicle_id,
            period: BookingPeriod::new(day("2030-06-10"), day("2030-06-12"))
                .expect("valid test period"),
            status: BookingStatus::Confirmed,
            created_at: Utc::now(),
        },
        vehicle: Vehicle {
            id: request.vehicle_id,
            name: "Honda City".to_owned(),
            registration_number: "UP32EF9012".to_owned(),
            type_id,
            metadata: serde_json::json!({ "pricePerDay": 2000 }),
        },
        vehicle_type: VehicleType {
            id: type_id,
            name: "sedan".to_owned(),
            wheels: 4,
        },
    }
}

fn detail_code(error: &Error) -> Option<String> {
    error
        .details()
        .and_then(|details| details.get("code"))
        .and_then(|code| code.as_str())
        .map(str::to_owned)
}

#[tokio::test]
async fn create_passes_the_normalized_period_to_the_store() {
    let request = sample_request();
    let fixture = created_fixture(&request);
    let expected_vehicle = request.vehicle_id;

    let mut store = MockBookingStore::new();
    store
        .expect_create_confirmed()
        .times(1)
        .withf(move |new_booking| {
            new_booking.vehicle_id == expected_vehicle
                && new_booking.period.start() == day("2030-06-10")
                && new_booking.period.end() == day("2030-06-12")
        })
        .return_once(move |_| Ok(fixture));

    let service = BookingService::new(Arc::new(store), fixture_clock());
    let details = service
        .create_booking(request)
        .await
        .expect("creation succeeds");

    assert_eq!(details.booking.status, "confirmed");
    assert_eq!(details.vehicle.type_name, "sedan");
}

#[tokio::test]
async fn create_accepts_a_booking_starting_today() {
    let mut request = sample_request();
    request.start_date = "2030-06-01".to_owned();
    request.end_date = "2030-06-01".to_owned();
    let fixture = created_fixture(&request);

    let mut store = MockBookingStore::new();
    store
        .expect_create_confirmed()
        .times(1)
        .return_once(move |_| Ok(fixture));

    let service = BookingService::new(Arc::new(store), fixture_clock());
    service
        .create_booking(request)
        .await
        .expect("single-day booking starting today succeeds");
}

#[tokio::test]
async fn create_rejects_missing_dates_before_touching_the_store() {
    let mut request = sample_request();
    request.start_date = "  ".to_owned();

    let mut store = MockBookingStore::new();
    store.expect_create_confirmed().times(0);

    let service = BookingService::new(Arc::new(store), fixture_clock());
    let error = service
        .create_booking(request)
        .await
        .expect_err("missing start date");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(detail_code(&error).as_deref(), Some("missing_field"));
}

#[tokio::test]
async fn create_rejects_unparseable_dates() {
    let mut request = sample_request();
    request.end_date = "next-tuesday".to_owned();

    let mut store = MockBookingStore::new();
    store.expect_create_confirmed().times(0);

    let service = BookingService::new(Arc::new(store), fixture_clock());
    let error = service
        .create_booking(request)
        .await
        .expect_err("unparseable end date");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(detail_code(&error).as_deref(), Some("invalid_date"));
}

#[tokio::test]
async fn create_rejects_reversed_ranges() {
    let mut request = sample_request();
    request.start_date = "2030-06-12".to_owned();
    request.end_date = "2030-06-10".to_owned();

    let mut store = MockBookingStore::new();
    store.expect_create_confirmed().times(0);

    let service = BookingService::new(Arc::new(store), fixture_clock());
    let error = service
        .create_booking(request)
        .await
        .expect_err("reversed range");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(detail_code(&error).as_deref(), Some("invalid_date_range"));
}

#[tokio::test]
async fn create_rejects_past_start_dates() {
    let mut request = sample_request();
    // One day before the pinned "today".
    request.start_date = "2030-05-31".to_owned();
    request.end_date = "2030-06-02".to_owned();

    let mut store = MockBookingStore::new();
    store.expect_create_confirmed().times(0);

    let service = BookingService::new(Arc::new(store), fixture_clock());
    let error = service
        .create_booking(request)
        .await
        .expect_err("past start date");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(detail_code(&error).as_deref(), Some("past_start_date"));
}

#[tokio::test]
async fn create_maps_missing_vehicles_to_invalid_request() {
    let mut store = MockBookingStore::new();
    store
        .expect_create_confirmed()
        .times(1)
        .return_once(|_| Err(BookingStoreError::VehicleMissing));

    let service = BookingService::new(Arc::new(store), fixture_clock());
    let error = service
        .create_booking(sample_request())
        .await
        .expect_err("unknown vehicle");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "Vehicle not found");
}

#[tokio::test]
async fn create_maps_overlaps_to_conflict() {
    let mut store = MockBookingStore::new();
    store
        .expect_create_confirmed()
        .times(1)
        .return_once(|_| Err(BookingStoreError::Overlap));

    let service = BookingService::new(Arc::new(store), fixture_clock());
    let error = service
        .create_booking(sample_request())
        .await
        .expect_err("overlap");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn create_maps_connection_failures_to_service_unavailable() {
    let mut store = MockBookingStore::new();
    store
        .expect_create_confirmed()
        .times(1)
        .return_once(|_| Err(BookingStoreError::connection("pool exhausted")));

    let service = BookingService::new(Arc::new(store), fixture_clock());
    let error = service
        .create_booking(sample_request())
        .await
        .expect_err("connection failure");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn cancel_maps_unknown_bookings_to_not_found() {
    let mut store = MockBookingStore::new();
    store
        .expect_cancel()
        .times(1)
        .return_once(|_| Err(BookingStoreError::BookingMissing));

    let service = BookingService::new(Arc::new(store), fixture_clock());
    let error = service
        .cancel_booking(CancelBookingRequest {
            booking_id: Uuid::new_v4(),
        })
        .await
        .expect_err("unknown booking");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn availability_inverts_the_overlap_probe() {
    let vehicle_id = Uuid::new_v4();

    let mut store = MockBookingStore::new();
    store
        .expect_has_confirmed_overlap()
        .times(1)
        .withf(move |probed, period| {
            *probed == vehicle_id
                && period.start() == day("2030-06-02")
                && period.end() == day("2030-06-02")
        })
        .return_once(|_, _| Ok(true));

    let service = BookingService::new(Arc::new(store), fixture_clock());
    let response = service
        .check_availability(AvailabilityRequest {
            vehicle_id,
            start_date: "2030-06-02".to_owned(),
            end_date: "2030-06-02".to_owned(),
        })
        .await
        .expect("probe succeeds");

    assert!(!response.available);
}

#[tokio::test]
async fn availability_allows_elapsed_ranges() {
    // Unlike creation, the advisory probe answers for past ranges too.
    let mut store = MockBookingStore::new();
    store
        .expect_has_confirmed_overlap()
        .times(1)
        .return_once(|_, _| Ok(false));

    let service = BookingService::new(Arc::new(store), fixture_clock());
    let response = service
        .check_availability(AvailabilityRequest {
            vehicle_id: Uuid::new_v4(),
            start_date: "2020-01-01".to_owned(),
            end_date: "2020-01-05".to_owned(),
        })
        .await
        .expect("probe succeeds");

    assert!(response.available);
}

#[tokio::test]
async fn listings_map_records_into_payloads() {
    let request = sample_request();
    let fixture = created_fixture(&request);
    let user_id = request.user_id;
    let vehicle_id = request.vehicle_id;
    let booking_only = fixture.booking.clone();

    let mut store = MockBookingStore::new();
    store
        .expect_list_for_vehicle()
        .times(1)
        .return_once(move |_| Ok(vec![booking_only]));
    store
        .expect_list_for_user()
        .times(1)
        .return_once(move |_| Ok(vec![fixture]));

    let service = BookingService::new(Arc::new(store), fixture_clock());

    let for_vehicle = service
        .vehicle_bookings(VehicleBookingsRequest { vehicle_id })
        .await
        .expect("vehicle listing succeeds");
    assert_eq!(for_vehicle.bookings.len(), 1);
    assert_eq!(for_vehicle.bookings[0].vehicle_id, vehicle_id);

    let for_user = service
        .user_bookings(UserBookingsRequest { user_id })
        .await
        .expect("user listing succeeds");
    assert_eq!(for_user.bookings.len(), 1);
    assert_eq!(for_user.bookings[0].vehicle.name, "Honda City");
}
