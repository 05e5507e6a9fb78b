//! Port for booking persistence and the atomic creation protocol.
//!
//! The store owns the concurrency-critical section: `create_confirmed` must
//! re-check vehicle existence, evaluate the overlap predicate under a
//! write-serializing lock scoped to the vehicle's conflicting rows, and
//! insert, all as one atomic unit of work. A naive check-then-insert
//! without a shared serialization point lets two racing requests both pass
//! the check before either inserts, producing a double booking. Correctness
//! must come from the storage transaction, not from in-process coordination:
//! several service instances may share one database.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::booking::{Booking, BookingStatus};
use crate::domain::dates::BookingPeriod;
use crate::domain::vehicle::{Vehicle, VehicleType};

/// Errors raised by booking store adapters.
///
/// `VehicleMissing`, `Overlap` and `BookingMissing` are expected business
/// outcomes the service maps to distinct response codes; `Connection` and
/// `Query` are infrastructure failures surfaced opaquely.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingStoreError {
    /// Store connection could not be established.
    #[error("booking store connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("booking store query failed: {message}")]
    Query { message: String },

    /// The referenced vehicle does not exist.
    #[error("vehicle not found")]
    VehicleMissing,

    /// A confirmed booking already occupies part of the requested period.
    #[error("requested dates overlap an existing booking for this vehicle")]
    Overlap,

    /// The referenced booking does not exist.
    #[error("booking not found")]
    BookingMissing,
}

impl BookingStoreError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Input for the atomic creation protocol.
///
/// Dates arrive already normalized and validated; the store only re-checks
/// state that can change between requests (vehicle existence, conflicts).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewBooking {
    pub user_id: Uuid,
    pub vehicle_id: Uuid,
    pub period: BookingPeriod,
}

/// A booking joined with its vehicle and type for pricing and display.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingWithVehicle {
    pub booking: Booking,
    pub vehicle: Vehicle,
    pub vehicle_type: VehicleType,
}

/// Port for booking writes and reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Atomically create a confirmed booking.
    ///
    /// Within one unit of work: look up the vehicle
    /// ([`BookingStoreError::VehicleMissing`] when absent), read the
    /// vehicle's confirmed bookings intersecting `period` under a
    /// write-serializing lock, fail with [`BookingStoreError::Overlap`] when
    /// any exist, otherwise insert and commit. Nothing is written on any
    /// failure. Concurrent creations for the same vehicle serialize on the
    /// locked read; unrelated vehicles proceed in parallel.
    async fn create_confirmed(
        &self,
        booking: NewBooking,
    ) -> Result<BookingWithVehicle, BookingStoreError>;

    /// Set a booking's status to cancelled and return the updated record.
    ///
    /// Cancelling an already-cancelled booking is a permissive no-op; only
    /// an unknown id fails, with [`BookingStoreError::BookingMissing`].
    async fn cancel(&self, booking_id: Uuid) -> Result<Booking, BookingStoreError>;

    /// All bookings for a vehicle regardless of status, ordered by start
    /// date ascending.
    async fn list_for_vehicle(&self, vehicle_id: Uuid) -> Result<Vec<Booking>, BookingStoreError>;

    /// All bookings for a user ordered by creation time descending, joined
    /// with vehicle and type for display.
    async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<BookingWithVehicle>, BookingStoreError>;

    /// Advisory overlap probe: whether any confirmed booking for the
    /// vehicle intersects `period`.
    ///
    /// Takes no locks and can race with a concurrent [`Self::create_confirmed`];
    /// the only authoritative conflict check is the one inside the creation
    /// transaction.
    async fn has_confirmed_overlap(
        &self,
        vehicle_id: Uuid,
        period: BookingPeriod,
    ) -> Result<bool, BookingStoreError>;
}

#[derive(Debug, Default)]
struct StoreState {
    vehicles: Vec<(Vehicle, VehicleType)>,
    bookings: Vec<Booking>,
}

/// Mutex-serialized in-memory implementation of the booking store.
///
/// The store-wide lock plays the role the database transaction plays in the
/// PostgreSQL adapter: a whole `create_confirmed` call runs inside one
/// critical section, so the port's serialization contract holds. That makes
/// this adapter suitable for tests and for running the server without a
/// database, and unsuitable for multi-instance deployments.
#[derive(Debug, Default)]
pub struct InMemoryBookingStore {
    state: Mutex<StoreState>,
}

impl InMemoryBookingStore {
    /// Create an empty store with no vehicles.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a vehicle and its type so bookings can reference them.
    pub async fn seed_vehicle(&self, vehicle: Vehicle, vehicle_type: VehicleType) {
        let mut state = self.state.lock().await;
        state.vehicles.push((vehicle, vehicle_type));
    }

    /// Vehicles currently registered, for startup logging and tests.
    pub async fn vehicles(&self) -> Vec<Vehicle> {
        let state = self.state.lock().await;
        state
            .vehicles
            .iter()
            .map(|(vehicle, _)| vehicle.clone())
            .collect()
    }

    /// A store pre-seeded with a small demonstration fleet.
    ///
    /// Each seeded vehicle is logged so callers of a database-less server
    /// have ids to book against.
    pub fn with_sample_fleet() -> Self {
        let sedan = VehicleType {
            id: Uuid::new_v4(),
            name: "sedan".to_owned(),
            wheels: 4,
        };
        let hatchback = VehicleType {
            id: Uuid::new_v4(),
            name: "hatchback".to_owned(),
            wheels: 4,
        };
        let cruiser = VehicleType {
            id: Uuid::new_v4(),
            name: "cruiser".to_owned(),
            wheels: 2,
        };

        let fleet = [
            ("Honda City", "UP32EF9012", &sedan, 2000),
            ("Hyundai i10", "UP32AB1234", &hatchback, 1200),
            ("Royal Enfield Classic", "UP32GH3456", &cruiser, 900),
        ];
        let vehicles = fleet
            .into_iter()
            .map(|(name, registration, vehicle_type, rate)| {
                let vehicle = Vehicle {
                    id: Uuid::new_v4(),
                    name: name.to_owned(),
                    registration_number: registration.to_owned(),
                    type_id: vehicle_type.id,
                    metadata: serde_json::json!({ "pricePerDay": rate }),
                };
                tracing::info!(
                    vehicle_id = %vehicle.id,
                    name = %vehicle.name,
                    vehicle_type = %vehicle_type.name,
                    "seeded demo vehicle"
                );
                (vehicle, vehicle_type.clone())
            })
            .collect();

        Self {
            state: Mutex::new(StoreState {
                vehicles,
                bookings: Vec::new(),
            }),
        }
    }
}

fn joined(
    state: &StoreState,
    booking: Booking,
) -> Result<BookingWithVehicle, BookingStoreError> {
    let (vehicle, vehicle_type) = state
        .vehicles
        .iter()
        .find(|(vehicle, _)| vehicle.id == booking.vehicle_id)
        .ok_or_else(|| BookingStoreError::query("booking references an unregistered vehicle"))?;

    Ok(BookingWithVehicle {
        booking,
        vehicle: vehicle.clone(),
        vehicle_type: vehicle_type.clone(),
    })
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn create_confirmed(
        &self,
        new_booking: NewBooking,
    ) -> Result<BookingWithVehicle, BookingStoreError> {
        let mut state = self.state.lock().await;

        if !state
            .vehicles
            .iter()
            .any(|(vehicle, _)| vehicle.id == new_booking.vehicle_id)
        {
            return Err(BookingStoreError::VehicleMissing);
        }

        let conflict = state.bookings.iter().any(|existing| {
            existing.vehicle_id == new_booking.vehicle_id
                && existing.conflicts_with(&new_booking.period)
        });
        if conflict {
            return Err(BookingStoreError::Overlap);
        }

        let booking = Booking {
            id: Uuid::new_v4(),
            user_id: new_booking.user_id,
            vehicle_id: new_booking.vehicle_id,
            period: new_booking.period,
            status: BookingStatus::Confirmed,
            created_at: Utc::now(),
        };
        state.bookings.push(booking.clone());

        joined(&state, booking)
    }

    async fn cancel(&self, booking_id: Uuid) -> Result<Booking, BookingStoreError> {
        let mut state = self.state.lock().await;
        let booking = state
            .bookings
            .iter_mut()
            .find(|booking| booking.id == booking_id)
            .ok_or(BookingStoreError::BookingMissing)?;

        booking.status = BookingStatus::Cancelled;
        Ok(booking.clone())
    }

    async fn list_for_vehicle(&self, vehicle_id: Uuid) -> Result<Vec<Booking>, BookingStoreError> {
        let state = self.state.lock().await;
        let mut bookings: Vec<Booking> = state
            .bookings
            .iter()
            .filter(|booking| booking.vehicle_id == vehicle_id)
            .cloned()
            .collect();
        bookings.sort_by_key(|booking| booking.period.start());
        Ok(bookings)
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<BookingWithVehicle>, BookingStoreError> {
        let state = self.state.lock().await;
        let mut bookings: Vec<Booking> = state
            .bookings
            .iter()
            .filter(|booking| booking.user_id == user_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        bookings
            .into_iter()
            .map(|booking| joined(&state, booking))
            .collect()
    }

    async fn has_confirmed_overlap(
        &self,
        vehicle_id: Uuid,
        period: BookingPeriod,
    ) -> Result<bool, BookingStoreError> {
        let state = self.state.lock().await;
        Ok(state.bookings.iter().any(|booking| {
            booking.vehicle_id == vehicle_id && booking.conflicts_with(&period)
        }))
    }
}
