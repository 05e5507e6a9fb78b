//! Vehicle catalog reference data.
//!
//! Vehicles and their types are seeded by catalog tooling and read-only from
//! the booking core's perspective; the core only resolves them for existence
//! checks and display joins.

use serde_json::Value;
use uuid::Uuid;

/// A bookable vehicle.
///
/// `metadata` is an opaque bag (colour, year, fuel type, per-day price and
/// whatever else the catalog records); the core never validates its shape
/// and only the pricing quote peeks inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: Uuid,
    pub name: String,
    pub registration_number: String,
    pub type_id: Uuid,
    pub metadata: Value,
}

/// Immutable vehicle classification (e.g. "sedan", four wheels).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleType {
    pub id: Uuid,
    pub name: String,
    pub wheels: i16,
}
