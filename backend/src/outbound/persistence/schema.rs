//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the embedded migrations exactly; Diesel uses
//! them for compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// Immutable vehicle classifications.
    vehicle_types (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Classification name, e.g. "sedan".
        name -> Varchar,
        /// Wheel count (2 or 4).
        wheels -> Int2,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Bookable vehicles, seeded by catalog tooling.
    vehicles (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name, e.g. "Honda City".
        name -> Varchar,
        /// Unique registration identifier.
        registration_number -> Varchar,
        /// Owning vehicle type.
        type_id -> Uuid,
        /// Opaque metadata bag (colour, year, fuel type, per-day price).
        metadata -> Jsonb,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Reservations; never deleted, only cancelled.
    bookings (id) {
        /// Primary key: UUID v4 identifier generated by the application.
        id -> Uuid,
        /// Owning user.
        user_id -> Uuid,
        /// Reserved vehicle.
        vehicle_id -> Uuid,
        /// First rented day.
        start_date -> Date,
        /// Last rented day (inclusive).
        end_date -> Date,
        /// Lifecycle state: "confirmed" or "cancelled".
        status -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}
