//! Domain entities, ports, and services for the booking core.
//!
//! The domain layer is transport and storage agnostic: inbound adapters call
//! the driving ports ([`ports::BookingsCommand`], [`ports::BookingsQuery`])
//! and outbound adapters implement the driven port ([`ports::BookingStore`]).
//! Invariants live with the types that own them: range ordering in
//! [`dates::BookingPeriod`], lifecycle transitions in
//! [`booking::BookingStatus`], conflict atomicity behind the store port.

pub mod booking;
pub mod booking_service;
pub mod dates;
pub mod error;
pub mod ports;
pub mod quote;
pub mod vehicle;

pub use self::booking::{Booking, BookingStatus};
pub use self::booking_service::BookingService;
pub use self::dates::BookingPeriod;
pub use self::error::{Error, ErrorCode};
pub use self::vehicle::{Vehicle, VehicleType};

/// Convenient result alias for domain operations.
pub type DomainResult<T> = Result<T, Error>;
