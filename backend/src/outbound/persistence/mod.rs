//! PostgreSQL persistence adapters.

mod diesel_booking_store;
mod error_mapping;
mod migrations;
mod models;
mod pool;
pub(crate) mod schema;

pub use diesel_booking_store::DieselBookingStore;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
