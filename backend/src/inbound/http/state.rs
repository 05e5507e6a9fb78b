//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the domain driving ports and remain testable without I/O. The
//! ports are injected at server construction; no handler reaches for a
//! process-wide client.

use std::sync::Arc;

use crate::domain::ports::{BookingsCommand, BookingsQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub bookings: Arc<dyn BookingsCommand>,
    pub bookings_query: Arc<dyn BookingsQuery>,
}

impl HttpState {
    /// Construct state from the booking driving ports.
    pub fn new(bookings: Arc<dyn BookingsCommand>, bookings_query: Arc<dyn BookingsQuery>) -> Self {
        Self {
            bookings,
            bookings_query,
        }
    }
}
