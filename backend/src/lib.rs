//! Kerbside backend library modules.
//!
//! A vehicle rental booking service built around one guarantee: two
//! confirmed bookings for the same vehicle never overlap, even when
//! requests race across service instances. The crate is laid out
//! hexagonally: `domain` holds entities, ports, and services, while
//! `inbound` and `outbound` hold the HTTP and PostgreSQL adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
