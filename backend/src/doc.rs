//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the OpenAPI specification for the REST API. The
//! generated document backs Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/session.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Kerbside booking API",
        description = "Vehicle rental bookings: creation with overlap prevention, \
                       cancellation, listings, and advisory availability probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::bookings::create_booking,
        crate::inbound::http::bookings::cancel_booking,
        crate::inbound::http::bookings::list_my_bookings,
        crate::inbound::http::bookings::check_availability,
        crate::inbound::http::bookings::list_vehicle_bookings,
        crate::inbound::http::session::start_session,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        crate::domain::Error,
        crate::domain::ErrorCode,
    )),
    tags(
        (name = "bookings", description = "Booking lifecycle"),
        (name = "session", description = "Session establishment"),
        (name = "health", description = "Orchestration probes")
    )
)]
pub struct ApiDoc;
