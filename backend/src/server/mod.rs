//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_session::storage::CookieSessionStore;
use actix_session::{SessionMiddleware, config::CookieContentSecurity};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
use tracing::warn;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::BookingService;
use crate::domain::ports::InMemoryBookingStore;
use crate::inbound::http::bookings::{
    cancel_booking, check_availability, create_booking, list_my_bookings, list_vehicle_bookings,
};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::session::start_session;
use crate::inbound::http::state::HttpState;
use crate::middleware::trace::RequestTrace;
use crate::outbound::persistence::DieselBookingStore;

/// Build the booking ports bundle from the configured storage backend.
///
/// With a pool, bookings go through Diesel/PostgreSQL; without one the
/// in-memory store serves a demo fleet, which is only safe for a single
/// local process.
fn build_http_state(config: &ServerConfig) -> HttpState {
    let clock = Arc::new(DefaultClock);
    match &config.db_pool {
        Some(pool) => {
            let service = Arc::new(BookingService::new(
                Arc::new(DieselBookingStore::new(pool.clone())),
                clock,
            ));
            HttpState::new(service.clone(), service)
        }
        None => {
            warn!("no database configured; serving bookings from the in-memory store");
            let service = Arc::new(BookingService::new(
                Arc::new(InMemoryBookingStore::with_sample_fleet()),
                clock,
            ));
            HttpState::new(service.clone(), service)
        }
    }
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .build();

    let api = web::scope("/api/v1")
        .wrap(session)
        .service(start_session)
        .service(create_booking)
        .service(cancel_booking)
        .service(list_my_bookings)
        .service(check_availability)
        .service(list_vehicle_bookings);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(RequestTrace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server from the given configuration.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config));
    let server_health_state = health_state.clone();
    let ServerConfig {
        key,
        cookie_secure,
        bind_addr,
        db_pool: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
