//! Session helpers keeping HTTP handlers free of framework-specific logic.
//!
//! The real deployment sits behind an external authentication service; this
//! module carries only what the booking surface needs from it: a user id in
//! a cookie session. `POST /api/v1/session` stands in for that service so
//! the API is exercisable end to end.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload, post, web};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::validation::{FieldName, parse_uuid, require_field};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Newtype wrapper exposing higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's id in the session cookie.
    pub fn persist_user(&self, user_id: Uuid) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, user_id)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current user id from the session, if present.
    pub fn user_id(&self) -> Result<Option<Uuid>, Error> {
        self.0
            .get::<Uuid>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))
    }

    /// Require an authenticated user id or fail with `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<Uuid, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

/// Request body for `POST /api/v1/session`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequestBody {
    #[schema(format = "uuid")]
    pub user_id: Option<String>,
}

/// Response body echoing the session user.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionResponseBody {
    #[schema(format = "uuid")]
    pub user_id: String,
}

/// Establish a session for the given user id.
///
/// Stand-in for the external authentication stack: no credential check, just
/// a cookie carrying the caller-supplied identity.
#[utoipa::path(
    post,
    path = "/api/v1/session",
    request_body = StartSessionRequestBody,
    responses(
        (status = 200, description = "Session established", body = StartSessionResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["session"],
    operation_id = "startSession",
    security([])
)]
#[post("/session")]
pub async fn start_session(
    session: SessionContext,
    payload: web::Json<StartSessionRequestBody>,
) -> ApiResult<web::Json<StartSessionResponseBody>> {
    let field = FieldName::new("userId");
    let raw = require_field(payload.into_inner().user_id, field)?;
    let user_id = parse_uuid(&raw, field)?;

    session.persist_user(user_id)?;
    Ok(web::Json(StartSessionResponseBody {
        user_id: user_id.to_string(),
    }))
}
