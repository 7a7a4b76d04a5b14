//! Address routes.
//!
//! | Route | Guarded | Success |
//! |---|---|---|
//! | `GET /address` | no | `200` JSON array |
//! | `POST /address` | yes | `200` JSON record |
//! | `DELETE /address/{id}` | yes | `200` confirmation + `user: [record]` |
//!
//! Handlers return `Result<Response, ApiError>`; every core failure maps to
//! exactly one status code in [`ApiError`]'s `IntoResponse` impl.
//!
//! Status codes, the delete body, and the 404 text are what existing clients
//! of this service already parse, so they stay as they are even where a
//! fresh design would pick `201` or name the key `address`.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::{error, info};

use crate::address::{AddressId, AddressRecord, NewAddress};
use crate::config::{Config, Environment};
use crate::guard::{AccessGuard, Unauthorized};
use crate::health;
use crate::method::Method;
use crate::middleware::{Cors, SecurityHeaders};
use crate::request::Request;
use crate::response::{IntoResponse, Response, ResponseBuilder};
use crate::router::Router;
use crate::status::Status;
use crate::store::{AddressStore, NotFound};
use crate::validate::{ValidationError, validate};

const DELETED: &str = "Successfully deleted address";
const NOT_FOUND: &str = "User not found";

// ── State ─────────────────────────────────────────────────────────────────────

/// Everything the handlers share.
#[derive(Debug)]
pub struct AppState {
    pub store: AddressStore,
    pub guard: AccessGuard,
    pub environment: Environment,
}

impl AppState {
    pub fn new(store: AddressStore, guard: AccessGuard, environment: Environment) -> Self {
        Self { store, guard, environment }
    }

    /// Seeded store, guard keyed on the configured token.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            AddressStore::seeded(),
            AccessGuard::new(config.api_token.clone()),
            config.environment,
        )
    }

    /// Finishes `builder` with `value` as JSON, or yields a 500 whose detail
    /// depends on the environment.
    fn json<T: Serialize>(&self, builder: ResponseBuilder, value: &T) -> Result<Response, ApiError> {
        serde_json::to_vec(value)
            .map(|body| builder.json(body))
            .map_err(|e| self.internal(e))
    }

    fn internal(&self, err: impl std::fmt::Display) -> ApiError {
        error!("internal error: {err}");
        let detail = (!self.environment.is_production()).then(|| err.to_string());
        ApiError::Internal(detail)
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

/// Every way an address route can fail.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Unauthorized(#[from] Unauthorized),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    NotFound(#[from] NotFound),
    #[error("Malformed request body: {0}")]
    MalformedBody(String),
    #[error("Internal error")]
    Internal(Option<String>),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Unauthorized(_) => (Status::Unauthorized, json!({ "error": self.to_string() })),
            Self::Internal(Some(detail)) => (
                Status::InternalServerError,
                json!({ "message": self.to_string(), "error": detail }),
            ),
            Self::Internal(None) => (Status::InternalServerError, json!({ "message": self.to_string() })),
            Self::Validation(_) | Self::MalformedBody(_) => {
                return Response::builder().status(Status::BadRequest).text(self.to_string());
            }
            Self::NotFound(_) => {
                return Response::builder().status(Status::NotFound).text(NOT_FOUND);
            }
        };
        Response::builder().status(status).json(body.to_string().into_bytes())
    }
}

// ── Routes ────────────────────────────────────────────────────────────────────

/// The complete service: address routes, health checks, CORS and security headers.
pub fn router(state: Arc<AppState>) -> Router<AppState> {
    Router::with_state(state)
        .on(Method::Get,    "/",             health::greeting)
        .on(Method::Get,    "/healthz",      health::liveness)
        .on(Method::Get,    "/readyz",       health::readiness)
        .on(Method::Get,    "/address",      list_addresses)
        .on(Method::Post,   "/address",      create_address)
        .on(Method::Delete, "/address/{id}", delete_address)
        .layer(Cors)
        .layer(SecurityHeaders)
}

// GET /address
async fn list_addresses(state: Arc<AppState>, _req: Request) -> Result<Response, ApiError> {
    state.json(Response::builder(), &state.store.list())
}

// POST /address
async fn create_address(state: Arc<AppState>, req: Request) -> Result<Response, ApiError> {
    state.guard.authorize(req.header("authorization"))?;

    let address = validate(parse_body(req.body())?)?;
    let record = state.store.insert(address);
    info!(id = %record.id, "address created");

    state.json(Response::builder(), &record)
}

#[derive(Serialize)]
struct Deleted<'a> {
    message: &'a str,
    user: [AddressRecord; 1],
}

// DELETE /address/{id}
async fn delete_address(state: Arc<AppState>, req: Request) -> Result<Response, ApiError> {
    state.guard.authorize(req.header("authorization"))?;

    // An id that is not even a UUID cannot name a stored record.
    let id: AddressId = req.param("id").unwrap_or_default().parse().map_err(|_| NotFound)?;
    let removed = state.store.remove(&id)?;
    info!(%id, "address deleted");

    state.json(Response::builder(), &Deleted { message: DELETED, user: [removed] })
}

/// An empty body reads as `{}` so it fails validation rather than parsing.
fn parse_body(body: &[u8]) -> Result<NewAddress, ApiError> {
    if body.trim_ascii().is_empty() {
        return Ok(NewAddress::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::MalformedBody(e.to_string()))
}
