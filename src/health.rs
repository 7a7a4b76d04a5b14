//! Health-check endpoints and the root greeting.
//!
//! | Path | Answers |
//! |---|---|
//! | `/` | `Hello, world!` |
//! | `/healthz` | is the process serving HTTP at all |
//! | `/readyz` | can it take traffic |
//!
//! The store is in memory and needs no warm-up, so readiness is the same
//! answer as liveness with a different body.
//!
//! Each handler is generic over the router state so any router can mount it.

use std::sync::Arc;

use crate::{Request, Response};

/// `GET /`
pub async fn greeting<S: Send + Sync>(_state: Arc<S>, _req: Request) -> Response {
    Response::text("Hello, world!")
}

/// Liveness check. No dependencies, always `200 ok`.
pub async fn liveness<S: Send + Sync>(_state: Arc<S>, _req: Request) -> Response {
    Response::text("ok")
}

/// Readiness check. Always `200 ready`.
pub async fn readiness<S: Send + Sync>(_state: Arc<S>, _req: Request) -> Response {
    Response::text("ready")
}
