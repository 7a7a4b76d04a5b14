//! Middleware layer.
//!
//! A [`Middleware`] sees every request before routing and every response
//! after the handler. Register with [`Router::layer`](crate::Router::layer);
//! `before` hooks run in registration order, `after` hooks in reverse.
//!
//! Built-in:
//! - [`Cors`] answers preflights and tags responses with an allowed origin
//! - [`SecurityHeaders`] adds a fixed set of hardening headers
//!
//! Per-request access logging is not a middleware; the router emits one
//! line per request itself.

mod cors;
mod security_headers;

pub use cors::Cors;
pub use security_headers::SecurityHeaders;

use crate::request::Request;
use crate::response::Response;

/// Cross-cutting request / response hook.
pub trait Middleware: Send + Sync + 'static {
    /// Return `Some` to answer the request without routing it.
    fn before(&self, _req: &Request) -> Option<Response> {
        None
    }

    /// Decorate the outgoing response. Runs for short-circuited responses
    /// and for 404 / 405 answers too.
    fn after(&self, _res: &mut Response) {}
}
