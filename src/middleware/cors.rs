//! Permissive cross-origin resource sharing.

use crate::middleware::Middleware;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

const ALLOWED_METHODS: &str = "GET,HEAD,PUT,PATCH,POST,DELETE";

/// Allows any origin.
///
/// An `OPTIONS` request carrying `access-control-request-method` is a
/// preflight and is answered `204` here; the requested headers are echoed back
/// as allowed.
#[derive(Clone, Copy, Debug, Default)]
pub struct Cors;

impl Middleware for Cors {
    fn before(&self, req: &Request) -> Option<Response> {
        if req.method() != "OPTIONS" || req.header("access-control-request-method").is_none() {
            return None;
        }

        let mut builder = Response::builder()
            .status(Status::NoContent)
            .header("access-control-allow-methods", ALLOWED_METHODS);
        if let Some(requested) = req.header("access-control-request-headers") {
            builder = builder
                .header("access-control-allow-headers", requested)
                .header("vary", "access-control-request-headers");
        }
        Some(builder.no_body())
    }

    fn after(&self, res: &mut Response) {
        res.set_header("access-control-allow-origin", "*");
    }
}
