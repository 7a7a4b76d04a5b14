//! Hardening headers applied to every response.

use crate::middleware::Middleware;
use crate::response::Response;

/// `(name, value)` pairs set on every response, overriding handler values.
const HEADERS: &[(&str, &str)] = &[
    (
        "content-security-policy",
        "default-src 'self';base-uri 'self';font-src 'self' https: data:;\
         form-action 'self';frame-ancestors 'self';img-src 'self' data:;\
         object-src 'none';script-src 'self';script-src-attr 'none';\
         style-src 'self' https: 'unsafe-inline';upgrade-insecure-requests",
    ),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "same-origin"),
    ("origin-agent-cluster", "?1"),
    ("referrer-policy", "no-referrer"),
    ("strict-transport-security", "max-age=15552000; includeSubDomains"),
    ("x-content-type-options", "nosniff"),
    ("x-dns-prefetch-control", "off"),
    ("x-download-options", "noopen"),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-permitted-cross-domain-policies", "none"),
    ("x-xss-protection", "0"),
];

/// Adds the [`HEADERS`] set to every outgoing response.
#[derive(Clone, Copy, Debug, Default)]
pub struct SecurityHeaders;

impl Middleware for SecurityHeaders {
    fn after(&self, res: &mut Response) {
        for (name, value) in HEADERS {
            res.set_header(name, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sets_every_header() {
        let mut res = Response::text("ok");
        SecurityHeaders.after(&mut res);

        assert_eq!(res.header("x-content-type-options"), Some("nosniff"));
        assert_eq!(res.header("x-frame-options"), Some("SAMEORIGIN"));
        assert!(HEADERS.iter().all(|(name, _)| res.header(name).is_some()));
        assert_eq!(res.header("content-type"), Some("text/plain; charset=utf-8"));
    }
}
