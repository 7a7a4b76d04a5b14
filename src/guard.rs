//! Shared-secret check for mutating routes.
//!
//! A request is allowed iff its `authorization` header is exactly
//! `Bearer <token>`. Callers only ever see [`Unauthorized`]; the finer reason
//! goes to the debug log.

use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::debug;

const SCHEME: &str = "Bearer";

/// The presented credential was missing or wrong.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("Unauthorized request")]
pub struct Unauthorized;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Denial {
    MissingHeader,
    Malformed,
    WrongScheme,
    WrongToken,
}

/// Holds the configured token and answers allow / deny.
#[derive(Clone, Debug)]
pub struct AccessGuard {
    token: SecretString,
}

impl AccessGuard {
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }

    /// Checks the raw `authorization` header value, if any.
    pub fn authorize(&self, header: Option<&str>) -> Result<(), Unauthorized> {
        check(header, self.token.expose_secret()).map_err(|reason| {
            debug!(?reason, "authorization denied");
            Unauthorized
        })
    }
}

fn check(header: Option<&str>, token: &str) -> Result<(), Denial> {
    let header = header.ok_or(Denial::MissingHeader)?;
    let (scheme, presented) = header.split_once(' ').ok_or(Denial::Malformed)?;
    if scheme != SCHEME {
        return Err(Denial::WrongScheme);
    }
    if !bool::from(presented.as_bytes().ct_eq(token.as_bytes())) {
        return Err(Denial::WrongToken);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard() -> AccessGuard {
        AccessGuard::new(SecretString::from("s3cr3t".to_owned()))
    }

    #[test]
    fn allows_exact_bearer_header() {
        assert_eq!(guard().authorize(Some("Bearer s3cr3t")), Ok(()));
    }

    #[test]
    fn denies_everything_else() {
        let headers = [
            None,
            Some(""),
            Some("Bearer"),
            Some("Bearer "),
            Some("bearer s3cr3t"),
            Some("Basic s3cr3t"),
            Some("Bearer S3CR3T"),
            Some("Bearer s3cr3t "),
            Some("Bearer  s3cr3t"),
            Some("s3cr3t"),
        ];
        for header in headers {
            assert_eq!(guard().authorize(header), Err(Unauthorized), "{header:?}");
        }
    }

    #[test]
    fn reports_the_denial_reason_internally() {
        assert_eq!(check(None, "t"), Err(Denial::MissingHeader));
        assert_eq!(check(Some("t"), "t"), Err(Denial::Malformed));
        assert_eq!(check(Some("Token t"), "t"), Err(Denial::WrongScheme));
        assert_eq!(check(Some("Bearer u"), "t"), Err(Denial::WrongToken));
    }

    #[test]
    fn debug_output_redacts_the_token() {
        assert!(!format!("{:?}", guard()).contains("s3cr3t"));
    }
}
