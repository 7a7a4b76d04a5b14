//! Infrastructure error type.

use thiserror::Error;

use crate::config::ConfigError;

/// The error type returned by the service's fallible startup and serve paths.
///
/// Request-level failures (401, 404, validation) are expressed as HTTP
/// [`Response`](crate::Response) values through
/// [`ApiError`](crate::api::ApiError), not as `Error`s. This type surfaces
/// failures that stop the process: bad configuration, binding a port.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("config: {0}")]
    Config(#[from] ConfigError),
}
