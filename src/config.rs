//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `API_TOKEN` - Shared secret expected as `Authorization: Bearer <token>` on writes
//!
//! ## Optional
//! - `APP_ENV` - `development` or `production` (default: development).
//!   Any other value falls back to development with a warning.
//! - `HOST` - Bind address (default: 127.0.0.1)
//! - `PORT` - Listen port (default: 8000)
//!
//! A `.env` file in the working directory is loaded first when present.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{info, warn};

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
const DEFAULT_PORT: u16 = 8000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(&'static str, String),
}

/// Deployment mode. Selects log format and how much detail 500s reveal.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!("unknown environment `{other}`")),
        }
    }
}

/// Service configuration.
#[derive(Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub api_token: SecretString,
    pub environment: Environment,
    /// `APP_ENV` as given, when it named no known environment.
    unknown_environment: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_token", &"[REDACTED]")
            .field("environment", &self.environment)
            .finish()
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `API_TOKEN` is missing or empty, or if an
    /// optional variable is present but unparsable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is the normal case in production.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_token = lookup("API_TOKEN")
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingEnvVar("API_TOKEN"))?;

        let raw_environment = lookup("APP_ENV");
        let environment: Result<Environment, String> =
            raw_environment.as_deref().map_or(Ok(Environment::default()), str::parse);

        Ok(Self {
            host: parse_or(&lookup, "HOST", DEFAULT_HOST)?,
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            api_token: SecretString::from(api_token),
            environment: environment.clone().unwrap_or_default(),
            unknown_environment: environment.err().and(raw_environment),
        })
    }

    /// Logs the loaded configuration. Call once a subscriber is installed;
    /// problems found while loading are reported here.
    pub fn log_loaded(&self) {
        if let Some(raw) = &self.unknown_environment {
            warn!(app_env = %raw, fallback = ?self.environment, "unknown APP_ENV");
        }
        info!(config = ?self, "configuration loaded");
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn api_token(&self) -> &str {
        self.api_token.expose_secret()
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidEnvVar(key, e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_token_is_set() {
        let config = load(&[("API_TOKEN", "abc")]).unwrap();
        assert_eq!(config.socket_addr(), "127.0.0.1:8000".parse().unwrap());
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.api_token(), "abc");
    }

    #[test]
    fn token_is_required_and_non_empty() {
        assert_eq!(load(&[]).unwrap_err(), ConfigError::MissingEnvVar("API_TOKEN"));
        assert_eq!(
            load(&[("API_TOKEN", "")]).unwrap_err(),
            ConfigError::MissingEnvVar("API_TOKEN")
        );
    }

    #[test]
    fn reads_overrides() {
        let config = load(&[
            ("API_TOKEN", "abc"),
            ("APP_ENV", "Production"),
            ("HOST", "0.0.0.0"),
            ("PORT", "9090"),
        ])
        .unwrap();
        assert!(config.environment.is_production());
        assert_eq!(config.socket_addr(), "0.0.0.0:9090".parse().unwrap());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            load(&[("API_TOKEN", "abc"), ("PORT", "eighty")]),
            Err(ConfigError::InvalidEnvVar("PORT", _))
        ));
        assert!(matches!(
            load(&[("API_TOKEN", "abc"), ("HOST", "localhost:80")]),
            Err(ConfigError::InvalidEnvVar("HOST", _))
        ));
    }

    #[test]
    fn unknown_environment_falls_back_to_development() {
        for name in ["staging", "test", ""] {
            let config = load(&[("API_TOKEN", "abc"), ("APP_ENV", name)]).unwrap();
            assert_eq!(config.environment, Environment::Development, "{name:?}");
            assert_eq!(config.unknown_environment.as_deref(), Some(name));
        }

        let config = load(&[("API_TOKEN", "abc"), ("APP_ENV", "prod")]).unwrap();
        assert!(config.environment.is_production());
        assert_eq!(config.unknown_environment, None);
    }

    #[test]
    fn debug_redacts_token() {
        let config = load(&[("API_TOKEN", "very-secret")]).unwrap();
        assert!(!format!("{config:?}").contains("very-secret"));
    }
}
