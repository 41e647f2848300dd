//! Environment-based configuration
//!
//! Environment variables:
//! - CONNECTOR_URL: base URL of the connector under test (default: http://localhost:9201)
//! - AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY: basic-auth credentials (optional, both or neither)
//! - REMOTECHECK_REQUEST_TIMEOUT_SECS: per-request timeout (default: 30)
//! - REMOTECHECK_LISTEN: reference connector listen address (default: 0.0.0.0:9201)
//! - REMOTECHECK_MAX_BODY_BYTES: reference connector body limit (default: 16MB)
//! - REMOTECHECK_RETENTION_SECS: reference connector retention (optional)
//!
//! Every `from_env` has a `from_lookup` twin taking the variable source as a
//! closure, so parsing can be tested without touching the process environment.

use crate::{Error, Result};
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_CONNECTOR_URL: &str = "http://localhost:9201";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:9201";
pub const DEFAULT_MAX_BODY_SIZE: usize = 16 * 1024 * 1024;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Basic-auth credentials shared by the client and the reference connector.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl Credentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }

    /// Read `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`.
    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = non_empty(lookup("AWS_ACCESS_KEY_ID"));
        let secret = non_empty(lookup("AWS_SECRET_ACCESS_KEY"));
        match (key, secret) {
            (Some(key), Some(secret)) => Ok(Some(Self::new(key, secret))),
            (None, None) => Ok(None),
            (Some(_), None) => Err(Error::Config(
                "AWS_ACCESS_KEY_ID is set but AWS_SECRET_ACCESS_KEY is not".to_string(),
            )),
            (None, Some(_)) => Err(Error::Config(
                "AWS_SECRET_ACCESS_KEY is set but AWS_ACCESS_KEY_ID is not".to_string(),
            )),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// Where the harness sends requests.
#[derive(Debug, Clone)]
pub struct ConnectorSettings {
    /// Base URL, without trailing slash
    pub url: String,
    pub credentials: Option<Credentials>,
    pub request_timeout: Duration,
}

impl Default for ConnectorSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_CONNECTOR_URL.to_string(),
            credentials: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ConnectorSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: normalize_url(url.into()),
            ..Default::default()
        }
    }

    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = non_empty(lookup("CONNECTOR_URL"))
            .unwrap_or_else(|| DEFAULT_CONNECTOR_URL.to_string());
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(Error::Config(format!(
                "CONNECTOR_URL must start with http:// or https://, got '{url}'"
            )));
        }

        let request_timeout = parse_var::<u64, _>(&lookup, "REMOTECHECK_REQUEST_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        Ok(Self {
            url: normalize_url(url),
            credentials: Credentials::from_lookup(&lookup)?,
            request_timeout,
        })
    }
}

/// Reference connector server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    /// Maximum request body size
    pub max_body_size: usize,
    pub credentials: Option<Credentials>,
    pub retention: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 9201)),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            credentials: None,
            retention: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            listen: parse_var(&lookup, "REMOTECHECK_LISTEN")?.unwrap_or(defaults.listen),
            max_body_size: parse_var(&lookup, "REMOTECHECK_MAX_BODY_BYTES")?
                .unwrap_or(defaults.max_body_size),
            credentials: Credentials::from_lookup(&lookup)?,
            retention: parse_var::<u64, _>(&lookup, "REMOTECHECK_RETENTION_SECS")?
                .map(Duration::from_secs),
        })
    }
}

/// Parse a boolean environment value (true/false/1/0/yes/no/on/off).
pub fn parse_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Config(format!(
            "{name} must be a boolean (true/false/1/0), got '{raw}'"
        ))),
    }
}

/// Parse an optional variable with `FromStr`, reporting the variable name on failure.
pub fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = non_empty(lookup(name)) else {
        return Ok(None);
    };
    raw.parse::<T>()
        .map(Some)
        .map_err(|e| Error::Config(format!("invalid {name} '{raw}': {e}")))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn normalize_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn connector_settings_defaults() {
        let settings = ConnectorSettings::from_lookup(env(&[])).unwrap();
        assert_eq!(settings.url, DEFAULT_CONNECTOR_URL);
        assert!(settings.credentials.is_none());
        assert_eq!(settings.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn connector_settings_from_env_values() {
        let settings = ConnectorSettings::from_lookup(env(&[
            ("CONNECTOR_URL", "https://connector.example.com/"),
            ("AWS_ACCESS_KEY_ID", "AKIA"),
            ("AWS_SECRET_ACCESS_KEY", "secret"),
            ("REMOTECHECK_REQUEST_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(settings.url, "https://connector.example.com");
        assert_eq!(settings.credentials, Some(Credentials::new("AKIA", "secret")));
        assert_eq!(settings.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn rejects_half_configured_credentials() {
        let err = ConnectorSettings::from_lookup(env(&[("AWS_ACCESS_KEY_ID", "AKIA")])).unwrap_err();
        assert!(format!("{err}").contains("AWS_SECRET_ACCESS_KEY"));
    }

    #[test]
    fn rejects_bad_url_and_timeout() {
        assert!(ConnectorSettings::from_lookup(env(&[("CONNECTOR_URL", "localhost:9201")])).is_err());
        let err = ConnectorSettings::from_lookup(env(&[(
            "REMOTECHECK_REQUEST_TIMEOUT_SECS",
            "soon",
        )]))
        .unwrap_err();
        assert!(format!("{err}").contains("REMOTECHECK_REQUEST_TIMEOUT_SECS"));
    }

    #[test]
    fn server_config_from_env_values() {
        let config = ServerConfig::from_lookup(env(&[
            ("REMOTECHECK_LISTEN", "127.0.0.1:9999"),
            ("REMOTECHECK_MAX_BODY_BYTES", "1024"),
            ("REMOTECHECK_RETENTION_SECS", "60"),
        ]))
        .unwrap();
        assert_eq!(config.listen.port(), 9999);
        assert_eq!(config.max_body_size, 1024);
        assert_eq!(config.retention, Some(Duration::from_secs(60)));
    }

    #[test]
    fn credentials_debug_redacts_secret() {
        let debug = format!("{:?}", Credentials::new("AKIA", "hunter2"));
        assert!(debug.contains("AKIA"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn parse_bool_values() {
        assert!(parse_bool("X", "Yes").unwrap());
        assert!(!parse_bool("X", "0").unwrap());
        assert!(parse_bool("X", "maybe").is_err());
    }
}
