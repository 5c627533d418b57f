//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `SPARK_API_URL` - Base address of the API (default: `http://localhost:8080`)
//! - `SPARK_API_TIMEOUT_MS` - Request timeout in milliseconds (default: 10000)
//! - `SPARK_IPFS_GATEWAY_URL` - Gateway used to display images (default: `http://localhost:8081`)
//! - `SPARK_LOGIN_PATH` - Login screen path used for redirects (default: `/login`)
//! - `SPARK_SESSION_FILE` - Where the CLI keeps its session (default: `.spark-session.json`)

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use thiserror::Error;
use url::Url;

/// Default API address.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default IPFS gateway address.
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:8081";

/// Default login screen path.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Default session file location.
pub const DEFAULT_SESSION_FILE: &str = ".spark-session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Invalid header {0}: {1}")]
    InvalidHeader(String, String),
}

/// Settings for an [`ApiClient`](crate::ApiClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Root URL for all relative request paths
    pub base_url: Url,
    /// Headers applied to every request unless overridden per call
    pub default_headers: HeaderMap,
    /// In-flight requests are abandoned after this long
    pub request_timeout: Duration,
    /// IPFS gateway used when displaying image URLs
    pub gateway_url: String,
    /// Login screen path for unauthorized redirects
    pub login_path: String,
    /// Session file for hosts that persist the session on disk
    pub session_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Self {
            base_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            default_headers,
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            gateway_url: DEFAULT_GATEWAY_URL.to_owned(),
            login_path: DEFAULT_LOGIN_PATH.to_owned(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        let base_url = match get_optional_env("SPARK_API_URL") {
            Some(raw) => parse_base_url(&raw)
                .map_err(|e| ConfigError::InvalidEnvVar("SPARK_API_URL".to_string(), e))?,
            None => defaults.base_url,
        };

        let timeout_ms = get_env_or_default("SPARK_API_TIMEOUT_MS", &DEFAULT_TIMEOUT_MS.to_string())
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SPARK_API_TIMEOUT_MS".to_string(), e.to_string())
            })?;
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "SPARK_API_TIMEOUT_MS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let login_path = get_env_or_default("SPARK_LOGIN_PATH", DEFAULT_LOGIN_PATH);
        if !login_path.starts_with('/') {
            return Err(ConfigError::InvalidEnvVar(
                "SPARK_LOGIN_PATH".to_string(),
                "must start with '/'".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            default_headers: defaults.default_headers,
            request_timeout: Duration::from_millis(timeout_ms),
            gateway_url: get_env_or_default("SPARK_IPFS_GATEWAY_URL", DEFAULT_GATEWAY_URL),
            login_path,
            session_file: get_optional_env("SPARK_SESSION_FILE")
                .map_or(defaults.session_file, PathBuf::from),
        })
    }

    /// Replace the base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `url` is not an absolute http(s) URL.
    pub fn with_base_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url(url)
            .map_err(|e| ConfigError::InvalidEnvVar("base_url".to_string(), e))?;
        Ok(self)
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Add or replace a default header.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidHeader` if the name or value is not a valid header.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, ConfigError> {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ConfigError::InvalidHeader(name.to_string(), e.to_string()))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| ConfigError::InvalidHeader(name.to_string(), e.to_string()))?;
        self.default_headers.insert(header_name, header_value);
        Ok(self)
    }
}

/// Parse and check an API base URL.
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    Ok(url)
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.request_timeout, Duration::from_millis(10_000));
        assert_eq!(config.login_path, "/login");
        assert_eq!(
            config.default_headers.get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_parse_base_url() {
        assert!(parse_base_url("https://api.example.com/v1").is_ok());
        assert!(parse_base_url("ftp://example.com").is_err());
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn test_with_base_url() {
        let config = ClientConfig::default()
            .with_base_url("http://127.0.0.1:9000")
            .unwrap();
        assert_eq!(config.base_url.port(), Some(9000));

        assert!(matches!(
            ClientConfig::default().with_base_url("mailto:x@y"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_with_header() {
        let config = ClientConfig::default()
            .with_header("X-Client", "spark-cli")
            .unwrap();
        assert_eq!(config.default_headers.get("x-client").unwrap(), "spark-cli");

        assert!(matches!(
            ClientConfig::default().with_header("bad header", "x"),
            Err(ConfigError::InvalidHeader(_, _))
        ));
    }
}
