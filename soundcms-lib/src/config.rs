//! Client configuration

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::AdminClient;
use crate::api::DEFAULT_PAGE_SIZE;
use crate::error::ApiError;

/// Environment variable that overrides [`AdminConfig::base_url`].
pub const URL_ENV: &str = "SOUNDCMS_URL";

/// Errors raised while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Connection and display settings shared by the admin front ends.
///
/// Missing fields in a config file take their defaults.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use soundcms_lib::config::AdminConfig;
///
/// let config = AdminConfig::default()
///     .with_base_url("http://cms.local/api")
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.timeout(), Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Backend base URL, including any path prefix.
    ///
    /// Default: `http://127.0.0.1:3000/api`
    pub base_url: String,

    /// Per-request timeout in seconds.
    ///
    /// Default: 30
    pub timeout_secs: u64,

    /// Connection timeout in seconds.
    ///
    /// Default: 10
    pub connect_timeout_secs: u64,

    /// Rows per table page.
    ///
    /// Default: 20
    pub page_size: u32,

    /// Log level name (`error`, `warn`, `info`, `debug`, `trace`).
    ///
    /// Default: `info`
    pub log_level: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000/api".to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            page_size: DEFAULT_PAGE_SIZE,
            log_level: "info".to_string(),
        }
    }
}

impl AdminConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a JSON config file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Reads a JSON config file if it exists, defaults otherwise.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Applies environment overrides.
    pub fn apply_env(mut self) -> Self {
        if let Ok(url) = std::env::var(URL_ENV) {
            if !url.trim().is_empty() {
                self.base_url = url;
            }
        }
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs();
        self
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Sets the log level.
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Connection timeout.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Builds a client from these settings.
    pub fn client(&self) -> Result<AdminClient, ApiError> {
        AdminClient::builder()
            .url(self.base_url.clone())
            .timeout(self.timeout())
            .connect_timeout(self.connect_timeout())
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AdminConfig = serde_json::from_str(r#"{"page_size": 50}"#).unwrap();
        assert_eq!(config.page_size, 50);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_load_missing_file_defaults() {
        let config = AdminConfig::load_or_default("/nonexistent/soundcms/config.json").unwrap();
        assert_eq!(config, AdminConfig::default());
    }

    #[test]
    fn test_client_rejects_invalid_url() {
        let config = AdminConfig::default().with_base_url("not a url");
        assert!(matches!(config.client(), Err(ApiError::BadUrl { .. })));
    }
}
