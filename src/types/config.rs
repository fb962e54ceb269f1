//! Configuration structures.
//!
//! Configuration is loaded from an optional TOML file, then environment
//! variables, then command-line flags (applied by the binary).

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::errors::{Error, Result};

/// Default backend base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Environment override for [`ClientConfig::api_url`].
pub const ENV_API_URL: &str = "TOOLDESK_API_URL";

/// Environment override for [`ConsoleConfig::status_ttl`], in milliseconds.
pub const ENV_STATUS_TTL_MS: &str = "TOOLDESK_STATUS_TTL_MS";

/// Global tooldesk configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Backend client configuration.
    #[serde(default)]
    pub client: ClientConfig,

    /// Console behaviour.
    #[serde(default)]
    pub console: ConsoleConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from a TOML file. Missing sections fall back to defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))
    }

    /// Apply `TOOLDESK_*` environment overrides.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.client.api_url = url;
        }
        if let Some(raw) = lookup(ENV_STATUS_TTL_MS) {
            let millis: u64 = raw.trim().parse().map_err(|_| {
                Error::config(format!(
                    "{} must be a number of milliseconds, got '{}'",
                    ENV_STATUS_TTL_MS, raw
                ))
            })?;
            self.console.status_ttl = Duration::from_millis(millis);
        }
        Ok(self)
    }
}

/// Backend client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the tool backend, without the `/tools` prefix.
    pub api_url: String,

    /// Per-request timeout. `None` waits indefinitely.
    #[serde(default, with = "humantime_serde")]
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: None,
        }
    }
}

/// Console configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// How long a status message stays visible.
    #[serde(with = "humantime_serde")]
    pub status_ttl: Duration,

    /// Prompt printed before each command.
    pub prompt: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            status_ttl: Duration::from_secs(3),
            prompt: "tooldesk> ".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Tracing log level used when `RUST_LOG` is unset.
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            json_logs: false,
        }
    }
}
