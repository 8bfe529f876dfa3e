//! Configuration types mapping to the TOML schema.
//!
//! ```toml
//! [webhook]
//! public_url = "https://hooks.example.com"
//!
//! [dispatch]
//! timeout_secs = 30
//! queue_capacity = 64
//!
//! [logging]
//! level = "info"
//! json_file = true
//! directory = "/var/log/flowhook"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default public base URL for webhook endpoints.
pub const DEFAULT_PUBLIC_URL: &str = "http://localhost:3000";

/// Default bound on a single worker hook request.
pub const DEFAULT_DISPATCH_TIMEOUT_SECS: u64 = 30;

/// Default number of hook requests that may wait for a worker.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
///
/// All sections are optional so that partial configs (e.g. project-local
/// overrides) can be loaded and merged. Use the accessors to read a section
/// with defaults applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowhookConfig {
    /// Public webhook endpoint settings.
    pub webhook: Option<WebhookConfig>,

    /// Worker dispatch settings.
    pub dispatch: Option<DispatchConfig>,

    /// Logging settings.
    pub logging: Option<LoggingConfig>,
}

impl FlowhookConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> crate::Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> crate::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merge another config on top of this one (other takes priority).
    pub fn merge(&mut self, other: FlowhookConfig) {
        if other.webhook.is_some() {
            self.webhook = other.webhook;
        }

        if other.dispatch.is_some() {
            self.dispatch = other.dispatch;
        }

        if other.logging.is_some() {
            self.logging = other.logging;
        }
    }

    /// Webhook settings with defaults applied.
    pub fn webhook(&self) -> WebhookConfig {
        self.webhook.clone().unwrap_or_default()
    }

    /// Dispatch settings with defaults applied.
    pub fn dispatch(&self) -> DispatchConfig {
        self.dispatch.clone().unwrap_or_default()
    }

    /// Logging settings with defaults applied.
    pub fn logging(&self) -> LoggingConfig {
        self.logging.clone().unwrap_or_default()
    }

    /// Check that every section holds usable values.
    pub fn validate(&self) -> crate::Result<()> {
        let webhook = self.webhook();
        if webhook.public_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "webhook.public_url".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        let dispatch = self.dispatch();
        if dispatch.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "dispatch.timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if dispatch.queue_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "dispatch.queue_capacity".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sections
// ─────────────────────────────────────────────────────────────────────────────

/// Public webhook endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Base URL under which `/v1/webhooks/{flow_id}` is served.
    pub public_url: String,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            public_url: DEFAULT_PUBLIC_URL.to_string(),
        }
    }
}

/// Worker dispatch settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Upper bound on one hook request, in seconds.
    pub timeout_secs: u64,
    /// Capacity of the queue between callers and the worker.
    pub queue_capacity: usize,
}

impl DispatchConfig {
    /// The request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_DISPATCH_TIMEOUT_SECS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Console filter directive (`info`, `flowhook_triggers=debug,warn`, ...).
    pub level: String,
    /// Also write JSON logs to a daily-rotated file.
    pub json_file: bool,
    /// Directory for the JSON log file. Falls back to `<config dir>/logs`.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_file: false,
            directory: None,
        }
    }
}
