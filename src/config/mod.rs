//! # Roster Configuration System
//!
//! Layered configuration for the roster service.
//!
//! ## Sources (later wins)
//!
//! 1. Built-in defaults
//! 2. Optional TOML file (`config/roster.toml` or an explicit path)
//! 3. `ROSTER__SECTION__KEY` environment variables
//! 4. Mail variables `SMTP_HOST`, `SMTP_PORT`, `SMTP_USERNAME`, `SMTP_PASSWORD`,
//!    `FROM_EMAIL`, `FROM_NAME`, `SMTP_USE_TLS`
//!
//! ## Usage
//!
//! ```rust,no_run
//! use activity_roster::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let workers = manager.config().notifier.worker_count;
//! let mail_ready = manager.config().email.is_configured();
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::warn;

use crate::constants::{self, DEFAULT_BIND_ADDRESS, DEFAULT_FROM_NAME, DEFAULT_SMTP_PORT};

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration structure mirroring roster.toml
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Outgoing mail settings for confirmation notifications
    pub email: EmailSettings,

    /// Notification queue and worker pool sizing
    pub notifier: NotifierConfig,

    /// HTTP boundary settings
    pub web: WebConfig,
}

impl RosterConfig {
    /// Reject settings the runtime cannot work with
    pub fn validate(&self) -> ConfigResult<()> {
        if self.notifier.channel_buffer_size == 0 {
            return Err(ConfigurationError::invalid_value(
                "notifier.channel_buffer_size",
                "0",
                "queue must hold at least one notification",
            ));
        }
        if self.notifier.worker_count == 0 {
            return Err(ConfigurationError::invalid_value(
                "notifier.worker_count",
                "0",
                "at least one delivery worker is required",
            ));
        }
        self.web.socket_addr()?;
        Ok(())
    }
}

/// SMTP settings for confirmation mail
///
/// Mail is only sent when host, port and sender address are all present. Otherwise
/// every delivery is skipped with a log line.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EmailSettings {
    pub host: Option<String>,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_email: Option<String>,
    pub from_name: String,
    pub use_tls: bool,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_SMTP_PORT,
            username: None,
            password: None,
            from_email: None,
            from_name: DEFAULT_FROM_NAME.to_string(),
            use_tls: true,
        }
    }
}

// Password stays out of logs.
impl fmt::Debug for EmailSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("from_email", &self.from_email)
            .field("from_name", &self.from_name)
            .field("use_tls", &self.use_tls)
            .finish()
    }
}

impl EmailSettings {
    /// Mail header sender, e.g. `Mergington High School Activities <office@school.edu>`
    pub fn sender(&self) -> String {
        match non_empty(&self.from_email) {
            Some(email) if !self.from_name.is_empty() => format!("{} <{}>", self.from_name, email),
            Some(email) => email.to_string(),
            None => String::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        non_empty(&self.host).is_some() && self.port != 0 && non_empty(&self.from_email).is_some()
    }

    pub fn has_credentials(&self) -> bool {
        non_empty(&self.username).is_some() && non_empty(&self.password).is_some()
    }

    /// Overlay the `SMTP_*` / `FROM_*` variables found through `lookup`
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SMTP_HOST") {
            self.host = Some(host);
        }
        if let Some(raw) = lookup("SMTP_PORT") {
            match raw.trim().parse::<u16>() {
                Ok(port) => self.port = port,
                Err(_) => warn!(value = %raw, port = self.port, "Ignoring unparsable SMTP_PORT"),
            }
        }
        if let Some(username) = lookup("SMTP_USERNAME") {
            self.username = Some(username);
        }
        if let Some(password) = lookup("SMTP_PASSWORD") {
            self.password = Some(password);
        }
        if let Some(from_email) = lookup("FROM_EMAIL") {
            self.from_email = Some(from_email);
        }
        if let Some(from_name) = lookup("FROM_NAME") {
            self.from_name = from_name;
        }
        if let Some(use_tls) = lookup("SMTP_USE_TLS") {
            self.use_tls = !use_tls.trim().eq_ignore_ascii_case("false");
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Notification queue configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct NotifierConfig {
    /// Bounded queue capacity; a full queue drops new notifications
    pub channel_buffer_size: usize,
    /// Number of delivery workers consuming the queue
    pub worker_count: usize,
    /// How long shutdown waits for queued notifications
    pub shutdown_drain_timeout_ms: u64,
    pub log_dropped_notifications: bool,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: constants::notifier::CHANNEL_BUFFER_SIZE,
            worker_count: constants::notifier::WORKER_COUNT,
            shutdown_drain_timeout_ms: constants::notifier::SHUTDOWN_DRAIN_TIMEOUT_MS,
            log_dropped_notifications: true,
        }
    }
}

impl NotifierConfig {
    pub fn shutdown_drain_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_drain_timeout_ms)
    }
}

/// HTTP boundary configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct WebConfig {
    pub bind_address: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
        }
    }
}

impl WebConfig {
    pub fn socket_addr(&self) -> ConfigResult<SocketAddr> {
        let address = self.bind_address.as_str();
        address.parse().map_err(|e: std::net::AddrParseError| {
            ConfigurationError::invalid_value("web.bind_address", address, e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_email_defaults() {
        let settings = EmailSettings::default();
        assert_eq!(settings.port, 587);
        assert_eq!(settings.from_name, "Mergington High School Activities");
        assert!(settings.use_tls);
        assert!(!settings.is_configured());
        assert_eq!(settings.sender(), "");
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = EmailSettings::default();
        settings.apply_env_overrides(lookup_from(&[
            ("SMTP_HOST", "smtp.mergington.edu"),
            ("SMTP_PORT", "2525"),
            ("FROM_EMAIL", "activities@mergington.edu"),
            ("SMTP_USE_TLS", "FALSE"),
        ]));

        assert!(settings.is_configured());
        assert_eq!(settings.port, 2525);
        assert!(!settings.use_tls);
        assert_eq!(
            settings.sender(),
            "Mergington High School Activities <activities@mergington.edu>"
        );
    }

    #[test]
    fn test_unparsable_port_keeps_previous_value() {
        let mut settings = EmailSettings::default();
        settings.apply_env_overrides(lookup_from(&[("SMTP_PORT", "not-a-port")]));
        assert_eq!(settings.port, 587);
    }

    #[test]
    fn test_any_tls_value_but_false_enables_tls() {
        let mut settings = EmailSettings::default();
        settings.apply_env_overrides(lookup_from(&[("SMTP_USE_TLS", "no")]));
        assert!(settings.use_tls);
    }

    #[test]
    fn test_blank_values_are_not_configured() {
        let mut settings = EmailSettings::default();
        settings.apply_env_overrides(lookup_from(&[("SMTP_HOST", ""), ("FROM_EMAIL", "x@y.edu")]));
        assert!(!settings.is_configured());

        settings.host = Some("smtp".to_string());
        settings.port = 0;
        assert!(!settings.is_configured());
    }

    #[test]
    fn test_sender_without_name() {
        let settings = EmailSettings {
            from_email: Some("office@x.edu".to_string()),
            from_name: String::new(),
            ..EmailSettings::default()
        };
        assert_eq!(settings.sender(), "office@x.edu");
    }

    #[test]
    fn test_debug_masks_password() {
        let settings = EmailSettings {
            password: Some("hunter2".to_string()),
            ..EmailSettings::default()
        };
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn test_validation() {
        assert!(RosterConfig::default().validate().is_ok());

        let mut config = RosterConfig::default();
        config.notifier.worker_count = 0;
        assert!(config.validate().is_err());

        let mut config = RosterConfig::default();
        config.notifier.channel_buffer_size = 0;
        assert!(config.validate().is_err());

        let mut config = RosterConfig::default();
        config.web.bind_address = "not an address".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidValue { .. })
        ));
    }
}
