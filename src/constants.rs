//! Shared defaults for the roster core and its mail settings.

/// Location shown in notifications when an activity does not declare one
pub const DEFAULT_LOCATION: &str = "On campus";

/// Default SMTP submission port
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Display name used for the sender when none is configured
pub const DEFAULT_FROM_NAME: &str = "Mergington High School Activities";

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8000";

/// Notification queue defaults
pub mod notifier {
    pub const CHANNEL_BUFFER_SIZE: usize = 256;
    pub const WORKER_COUNT: usize = 2;
    pub const SHUTDOWN_DRAIN_TIMEOUT_MS: u64 = 5000;
}

/// Prefix for `ROSTER__SECTION__KEY` environment overrides
pub const ENV_PREFIX: &str = "ROSTER";

/// Default config file, resolved relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config/roster";
