//! # Structured Logging Module
//!
//! Environment-aware console logging built on `tracing`.
//!
//! - Log level follows the environment (`ROSTER_ENV`, then `APP_ENV`) unless
//!   `RUST_LOG` is set
//! - `ROSTER_LOG_FORMAT=json` switches the console layer to JSON lines
//! - Initialization is idempotent and tolerates an already-installed subscriber

use chrono::Utc;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let level = get_log_level(&environment);
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
        let json = use_json_format();

        let console = if json {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_filter(filter)
                .boxed()
        };

        let subscriber = tracing_subscriber::registry().with(console);
        if subscriber.try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized; keeping it");
        }

        tracing::info!(
            pid = std::process::id(),
            environment = %environment,
            json = json,
            "🔧 STRUCTURED LOGGING: Initialized"
        );
    });
}

/// Get current environment from environment variables
pub fn get_environment() -> String {
    std::env::var("ROSTER_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> String {
    match environment {
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

fn use_json_format() -> bool {
    std::env::var("ROSTER_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Log structured data for roster mutations
pub fn log_roster_operation(
    operation: &str,
    activity: &str,
    email: &str,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        activity = %activity,
        email = %email,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "📋 ROSTER_OPERATION"
    );
}

/// Log structured data for notification dispatch and delivery
pub fn log_notification_operation(
    operation: &str,
    notification_id: &str,
    recipient: &str,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        notification_id = %notification_id,
        recipient = %recipient,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "✉️ NOTIFICATION_OPERATION"
    );
}
