//! Configuration Loading Tests
//!
//! Layering of defaults, TOML file, `ROSTER__*` and `SMTP_*` variables. Every test
//! passes an explicit environment map so the process environment is never read.

use std::collections::HashMap;
use std::io::Write;

use activity_roster::config::{ConfigManager, ConfigurationError};
use tempfile::NamedTempFile;

fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
    Some(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    )
}

fn toml_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn defaults_without_file_or_env() {
    let manager = ConfigManager::load_with_env(None, env(&[])).unwrap();
    let config = manager.config();

    assert_eq!(config.notifier.channel_buffer_size, 256);
    assert_eq!(config.notifier.worker_count, 2);
    assert_eq!(config.notifier.shutdown_drain_timeout_ms, 5000);
    assert_eq!(config.web.bind_address, "127.0.0.1:8000");
    assert!(!config.email.is_configured());
    assert_eq!(manager.environment(), "development");
    assert!(manager.config_file().is_none());
}

#[test]
fn toml_file_overrides_defaults() {
    let file = toml_file(
        r#"
[email]
host = "smtp.mergington.edu"
from_email = "activities@mergington.edu"

[notifier]
worker_count = 4
"#,
    );

    let manager = ConfigManager::load_with_env(Some(file.path()), env(&[])).unwrap();
    let config = manager.config();

    assert!(config.email.is_configured());
    assert_eq!(config.email.port, 587);
    assert_eq!(config.notifier.worker_count, 4);
    assert_eq!(config.notifier.channel_buffer_size, 256);
    assert_eq!(manager.config_file(), Some(file.path()));
}

#[test]
fn prefixed_env_overrides_file() {
    let file = toml_file("[notifier]\nworker_count = 4\n");

    let manager = ConfigManager::load_with_env(
        Some(file.path()),
        env(&[
            ("ROSTER__NOTIFIER__WORKER_COUNT", "8"),
            ("ROSTER__WEB__BIND_ADDRESS", "0.0.0.0:9000"),
            ("ROSTER_ENV", "production"),
        ]),
    )
    .unwrap();

    assert_eq!(manager.config().notifier.worker_count, 8);
    assert_eq!(manager.config().web.bind_address, "0.0.0.0:9000");
    assert_eq!(manager.environment(), "production");
}

#[test]
fn smtp_variables_are_applied_last() {
    let file = toml_file("[email]\nhost = \"from-file\"\nport = 25\n");

    let manager = ConfigManager::load_with_env(
        Some(file.path()),
        env(&[
            ("ROSTER__EMAIL__HOST", "from-prefixed-env"),
            ("SMTP_HOST", "smtp.mergington.edu"),
            ("SMTP_PORT", "2525"),
            ("SMTP_USERNAME", "activities"),
            ("SMTP_PASSWORD", "secret"),
            ("FROM_EMAIL", "activities@mergington.edu"),
            ("FROM_NAME", "Activities Office"),
            ("SMTP_USE_TLS", "false"),
        ]),
    )
    .unwrap();
    let email = &manager.config().email;

    assert_eq!(email.host.as_deref(), Some("smtp.mergington.edu"));
    assert_eq!(email.port, 2525);
    assert!(email.has_credentials());
    assert!(!email.use_tls);
    assert_eq!(
        email.sender(),
        "Activities Office <activities@mergington.edu>"
    );
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");

    let err = ConfigManager::load_with_env(Some(missing.as_path()), env(&[])).unwrap_err();
    assert!(matches!(err, ConfigurationError::LoadError { .. }));
}

#[test]
fn invalid_values_fail_validation() {
    let file = toml_file("[notifier]\nworker_count = 0\n");
    let err = ConfigManager::load_with_env(Some(file.path()), env(&[])).unwrap_err();
    assert!(matches!(err, ConfigurationError::InvalidValue { .. }));

    let err = ConfigManager::load_with_env(
        None,
        env(&[("ROSTER__WEB__BIND_ADDRESS", "nowhere")]),
    )
    .unwrap_err();
    assert!(matches!(err, ConfigurationError::InvalidValue { .. }));
}
