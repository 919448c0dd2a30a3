//! Configuration Loader
//!
//! Builds a [`RosterConfig`] from defaults, an optional TOML file and the process
//! environment using the `config` crate.

use config::{Config, Environment, File};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use super::error::ConfigResult;
use super::RosterConfig;
use crate::constants::{DEFAULT_CONFIG_FILE, ENV_PREFIX};
use crate::logging::get_environment;

/// Loaded, validated configuration plus where it came from
#[derive(Debug)]
pub struct ConfigManager {
    config: RosterConfig,
    environment: String,
    config_file: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration from the default file location and the process environment
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        Self::load_from_path(None)
    }

    /// Load configuration from a specific file (required when given)
    pub fn load_from_path(path: Option<&Path>) -> ConfigResult<Arc<ConfigManager>> {
        Self::load_with_env(path, None)
    }

    /// Load configuration with an explicit environment map
    ///
    /// With `env` set, neither `ROSTER__*` nor `SMTP_*` values are read from the
    /// process environment. This is useful for testing without modifying global
    /// environment variables.
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> ConfigResult<Arc<ConfigManager>> {
        let environment = match &env {
            Some(vars) => vars
                .get("ROSTER_ENV")
                .cloned()
                .unwrap_or_else(|| "development".to_string()),
            None => get_environment(),
        };

        let file_source = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = Config::builder()
            .add_source(file_source)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(env.clone()),
            )
            .build()?;

        let mut config: RosterConfig = settings.try_deserialize()?;

        match &env {
            Some(vars) => config
                .email
                .apply_env_overrides(|key| vars.get(key).cloned()),
            None => config
                .email
                .apply_env_overrides(|key| std::env::var(key).ok()),
        }

        config.validate()?;

        debug!(email = ?config.email, notifier = ?config.notifier, "Configuration resolved");
        info!(
            environment = %environment,
            config_file = ?path,
            email_configured = config.email.is_configured(),
            workers = config.notifier.worker_count,
            bind_address = %config.web.bind_address,
            "Configuration loaded successfully"
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment,
            config_file: path.map(Path::to_path_buf),
        }))
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &RosterConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Explicit file this configuration was read from, if any
    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }
}
