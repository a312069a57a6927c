use crate::session::SessionConfig;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Login rate-limit settings
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Attempts allowed per window
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Window length in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: i64,
}

fn default_max_attempts() -> u32 {
    5
}

fn default_window_secs() -> i64 {
    15 * 60
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            window_secs: default_window_secs(),
        }
    }
}

impl RateLimitConfig {
    pub fn window_ms(&self) -> i64 {
        self.window_secs * 1000
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub login_rate_limit: RateLimitConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.session.inactivity_timeout_secs <= 0 {
            return Err("session.inactivity_timeout_secs must be positive".to_string());
        }
        if self.session.absolute_lifetime_secs <= 0 {
            return Err("session.absolute_lifetime_secs must be positive".to_string());
        }
        if self.session.absolute_lifetime_secs < self.session.inactivity_timeout_secs {
            return Err(
                "session.absolute_lifetime_secs must not be shorter than the inactivity timeout"
                    .to_string(),
            );
        }
        if self.session.sweep_interval_secs == 0 {
            return Err("session.sweep_interval_secs must be positive".to_string());
        }
        if self.session.storage_key.is_empty() {
            return Err("session.storage_key must not be empty".to_string());
        }
        if self.login_rate_limit.max_attempts == 0 {
            return Err("login_rate_limit.max_attempts must be positive".to_string());
        }
        if self.login_rate_limit.window_secs <= 0 {
            return Err("login_rate_limit.window_secs must be positive".to_string());
        }
        Ok(())
    }
}

/// Load configuration from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Arc<AppConfig>, String> {
    let path = path.as_ref();
    info!("Loading configuration from: {}", path.display());

    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

    let config: AppConfig = serde_yaml::from_str(&contents)
        .map_err(|e| format!("Failed to parse YAML config: {}", e))?;

    config.validate()?;

    info!(
        "Configuration loaded (inactivity timeout {}s, login limit {}/{}s)",
        config.session.inactivity_timeout_secs,
        config.login_rate_limit.max_attempts,
        config.login_rate_limit.window_secs
    );

    Ok(Arc::new(config))
}

/// Load configuration with fallback options
pub fn load_config_with_fallback() -> Arc<AppConfig> {
    if let Ok(config_path) = std::env::var("CONFIG_PATH") {
        match load_config(&config_path) {
            Ok(config) => return config,
            Err(e) => warn!(
                "Failed to load config from CONFIG_PATH ({}): {}",
                config_path, e
            ),
        }
    }

    let paths = ["config.yaml", "config.yml"];

    for path in paths {
        if Path::new(path).exists() {
            match load_config(path) {
                Ok(config) => return config,
                Err(e) => warn!("Failed to load config from '{}': {}", path, e),
            }
        }
    }

    info!("No configuration file found; using built-in defaults");
    Arc::new(AppConfig::default())
}
