use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::info;
use validator::{Validate, ValidationError};

use crate::lifecycle::stage::StageThresholds;

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const CONFIG_DIR: &str = "config";
const DEFAULT_WEAN_OFFSET_DAYS: u32 = 28;
const DEFAULT_PREWEANING_MAX_AGE_DAYS: i64 = 21;
const DEFAULT_WEANER_MAX_AGE_DAYS: i64 = 56;
const DEFAULT_GROWER_MAX_AGE_DAYS: i64 = 98;
const DEFAULT_FARROWING_WINDOW_DAYS: i64 = 120;

/// Litter lifecycle policy knobs.
///
/// The wean offset and the stage boundaries are business-policy constants,
/// not computed values; they live here so a policy change is a config edit
/// rather than a code change.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct LifecycleConfig {
    /// Days between farrowing and weaning (older deployments used 21)
    #[serde(default = "default_wean_offset_days")]
    #[validate(range(min = 14, max = 56))]
    pub wean_offset_days: u32,

    /// Last age (in days) still counted as pre-weaning
    #[serde(default = "default_preweaning_max_age_days")]
    pub preweaning_max_age_days: i64,

    /// Last age (in days) still counted as weaner
    #[serde(default = "default_weaner_max_age_days")]
    pub weaner_max_age_days: i64,

    /// Last age (in days) still counted as grower; older pigs are finishers
    #[serde(default = "default_grower_max_age_days")]
    pub grower_max_age_days: i64,

    /// How far ahead the dashboard looks for upcoming farrowings
    #[serde(default = "default_farrowing_window_days")]
    #[validate(range(min = 1, max = 365))]
    pub farrowing_window_days: i64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            wean_offset_days: DEFAULT_WEAN_OFFSET_DAYS,
            preweaning_max_age_days: DEFAULT_PREWEANING_MAX_AGE_DAYS,
            weaner_max_age_days: DEFAULT_WEANER_MAX_AGE_DAYS,
            grower_max_age_days: DEFAULT_GROWER_MAX_AGE_DAYS,
            farrowing_window_days: DEFAULT_FARROWING_WINDOW_DAYS,
        }
    }
}

impl LifecycleConfig {
    pub fn thresholds(&self) -> StageThresholds {
        StageThresholds {
            preweaning_max_age_days: self.preweaning_max_age_days,
            weaner_max_age_days: self.weaner_max_age_days,
            grower_max_age_days: self.grower_max_age_days,
        }
    }

    fn validate_ordering(&self) -> Result<(), ValidationError> {
        if self.preweaning_max_age_days < 0
            || self.preweaning_max_age_days >= self.weaner_max_age_days
            || self.weaner_max_age_days >= self.grower_max_age_days
        {
            let mut err = ValidationError::new("stage_thresholds");
            err.message =
                Some("Stage thresholds must satisfy 0 <= preweaning < weaner < grower".into());
            return Err(err);
        }
        Ok(())
    }
}

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Application environment
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    #[validate(custom = "validate_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Litter lifecycle policy
    #[serde(default)]
    #[validate]
    pub lifecycle: LifecycleConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: DEFAULT_ENV.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_json: false,
            lifecycle: LifecycleConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_wean_offset_days() -> u32 {
    DEFAULT_WEAN_OFFSET_DAYS
}

fn default_preweaning_max_age_days() -> i64 {
    DEFAULT_PREWEANING_MAX_AGE_DAYS
}

fn default_weaner_max_age_days() -> i64 {
    DEFAULT_WEANER_MAX_AGE_DAYS
}

fn default_grower_max_age_days() -> i64 {
    DEFAULT_GROWER_MAX_AGE_DAYS
}

fn default_farrowing_window_days() -> i64 {
    DEFAULT_FARROWING_WINDOW_DAYS
}

fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if valid_levels.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("log_level");
        err.message = Some("Must be one of: trace, debug, info, warn, error".into());
        Err(err)
    }
}

/// Initializes tracing using the provided log level as the default filter
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::fmt;

    let default_directive = format!("herdbook={}", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    if json {
        let _ = fmt().with_env_filter(filter_directive).json().try_init();
    } else {
        let _ = fmt().with_env_filter(filter_directive).try_init();
    }
}

/// Loads application configuration
///
/// Layers configuration sources in this order:
/// 1. Default config (config/default.toml)
/// 2. Environment-specific config (config/{env}.toml)
/// 3. Environment variables (APP__*)
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    let config = Config::builder()
        .set_default("environment", DEFAULT_ENV)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;
    app_config.validate()?;
    app_config
        .lifecycle
        .validate_ordering()
        .map_err(|e| AppConfigError::Invalid(e.to_string()))?;

    info!(
        environment = %app_config.environment,
        wean_offset_days = app_config.lifecycle.wean_offset_days,
        "Configuration loaded"
    );
    Ok(app_config)
}
