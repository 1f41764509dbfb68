use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::info;
use validator::Validate;

use crate::services::allocation::AllocationPolicy;

/// Default values for configuration
const DEFAULT_EXPIRY_WARNING_DAYS: i64 = 30;
const CONFIG_DIR: &str = "config";

/// Picking configuration.
///
/// The allocation policy is the only externally meaningful input; the
/// expiry window tunes the expiring-soon advisory on generated picks.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct PickingConfig {
    /// Lot ordering policy: "FEFO", "FIFO" or "LIFO"
    #[serde(default)]
    pub policy: AllocationPolicy,

    /// How close to expiry (in days) a lot must be for generated picks to
    /// carry an expiring-soon advisory
    #[serde(default = "default_expiry_warning_days")]
    #[validate(range(min = 0, max = 365))]
    pub expiry_warning_window_days: i64,
}

fn default_expiry_warning_days() -> i64 {
    DEFAULT_EXPIRY_WARNING_DAYS
}

impl Default for PickingConfig {
    fn default() -> Self {
        Self {
            policy: AllocationPolicy::default(),
            expiry_warning_window_days: default_expiry_warning_days(),
        }
    }
}

/// Errors produced while loading picking configuration.
#[derive(Debug, Error)]
pub enum PickingConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Loads configuration from layered sources:
/// 1. Built-in defaults
/// 2. Optional config file (config/picking.toml)
/// 3. Environment variables (APP_*)
pub fn load_picking_config() -> Result<PickingConfig, PickingConfigError> {
    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    let config = Config::builder()
        .add_source(File::with_name(&format!("{CONFIG_DIR}/picking")).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let picking: PickingConfig = config.try_deserialize()?;
    picking.validate()?;
    Ok(picking)
}
