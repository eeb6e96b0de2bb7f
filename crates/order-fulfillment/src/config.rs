//! Runtime settings.
//!
//! Sources, later ones winning:
//! 1. built-in defaults
//! 2. `config/fulfillment.{toml,yaml,json}` if present
//! 3. `FULFILLMENT__*` environment variables, e.g. `FULFILLMENT__KITCHEN__POOL_SIZE=8`

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FulfillmentConfig {
    pub kitchen: KitchenConfig,
    pub orders: OrderConfig,
    pub ledger: LedgerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KitchenConfig {
    /// Number of workers in the single shared pool.
    pub pool_size: usize,
    /// Tickets that can wait before `dispatch` starts waiting too.
    pub queue_capacity: usize,
    /// Completion events buffered per subscriber.
    pub event_capacity: usize,
    /// Multiplier applied to the menu's preparation hints.
    pub prep_time_scale: f64,
    /// Upper bound for any single preparation.
    pub max_prep_time_ms: u64,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        Self {
            pool_size: 5,
            queue_capacity: 32,
            event_capacity: 256,
            prep_time_scale: 0.01,
            max_prep_time_ms: 5_000,
        }
    }
}

impl KitchenConfig {
    pub fn max_prep_time(&self) -> Duration {
        Duration::from_millis(self.max_prep_time_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OrderConfig {
    /// Request buffer of the Order actor.
    pub buffer_size: usize,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self { buffer_size: 32 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Where revenue is persisted. `None` keeps it in memory only.
    pub path: Option<PathBuf>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: Some(PathBuf::from("revenue.json")),
        }
    }
}

impl FulfillmentConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/fulfillment").required(false))
            .add_source(config::Environment::with_prefix("FULFILLMENT").separator("__"))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with the ledger kept in memory.
    pub fn in_memory() -> Self {
        Self {
            ledger: LedgerConfig { path: None },
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("kitchen.pool_size", self.kitchen.pool_size),
            ("kitchen.queue_capacity", self.kitchen.queue_capacity),
            ("kitchen.event_capacity", self.kitchen.event_capacity),
            ("orders.buffer_size", self.orders.buffer_size),
        ];
        if let Some((key, _)) = sizes.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::Invalid(format!("{key} must be at least 1")));
        }
        if !self.kitchen.prep_time_scale.is_finite() || self.kitchen.prep_time_scale < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "kitchen.prep_time_scale must be a non-negative number, got {}",
                self.kitchen.prep_time_scale
            )));
        }
        Ok(())
    }
}
