//! Configuration management for the hedge scheduler.
//!
//! Loads settings from environment variables and config files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::hedging::{HedgeScheduler, SchedulerError};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Hedge timing parameters
    #[serde(default)]
    pub hedging: HedgingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HedgingConfig {
    /// Milliseconds a one-sided fill may persist before a forced hedge is due.
    /// Zero means hedge immediately on any imbalance.
    #[serde(default = "default_hedge_timeout_ms")]
    pub hedge_timeout_ms: i64,
}

// Default value functions

fn default_hedge_timeout_ms() -> i64 {
    1500 // Short window for the complementary leg to fill naturally in a tight market
}

impl Config {
    /// Load configuration from environment variables and config files.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::default().separator("__").prefix("HEDGE"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.hedging.hedge_timeout_ms >= 0,
            "hedge_timeout_ms must be non-negative"
        );

        Ok(())
    }
}

impl HedgingConfig {
    /// Build a scheduler from this configuration.
    pub fn build_scheduler(&self) -> Result<HedgeScheduler, SchedulerError> {
        HedgeScheduler::new(self.hedge_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hedging: HedgingConfig::default(),
        }
    }
}

impl Default for HedgingConfig {
    fn default() -> Self {
        Self {
            hedge_timeout_ms: default_hedge_timeout_ms(),
        }
    }
}
