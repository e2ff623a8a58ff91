//! Configuration management
//!
//! Loads from optional YAML/TOML files + environment variables via .env

mod types;

pub use types::*;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::SimError;
use crate::strategy::{parse_strategies, StrategyKind};

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub simulation: SimulationConfig,
    pub persistence: PersistenceConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        // Load .env file first
        dotenvy::dotenv().ok();

        let defaults = SimulationConfig::default();
        let config = Config::builder()
            // Simulation defaults
            .set_default("simulation.draws_per_trial", defaults.draws_per_trial as i64)?
            .set_default("simulation.initial_pot", defaults.initial_pot)?
            .set_default("simulation.trials", defaults.trials as i64)?
            .set_default("simulation.prior_draws", defaults.prior_draws as i64)?
            .set_default("simulation.strategies", defaults.strategies.clone())?
            .set_default("simulation.on_policy_violation", "abort")?
            .set_default("simulation.progress_every", defaults.progress_every as i64)?
            // Persistence defaults
            .set_default("persistence.data_dir", "./output")?
            .set_default("persistence.csv_enabled", true)?
            .set_default("persistence.write_draws", true)?
            // Logging defaults
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (ROULETTE__*)
            .add_source(
                Environment::with_prefix("ROULETTE")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("simulation.strategies"),
            )
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        Ok(app_config)
    }

    /// Check every setting the batch depends on; returns the resolved strategies
    pub fn validate(&self) -> Result<Vec<StrategyKind>, SimError> {
        if self.persistence.data_dir.trim().is_empty() {
            return Err(SimError::Configuration(
                "persistence.data_dir must not be empty".to_string(),
            ));
        }
        self.simulation.validate()
    }

    /// Generate a digest of the config for logging
    pub fn digest(&self) -> String {
        format!(
            "trials={} draws={} prior={} pot={} strategies={:?} seed={:?} out={}",
            self.simulation.trials,
            self.simulation.draws_per_trial,
            self.simulation.prior_draws,
            self.simulation.initial_pot,
            self.simulation.strategies,
            self.simulation.seed,
            self.persistence.data_dir
        )
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<Vec<StrategyKind>, SimError> {
        if self.trials == 0 {
            return Err(SimError::Configuration(
                "simulation.trials must be positive".to_string(),
            ));
        }
        if self.draws_per_trial == 0 {
            return Err(SimError::Configuration(
                "simulation.draws_per_trial must be positive".to_string(),
            ));
        }
        if !self.initial_pot.is_finite() || self.initial_pot <= 0.0 {
            return Err(SimError::Configuration(format!(
                "simulation.initial_pot must be a positive number, got {}",
                self.initial_pot
            )));
        }
        if self.strategies.is_empty() {
            return Err(SimError::Configuration(
                "simulation.strategies must name at least one strategy".to_string(),
            ));
        }
        parse_strategies(&self.strategies)
    }
}

impl std::fmt::Display for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.digest())
    }
}
