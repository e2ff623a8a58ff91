//! Configuration sections

use serde::{Deserialize, Serialize};

use crate::batch::ViolationPolicy;
use crate::strategy::StrategyKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Draws in each trial's assigned sequence
    pub draws_per_trial: usize,
    /// Chips each session starts with
    pub initial_pot: f64,
    /// Number of trials (shared draw sequences)
    pub trials: u32,
    /// Length of the prior-outcomes sequence shown to strategies at start
    pub prior_draws: usize,
    /// Strategy identifiers, played in this order against every trial
    pub strategies: Vec<String>,
    /// Fixed seed for reproducible runs; OS entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
    /// What the batch does when a strategy overcommits
    pub on_policy_violation: ViolationPolicy,
    /// Log progress every N trials (0 = never)
    pub progress_every: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            draws_per_trial: 150,
            initial_pot: 200.0,
            trials: 1000,
            prior_draws: 50,
            strategies: StrategyKind::DEFAULT_SET
                .iter()
                .map(|kind| kind.as_str().to_string())
                .collect(),
            seed: None,
            on_policy_violation: ViolationPolicy::Abort,
            progress_every: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersistenceConfig {
    /// Output directory
    pub data_dir: String,
    /// Write CSV rows at all
    pub csv_enabled: bool,
    /// Write one row per draw (large); session rows are always written
    pub write_draws: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    pub level: String,
    /// JSON lines instead of human-readable output
    pub json: bool,
}
