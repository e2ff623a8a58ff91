//! Simulation error taxonomy

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// A strategy asked to stake more than the session holds. Always fatal
    /// for the session; never clamped.
    #[error(
        "policy violation: {strategy} staked {stake} with bankroll {bankroll} (trial {trial}, draw {draw})"
    )]
    PolicyViolation {
        strategy: &'static str,
        trial: u32,
        draw: usize,
        stake: f64,
        bankroll: f64,
    },

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("unknown strategy '{0}'")]
    UnknownStrategy(String),
}

impl SimError {
    pub fn is_policy_violation(&self) -> bool {
        matches!(self, SimError::PolicyViolation { .. })
    }
}
