//! Batch runner
//!
//! Draws one assigned sequence and one prior-outcomes sequence per trial,
//! plays every configured strategy against that same pair, and streams the
//! resulting rows to a sink. Sessions share nothing mutable, so a given
//! seed always reproduces the same output.

use anyhow::Result;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{AppConfig, SimulationConfig};
use crate::error::SimError;
use crate::persistence::RecordSink;
use crate::rng::{draw_sequence, session_rng};
use crate::session::Session;
use crate::strategy::{StrategyFactory, StrategyKind};

/// What to do when a strategy stakes more than its bankroll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationPolicy {
    /// Stop the whole run and return the violation
    Abort,
    /// Log it, write nothing for that (trial, strategy) pair, carry on
    Skip,
}

/// Counts for a finished run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub trials: u32,
    pub sessions: u64,
    pub skipped: u64,
    pub draws: u64,
}

pub struct BatchRunner {
    config: SimulationConfig,
    strategies: Vec<StrategyKind>,
}

impl BatchRunner {
    /// Validates the configuration; nothing runs if it is invalid
    pub fn new(config: SimulationConfig) -> Result<Self, SimError> {
        let strategies = config.validate()?;
        Ok(Self { config, strategies })
    }

    /// Validates the whole application config (output settings included)
    /// and keeps its simulation section
    pub fn from_app(app: &AppConfig) -> Result<Self, SimError> {
        let strategies = app.validate()?;
        Ok(Self {
            config: app.simulation.clone(),
            strategies,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn strategies(&self) -> &[StrategyKind] {
        &self.strategies
    }

    /// Run every trial with the configured strategies. A policy violation
    /// under [`ViolationPolicy::Abort`] comes back as a [`SimError`] inside
    /// the error.
    pub fn run(&self, source: &mut dyn RngCore, sink: &mut dyn RecordSink) -> Result<BatchReport> {
        self.run_with(&self.strategies, source, sink)
    }

    /// Same as [`run`](Self::run), but plays `factories` instead of the
    /// configured strategy list
    pub fn run_with<F: StrategyFactory>(
        &self,
        factories: &[F],
        source: &mut dyn RngCore,
        sink: &mut dyn RecordSink,
    ) -> Result<BatchReport> {
        let mut report = BatchReport::default();

        info!(
            trials = self.config.trials,
            strategies = factories.len(),
            draws_per_trial = self.config.draws_per_trial,
            "Batch started"
        );

        for trial in 1..=self.config.trials {
            self.run_trial(trial, factories, source, sink, &mut report)?;
            report.trials = trial;

            let every = self.config.progress_every;
            if every > 0 && trial % every == 0 {
                info!(
                    trial,
                    sessions = report.sessions,
                    skipped = report.skipped,
                    "Batch progress"
                );
            }
        }
        sink.flush()?;

        info!(
            trials = report.trials,
            sessions = report.sessions,
            skipped = report.skipped,
            draws = report.draws,
            "Batch finished"
        );
        Ok(report)
    }

    fn run_trial<F: StrategyFactory>(
        &self,
        trial: u32,
        factories: &[F],
        source: &mut dyn RngCore,
        sink: &mut dyn RecordSink,
        report: &mut BatchReport,
    ) -> Result<()> {
        let draws = draw_sequence(source, self.config.draws_per_trial);
        let prior = draw_sequence(source, self.config.prior_draws);

        for factory in factories {
            let rng = session_rng(source);
            let mut session = Session::new(
                factory.build(),
                trial,
                &draws,
                &prior,
                self.config.initial_pot,
                rng,
            );

            match session.play() {
                Ok(summary) => {
                    for record in session.history() {
                        sink.write_draw(record)?;
                    }
                    sink.write_summary(&summary)?;
                    report.sessions += 1;
                    report.draws += summary.draws_played as u64;
                }
                Err(err)
                    if err.is_policy_violation()
                        && self.config.on_policy_violation == ViolationPolicy::Skip =>
                {
                    warn!(error = %err, "Skipping session after policy violation");
                    report.skipped += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::DiscardSink;
    use crate::rng::batch_rng;

    fn small(strategies: &[&str]) -> SimulationConfig {
        SimulationConfig {
            trials: 3,
            draws_per_trial: 20,
            prior_draws: 10,
            strategies: strategies.iter().map(|s| s.to_string()).collect(),
            progress_every: 0,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn rejects_invalid_config_up_front() {
        let err = BatchRunner::new(small(&["martingale-classic"])).err().unwrap();
        assert_eq!(err, SimError::UnknownStrategy("martingale-classic".to_string()));
    }

    #[test]
    fn from_app_checks_output_settings_too() {
        let mut app = AppConfig {
            simulation: small(&["two-columns-static"]),
            persistence: crate::config::PersistenceConfig {
                data_dir: "./output".to_string(),
                csv_enabled: false,
                write_draws: false,
            },
            logging: crate::config::LoggingConfig {
                level: "info".to_string(),
                json: false,
            },
        };
        let runner = BatchRunner::from_app(&app).unwrap();
        assert_eq!(runner.strategies(), &[StrategyKind::TwoColumns]);
        assert_eq!(runner.config().trials, 3);

        app.persistence.data_dir = String::new();
        assert!(matches!(
            BatchRunner::from_app(&app),
            Err(SimError::Configuration(_))
        ));
    }

    #[test]
    fn one_session_per_trial_and_strategy() {
        let runner =
            BatchRunner::new(small(&["two-columns-static", "three-number-adaptive"])).unwrap();
        let report = runner
            .run(&mut batch_rng(Some(1)), &mut DiscardSink)
            .unwrap();
        assert_eq!(report.trials, 3);
        assert_eq!(report.sessions, 6);
        assert_eq!(report.skipped, 0);
        assert!(report.draws <= 6 * 20);
    }

    #[test]
    fn same_seed_same_report() {
        let runner = BatchRunner::new(small(&["single-random-number", "two-columns-avoid-last"]))
            .unwrap();
        let a = runner.run(&mut batch_rng(Some(9)), &mut DiscardSink).unwrap();
        let b = runner.run(&mut batch_rng(Some(9)), &mut DiscardSink).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn violation_policy_parses_lowercase() {
        let policy: ViolationPolicy = serde_json::from_str("\"skip\"").unwrap();
        assert_eq!(policy, ViolationPolicy::Skip);
    }
}
