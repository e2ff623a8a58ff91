//! Session - one strategy played through one trial's draw sequence
//!
//! Per draw: ask the strategy for a wager, check it fits the bankroll, debit
//! the stake, resolve the draw, credit the payout, append a record. The loop
//! stops when the sequence is consumed, the bankroll is empty, or the
//! strategy asks to stop.

use rand::RngCore;
use serde::Serialize;
use std::fmt;
use tracing::{debug, trace};

use crate::error::SimError;
use crate::strategy::{DecisionContext, SetupContext, Strategy};
use crate::wheel::{classify, DrawOutcome};

/// Chip accounting for one session
#[derive(Debug, Clone, PartialEq)]
pub struct Bankroll {
    initial: f64,
    balance: f64,
    peak: f64,
    withdrawn: f64,
}

impl Bankroll {
    pub fn new(initial: f64) -> Self {
        Self {
            initial,
            balance: initial,
            peak: initial,
            withdrawn: 0.0,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_balance(initial: f64, balance: f64) -> Self {
        Self {
            initial,
            balance,
            peak: initial.max(balance),
            withdrawn: 0.0,
        }
    }

    pub fn initial(&self) -> f64 {
        self.initial
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Highest balance reached after any resolved draw
    pub fn peak(&self) -> f64 {
        self.peak
    }

    /// Chips taken out of play
    pub fn withdrawn(&self) -> f64 {
        self.withdrawn
    }

    /// Move up to `amount` chips out of play. Returns the amount moved.
    pub fn withdraw(&mut self, amount: f64) -> f64 {
        let amount = amount.max(0.0).min(self.balance);
        self.balance -= amount;
        self.withdrawn += amount;
        amount
    }

    fn debit(&mut self, stake: f64) {
        self.balance -= stake;
    }

    fn credit(&mut self, payout: f64) {
        self.balance += payout;
        self.peak = self.peak.max(self.balance);
    }
}

/// One resolved draw
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub trial: u32,
    pub strategy: &'static str,
    /// 1-based ordinal within the session
    pub draw: usize,
    pub bankroll_before: f64,
    pub stake: f64,
    pub payout: f64,
    pub outcome: DrawOutcome,
    pub wager: String,
}

impl DrawRecord {
    /// Payout exceeded the stake
    pub fn is_win(&self) -> bool {
        self.payout > self.stake
    }

    pub fn net(&self) -> f64 {
        self.payout - self.stake
    }

    pub fn bankroll_after(&self) -> f64 {
        self.bankroll_before - self.stake + self.payout
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Created,
    Running,
    /// Every assigned draw was played
    Completed,
    /// The strategy asked to stop
    Terminated,
    /// Bankroll ran out before the sequence did
    Exhausted,
    /// The strategy overcommitted; the session was abandoned
    Aborted,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Created => write!(f, "CREATED"),
            SessionState::Running => write!(f, "RUNNING"),
            SessionState::Completed => write!(f, "COMPLETED"),
            SessionState::Terminated => write!(f, "TERMINATED"),
            SessionState::Exhausted => write!(f, "EXHAUSTED"),
            SessionState::Aborted => write!(f, "ABORTED"),
        }
    }
}

/// End-of-session totals
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub strategy: &'static str,
    pub trial: u32,
    pub draws_played: usize,
    pub withdrawn: f64,
    pub bankroll: f64,
    pub peak: f64,
    pub state: SessionState,
}

pub struct Session<'a> {
    trial: u32,
    strategy: Box<dyn Strategy>,
    draws: &'a [u8],
    prior: &'a [u8],
    rng: Box<dyn RngCore + 'a>,
    bankroll: Bankroll,
    history: Vec<DrawRecord>,
    state: SessionState,
    violation: Option<SimError>,
}

impl<'a> Session<'a> {
    /// `draws` is played in order; `prior` is only shown to the strategy at
    /// initialization. Both may be shared by several sessions of the same trial.
    pub fn new(
        strategy: Box<dyn Strategy>,
        trial: u32,
        draws: &'a [u8],
        prior: &'a [u8],
        initial_pot: f64,
        rng: impl RngCore + 'a,
    ) -> Self {
        Self {
            trial,
            strategy,
            draws,
            prior,
            rng: Box::new(rng),
            bankroll: Bankroll::new(initial_pot),
            history: Vec::with_capacity(draws.len()),
            state: SessionState::Created,
            violation: None,
        }
    }

    pub fn trial(&self) -> u32 {
        self.trial
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn bankroll(&self) -> &Bankroll {
        &self.bankroll
    }

    pub fn history(&self) -> &[DrawRecord] {
        &self.history
    }

    pub fn draws_played(&self) -> usize {
        self.history.len()
    }

    /// Run the session to its end. A second call returns the same result
    /// without replaying: the summary, or the violation that aborted it.
    pub fn play(&mut self) -> Result<SessionSummary, SimError> {
        if let Some(violation) = &self.violation {
            return Err(violation.clone());
        }
        if self.state != SessionState::Created {
            return Ok(self.summary());
        }
        self.state = SessionState::Running;

        {
            let mut ctx =
                SetupContext::new(self.trial, &self.bankroll, self.prior, &mut *self.rng);
            self.strategy.initialize(&mut ctx);
        }

        let draws = self.draws;
        let mut next = 0usize;
        let end_state = loop {
            if next >= draws.len() {
                break SessionState::Completed;
            }
            if self.bankroll.balance() <= 0.0 {
                break SessionState::Exhausted;
            }

            let wager = {
                let mut ctx = DecisionContext::new(
                    self.trial,
                    &mut self.bankroll,
                    &self.history,
                    self.prior,
                    &mut *self.rng,
                );
                self.strategy.decide(&mut ctx)
            };
            if wager.terminate {
                break SessionState::Terminated;
            }

            let stake = wager.total_stake();
            let bankroll_before = self.bankroll.balance();
            if stake > bankroll_before {
                let violation = SimError::PolicyViolation {
                    strategy: self.strategy.name(),
                    trial: self.trial,
                    draw: next + 1,
                    stake,
                    bankroll: bankroll_before,
                };
                self.state = SessionState::Aborted;
                self.violation = Some(violation.clone());
                return Err(violation);
            }

            let outcome = classify(draws[next]);
            next += 1;

            self.bankroll.debit(stake);
            let payout = wager.payout(&outcome);
            self.bankroll.credit(payout);

            trace!(
                strategy = self.strategy.name(),
                trial = self.trial,
                draw = next,
                number = outcome.index,
                stake,
                payout,
                bankroll = self.bankroll.balance(),
                "draw resolved"
            );

            self.history.push(DrawRecord {
                trial: self.trial,
                strategy: self.strategy.name(),
                draw: next,
                bankroll_before,
                stake,
                payout,
                outcome,
                wager: wager.render(),
            });
        };
        self.state = end_state;

        debug!(
            strategy = self.strategy.name(),
            trial = self.trial,
            state = %self.state,
            draws = self.history.len(),
            bankroll = self.bankroll.balance(),
            peak = self.bankroll.peak(),
            withdrawn = self.bankroll.withdrawn(),
            "session finished"
        );

        Ok(self.summary())
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            strategy: self.strategy.name(),
            trial: self.trial,
            draws_played: self.history.len(),
            withdrawn: self.bankroll.withdrawn(),
            bankroll: self.bankroll.balance(),
            peak: self.bankroll.peak(),
            state: self.state,
        }
    }
}
