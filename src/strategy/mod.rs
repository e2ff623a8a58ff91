//! Betting strategies
//!
//! A strategy is asked once per draw for the wager to place. It sees the
//! session through a [`DecisionContext`]: bankroll, initial pot, the draws
//! already resolved in this session, and the prior outcomes sequence. It
//! never sees future draws.
//!
//! Contract:
//! - `initialize` runs once before the first draw and resets any private
//!   state; it gets a [`SetupContext`], which cannot move chips
//! - `decide` must return a wager whose total stake fits the current
//!   bankroll, or a terminating wager when there is no legal play
//!
//! Policies that build on another policy hold it as a field and delegate
//! to it explicitly.

pub mod adaptive;
pub mod columns;
pub mod single;
pub mod six_numbers;

pub use adaptive::ThreeNumberAdaptive;
pub use columns::{AvoidLastColumn, AvoidLastDoubleOnGain, GainScaledColumns, TwoColumns};
pub use single::SingleNumber;
pub use six_numbers::{SixNumbers, SixNumbersMartingale};

use rand::RngCore;
use std::fmt;
use std::str::FromStr;

use crate::error::SimError;
use crate::session::{Bankroll, DrawRecord};
use crate::wager::Wager;

/// Policy deciding the wager for each draw
pub trait Strategy: Send {
    /// Stable identifier written to every output row
    fn name(&self) -> &'static str;

    /// Called once before the first draw
    fn initialize(&mut self, _ctx: &mut SetupContext<'_>) {}

    /// Wager for the next draw
    fn decide(&mut self, ctx: &mut DecisionContext<'_>) -> Wager;
}

/// Read-only session view for `initialize`: no history yet, no withdrawals
pub struct SetupContext<'s> {
    trial: u32,
    bankroll: &'s Bankroll,
    prior: &'s [u8],
    rng: &'s mut dyn RngCore,
}

impl<'s> SetupContext<'s> {
    pub fn new(
        trial: u32,
        bankroll: &'s Bankroll,
        prior: &'s [u8],
        rng: &'s mut dyn RngCore,
    ) -> Self {
        Self {
            trial,
            bankroll,
            prior,
            rng,
        }
    }

    pub fn trial(&self) -> u32 {
        self.trial
    }

    pub fn balance(&self) -> f64 {
        self.bankroll.balance()
    }

    pub fn initial_pot(&self) -> f64 {
        self.bankroll.initial()
    }

    /// Outcomes drawn before the session; never played
    pub fn prior(&self) -> &[u8] {
        self.prior
    }

    pub fn rng(&mut self) -> &mut dyn RngCore {
        &mut *self.rng
    }
}

/// Session view handed to a strategy for one `decide` call
pub struct DecisionContext<'s> {
    trial: u32,
    bankroll: &'s mut Bankroll,
    history: &'s [DrawRecord],
    prior: &'s [u8],
    rng: &'s mut dyn RngCore,
}

impl<'s> DecisionContext<'s> {
    pub fn new(
        trial: u32,
        bankroll: &'s mut Bankroll,
        history: &'s [DrawRecord],
        prior: &'s [u8],
        rng: &'s mut dyn RngCore,
    ) -> Self {
        Self {
            trial,
            bankroll,
            history,
            prior,
            rng,
        }
    }

    pub fn trial(&self) -> u32 {
        self.trial
    }

    /// Chips currently in play
    pub fn balance(&self) -> f64 {
        self.bankroll.balance()
    }

    pub fn initial_pot(&self) -> f64 {
        self.bankroll.initial()
    }

    /// Draws resolved so far in this session, oldest first
    pub fn history(&self) -> &[DrawRecord] {
        self.history
    }

    /// Most recent resolved draw
    pub fn last(&self) -> Option<&DrawRecord> {
        self.history.last()
    }

    /// Outcomes drawn before the session; never played
    pub fn prior(&self) -> &[u8] {
        self.prior
    }

    /// True when the last `n` draws exist and were all net wins
    pub fn won_last(&self, n: usize) -> bool {
        self.history.len() >= n && self.history[self.history.len() - n..].iter().all(|r| r.is_win())
    }

    /// Whole-percent gain of the balance over the initial pot, rounded down
    pub fn gain_percent(&self) -> i64 {
        let initial = self.bankroll.initial();
        if initial <= 0.0 {
            return 0;
        }
        ((self.bankroll.balance() - initial) * 100.0 / initial).floor() as i64
    }

    /// Move up to `amount` chips out of play; returns the amount moved
    pub fn withdraw(&mut self, amount: f64) -> f64 {
        self.bankroll.withdraw(amount)
    }

    pub fn rng(&mut self) -> &mut dyn RngCore {
        &mut *self.rng
    }
}

/// Builds a fresh policy for each session
pub trait StrategyFactory {
    fn build(&self) -> Box<dyn Strategy>;
}

impl StrategyFactory for fn() -> Box<dyn Strategy> {
    fn build(&self) -> Box<dyn Strategy> {
        self()
    }
}

/// Built-in policies, selectable by identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    SingleNumber,
    TwoColumns,
    AvoidLastColumn,
    AvoidLastDoubleOnGain,
    GainScaled,
    GainScaledWithZero,
    GainScaledWithWithdrawal,
    SixNumbers,
    SixNumbersMartingale,
    ThreeNumberAdaptive,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 10] = [
        StrategyKind::SingleNumber,
        StrategyKind::TwoColumns,
        StrategyKind::AvoidLastColumn,
        StrategyKind::AvoidLastDoubleOnGain,
        StrategyKind::GainScaled,
        StrategyKind::GainScaledWithZero,
        StrategyKind::GainScaledWithWithdrawal,
        StrategyKind::SixNumbers,
        StrategyKind::SixNumbersMartingale,
        StrategyKind::ThreeNumberAdaptive,
    ];

    /// Policies compared by a default batch run
    pub const DEFAULT_SET: [StrategyKind; 5] = [
        StrategyKind::TwoColumns,
        StrategyKind::AvoidLastColumn,
        StrategyKind::SixNumbers,
        StrategyKind::SixNumbersMartingale,
        StrategyKind::ThreeNumberAdaptive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::SingleNumber => "single-random-number",
            StrategyKind::TwoColumns => "two-columns-static",
            StrategyKind::AvoidLastColumn => "two-columns-avoid-last",
            StrategyKind::AvoidLastDoubleOnGain => "two-columns-avoid-last-double-on-gain",
            StrategyKind::GainScaled => "two-columns-scaled-by-gain",
            StrategyKind::GainScaledWithZero => "two-columns-scaled-by-gain-with-zero",
            StrategyKind::GainScaledWithWithdrawal => "two-columns-scaled-by-gain-with-withdrawal",
            StrategyKind::SixNumbers => "two-columns-six-numbers-static",
            StrategyKind::SixNumbersMartingale => "two-columns-six-numbers-martingale",
            StrategyKind::ThreeNumberAdaptive => "three-number-adaptive",
        }
    }

    /// Fresh policy instance for one session
    pub fn build(&self) -> Box<dyn Strategy> {
        match self {
            StrategyKind::SingleNumber => Box::new(SingleNumber),
            StrategyKind::TwoColumns => Box::new(TwoColumns),
            StrategyKind::AvoidLastColumn => Box::new(AvoidLastColumn::default()),
            StrategyKind::AvoidLastDoubleOnGain => Box::new(AvoidLastDoubleOnGain::default()),
            StrategyKind::GainScaled => Box::new(GainScaledColumns::plain()),
            StrategyKind::GainScaledWithZero => Box::new(GainScaledColumns::with_zero()),
            StrategyKind::GainScaledWithWithdrawal => {
                Box::new(GainScaledColumns::with_withdrawal())
            }
            StrategyKind::SixNumbers => Box::new(SixNumbers),
            StrategyKind::SixNumbersMartingale => Box::new(SixNumbersMartingale::default()),
            StrategyKind::ThreeNumberAdaptive => Box::new(ThreeNumberAdaptive::default()),
        }
    }
}

impl StrategyFactory for StrategyKind {
    fn build(&self) -> Box<dyn Strategy> {
        StrategyKind::build(self)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| SimError::UnknownStrategy(s.to_string()))
    }
}

/// Resolve a list of identifiers, failing on the first unknown one
pub fn parse_strategies<S: AsRef<str>>(names: &[S]) -> Result<Vec<StrategyKind>, SimError> {
    names.iter().map(|name| name.as_ref().parse()).collect()
}
