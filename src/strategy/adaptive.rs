//! Three-number adaptive play
//!
//! Picks three numbers at session start, favouring numbers that did not show
//! up in the prior outcomes, and keeps them for the whole session. Until the
//! first win it stakes one chip per number; afterwards the stake per number
//! grows with the current losing streak.

use rand::seq::SliceRandom;

use super::{DecisionContext, SetupContext, Strategy};
use crate::wager::Wager;
use crate::wheel::WHEEL_SIZE;

const PICKS: usize = 3;
/// Losing streaks longer than this reset the stake to one chip
const MAX_TRACKED_LOSSES: usize = 9;
const MAX_CHIPS_PER_NUMBER: usize = 10;

#[derive(Debug, Clone, Default)]
pub struct ThreeNumberAdaptive {
    numbers: Vec<u8>,
    first_win_seen: bool,
}

impl ThreeNumberAdaptive {
    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    /// Consecutive losing draws at the end of the history; marks the first
    /// win as seen when the scan reaches one
    fn trailing_losses(&mut self, ctx: &DecisionContext<'_>) -> usize {
        let mut losses = 0;
        for record in ctx.history().iter().rev() {
            if record.is_win() {
                self.first_win_seen = true;
                break;
            }
            losses += 1;
        }
        losses
    }

    fn stake_all(&self, chips: f64) -> Wager {
        let mut wager = Wager::new();
        for &number in &self.numbers {
            wager.on_number(number, chips);
        }
        wager
    }
}

impl Strategy for ThreeNumberAdaptive {
    fn name(&self) -> &'static str {
        "three-number-adaptive"
    }

    fn initialize(&mut self, ctx: &mut SetupContext<'_>) {
        let prior = ctx.prior().to_vec();
        let mut absent: Vec<u8> = (0..WHEEL_SIZE).filter(|n| !prior.contains(n)).collect();
        let mut seen = prior;
        absent.shuffle(ctx.rng());
        // duplicates kept so frequent numbers are more likely to lead
        seen.shuffle(ctx.rng());

        self.numbers.clear();
        self.first_win_seen = false;
        for number in absent.into_iter().chain(seen) {
            if !self.numbers.contains(&number) {
                self.numbers.push(number);
                if self.numbers.len() == PICKS {
                    break;
                }
            }
        }
    }

    fn decide(&mut self, ctx: &mut DecisionContext<'_>) -> Wager {
        let mut losses = self.trailing_losses(ctx);
        let count = self.numbers.len() as f64;
        let balance = ctx.balance();

        let wager = if self.first_win_seen {
            if losses > MAX_TRACKED_LOSSES {
                losses = 0;
            }
            let start = (losses + 1).min(MAX_CHIPS_PER_NUMBER);
            (1..=start)
                .rev()
                .map(|chips| chips as f64)
                .find(|chips| count * chips < balance)
                .map(|chips| self.stake_all(chips))
                .unwrap_or_default()
        } else if count < balance {
            self.stake_all(1.0)
        } else {
            Wager::new()
        };

        if wager.is_empty() {
            Wager::stop()
        } else {
            wager
        }
    }
}
