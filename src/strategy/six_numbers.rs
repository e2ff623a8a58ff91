//! Two columns plus six half-chip numbers
//!
//! Columns 1 and 2 carry the bulk of the stake; the six numbers (zero and
//! five numbers of the uncovered third column) soften the misses.

use super::{DecisionContext, SingleNumber, Strategy};
use crate::wager::Wager;

const COVER_NUMBERS: [u8; 6] = [0, 3, 12, 15, 30, 33];
const CHIPS_PER_COLUMN: f64 = 5.0;
const CHIPS_PER_NUMBER: f64 = 0.5;

/// Stop once the pot reaches this size
const TAKE_PROFIT_AT: f64 = 350.0;

/// (minimum bankroll, consecutive winning draws, stake multiplier),
/// checked from the most aggressive step down
const ESCALATION: [(f64, usize, f64); 3] = [(200.0, 3, 4.0), (100.0, 2, 3.0), (50.0, 1, 2.0)];

fn base_wager() -> Wager {
    let mut wager = Wager::new();
    wager
        .on_column(0, CHIPS_PER_COLUMN)
        .on_column(1, CHIPS_PER_COLUMN);
    for number in COVER_NUMBERS {
        wager.on_number(number, CHIPS_PER_NUMBER);
    }
    wager
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SixNumbers;

impl Strategy for SixNumbers {
    fn name(&self) -> &'static str {
        "two-columns-six-numbers-static"
    }

    fn decide(&mut self, ctx: &mut DecisionContext<'_>) -> Wager {
        let wager = base_wager();
        if ctx.balance() < wager.total_stake() {
            return Wager::stop();
        }
        wager
    }
}

/// The six-numbers wager, doubled to quadrupled after winning streaks on a
/// healthy pot. Hands over to a single random number once the base wager no
/// longer fits.
#[derive(Debug, Clone, Default)]
pub struct SixNumbersMartingale {
    fallback: SingleNumber,
}

impl Strategy for SixNumbersMartingale {
    fn name(&self) -> &'static str {
        "two-columns-six-numbers-martingale"
    }

    fn decide(&mut self, ctx: &mut DecisionContext<'_>) -> Wager {
        let balance = ctx.balance();
        if balance >= TAKE_PROFIT_AT {
            return Wager::stop();
        }

        let mut wager = base_wager();
        let base_stake = wager.total_stake();
        if base_stake > balance {
            return self.fallback.decide(ctx);
        }

        let step = ESCALATION.iter().find(|(min_bankroll, streak, factor)| {
            balance >= *min_bankroll && ctx.won_last(*streak) && balance >= factor * base_stake
        });
        if let Some((_, _, factor)) = step {
            wager.scale(*factor);
        }
        wager
    }
}
