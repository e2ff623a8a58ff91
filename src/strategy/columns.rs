//! Column coverage policies
//!
//! Two columns cover 24 of 37 pockets at 3x. The variants differ in which
//! two columns they pick and how they size the stake as the pot grows.

use super::{DecisionContext, Strategy};
use crate::wager::Wager;

const COLUMNS: [u8; 3] = [0, 1, 2];

/// One chip on each column except `skip`
fn all_columns_but(skip: u8, chips: f64) -> Wager {
    let mut wager = Wager::new();
    for column in COLUMNS.into_iter().filter(|&c| c != skip) {
        wager.on_column(column, chips);
    }
    wager
}

/// Column of the previous draw, `None` before the first draw or after a zero
fn last_column(ctx: &DecisionContext<'_>) -> Option<u8> {
    ctx.last().and_then(|record| record.outcome.column)
}

/// One chip on columns 1 and 2 every draw
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoColumns;

impl Strategy for TwoColumns {
    fn name(&self) -> &'static str {
        "two-columns-static"
    }

    fn decide(&mut self, ctx: &mut DecisionContext<'_>) -> Wager {
        if ctx.balance() < 2.0 {
            return Wager::stop();
        }
        all_columns_but(2, 1.0)
    }
}

/// One chip on each column the previous draw missed
#[derive(Debug, Clone, Default)]
pub struct AvoidLastColumn {
    fallback: TwoColumns,
}

impl Strategy for AvoidLastColumn {
    fn name(&self) -> &'static str {
        "two-columns-avoid-last"
    }

    fn decide(&mut self, ctx: &mut DecisionContext<'_>) -> Wager {
        match last_column(ctx) {
            Some(column) if ctx.balance() >= 2.0 => all_columns_but(column, 1.0),
            _ => self.fallback.decide(ctx),
        }
    }
}

/// Avoid-last, plus one extra chip per staked column while the pot is
/// above half its starting size
#[derive(Debug, Clone, Default)]
pub struct AvoidLastDoubleOnGain {
    base: AvoidLastColumn,
}

impl Strategy for AvoidLastDoubleOnGain {
    fn name(&self) -> &'static str {
        "two-columns-avoid-last-double-on-gain"
    }

    fn decide(&mut self, ctx: &mut DecisionContext<'_>) -> Wager {
        let mut wager = self.base.decide(ctx);
        if wager.terminate {
            return wager;
        }
        let balance = ctx.balance();
        if balance - wager.total_stake() >= 2.0 && balance > ctx.initial_pot() / 2.0 {
            for column in COLUMNS {
                if wager.column_stake(column) > 0.0 {
                    wager.on_column(column, 1.0);
                }
            }
        }
        wager
    }
}

/// Gain-percent thresholds and the chips per column they unlock
type Ladder = &'static [(i64, f64)];

const GAIN_LADDER: Ladder = &[(20, 4.0), (10, 3.0), (5, 2.0)];
const GAIN_LADDER_WITH_ZERO: Ladder = &[(40, 8.0), (30, 6.0), (20, 4.0), (10, 3.0), (5, 2.0)];

/// Gain-percent above which part of the pot is taken out of play
const WITHDRAW_ABOVE_GAIN_PCT: i64 = 50;
/// Share of the initial pot withdrawn each time
const WITHDRAW_SHARE: f64 = 0.25;

/// Avoid-last columns with the stake per column rising as the pot grows
/// above its starting size. Optionally covers zero on big stakes and
/// banks part of the winnings.
#[derive(Debug, Clone)]
pub struct GainScaledColumns {
    name: &'static str,
    ladder: Ladder,
    cover_zero: bool,
    withdraw: bool,
}

impl GainScaledColumns {
    pub fn plain() -> Self {
        Self {
            name: "two-columns-scaled-by-gain",
            ladder: GAIN_LADDER,
            cover_zero: false,
            withdraw: false,
        }
    }

    pub fn with_zero() -> Self {
        Self {
            name: "two-columns-scaled-by-gain-with-zero",
            ladder: GAIN_LADDER_WITH_ZERO,
            cover_zero: true,
            withdraw: false,
        }
    }

    pub fn with_withdrawal() -> Self {
        Self {
            name: "two-columns-scaled-by-gain-with-withdrawal",
            withdraw: true,
            ..Self::with_zero()
        }
    }

    fn chips_for(&self, gain_pct: i64) -> f64 {
        self.ladder
            .iter()
            .find(|(threshold, _)| gain_pct >= *threshold)
            .map_or(1.0, |(_, chips)| *chips)
    }
}

impl Strategy for GainScaledColumns {
    fn name(&self) -> &'static str {
        self.name
    }

    fn decide(&mut self, ctx: &mut DecisionContext<'_>) -> Wager {
        // sized on the pot before any withdrawal this turn
        let gain_pct = ctx.gain_percent();
        if self.withdraw && gain_pct > WITHDRAW_ABOVE_GAIN_PCT {
            let chips = (ctx.initial_pot() * WITHDRAW_SHARE).floor();
            ctx.withdraw(chips);
        }

        if ctx.balance() < 2.0 {
            return Wager::stop();
        }

        let Some(skip) = last_column(ctx) else {
            return all_columns_but(2, 1.0);
        };

        let chips = self.chips_for(gain_pct);
        let mut wager = all_columns_but(skip, chips);
        if self.cover_zero && chips > 2.0 {
            wager.on_number(0, 1.0);
        }
        if wager.total_stake() > ctx.balance() {
            return all_columns_but(skip, 1.0);
        }
        wager
    }
}
