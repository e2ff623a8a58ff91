//! Wager - the stakes placed before one draw
//!
//! Stakes accumulate: placing twice on the same target adds up. Payout is
//! pure credit; the stake itself is debited by the session before the draw.

use std::fmt;

use crate::wheel::{DrawOutcome, WHEEL_SIZE};

/// Straight-up bets pay 36x the stake (stake included)
pub const STRAIGHT_PAYOUT: f64 = 36.0;
/// Columns and dozens pay 3x
pub const COLUMN_DOZEN_PAYOUT: f64 = 3.0;
/// Even-money bets pay 2x
pub const EVEN_MONEY_PAYOUT: f64 = 2.0;

/// Stakes for one pending draw
#[derive(Debug, Clone, PartialEq)]
pub struct Wager {
    straight: [f64; WHEEL_SIZE as usize],
    columns: [f64; 3],
    dozens: [f64; 3],
    even: f64,
    odd: f64,
    low: f64,
    high: f64,
    red: f64,
    black: f64,
    /// End the session instead of playing this wager
    pub terminate: bool,
}

impl Default for Wager {
    fn default() -> Self {
        Self {
            straight: [0.0; WHEEL_SIZE as usize],
            columns: [0.0; 3],
            dozens: [0.0; 3],
            even: 0.0,
            odd: 0.0,
            low: 0.0,
            high: 0.0,
            red: 0.0,
            black: 0.0,
            terminate: false,
        }
    }
}

impl Wager {
    pub fn new() -> Self {
        Self::default()
    }

    /// A wager that ends the session
    pub fn stop() -> Self {
        Self {
            terminate: true,
            ..Self::default()
        }
    }

    pub fn on_number(&mut self, number: u8, chips: f64) -> &mut Self {
        debug_assert!(number < WHEEL_SIZE, "number {} off the wheel", number);
        self.straight[number as usize] += chips.max(0.0);
        self
    }

    /// `column` is 0-based
    pub fn on_column(&mut self, column: u8, chips: f64) -> &mut Self {
        self.columns[column as usize] += chips.max(0.0);
        self
    }

    /// `dozen` is 0-based
    pub fn on_dozen(&mut self, dozen: u8, chips: f64) -> &mut Self {
        self.dozens[dozen as usize] += chips.max(0.0);
        self
    }

    pub fn on_even(&mut self, chips: f64) -> &mut Self {
        self.even += chips.max(0.0);
        self
    }

    pub fn on_odd(&mut self, chips: f64) -> &mut Self {
        self.odd += chips.max(0.0);
        self
    }

    pub fn on_low(&mut self, chips: f64) -> &mut Self {
        self.low += chips.max(0.0);
        self
    }

    pub fn on_high(&mut self, chips: f64) -> &mut Self {
        self.high += chips.max(0.0);
        self
    }

    pub fn on_red(&mut self, chips: f64) -> &mut Self {
        self.red += chips.max(0.0);
        self
    }

    pub fn on_black(&mut self, chips: f64) -> &mut Self {
        self.black += chips.max(0.0);
        self
    }

    pub fn column_stake(&self, column: u8) -> f64 {
        self.columns[column as usize]
    }

    pub fn number_stake(&self, number: u8) -> f64 {
        self.straight[number as usize]
    }

    /// Sum of every placed stake
    pub fn total_stake(&self) -> f64 {
        self.straight.iter().sum::<f64>()
            + self.columns.iter().sum::<f64>()
            + self.dozens.iter().sum::<f64>()
            + self.even
            + self.odd
            + self.low
            + self.high
            + self.red
            + self.black
    }

    pub fn is_empty(&self) -> bool {
        self.total_stake() <= 0.0
    }

    /// Multiply every stake in place (martingale-style escalation).
    /// Policies only pass positive factors; any non-zero factor can be undone
    /// with its inverse.
    pub fn scale(&mut self, factor: f64) {
        debug_assert!(factor != 0.0, "scale factor must be non-zero");
        for stake in self
            .straight
            .iter_mut()
            .chain(self.columns.iter_mut())
            .chain(self.dozens.iter_mut())
        {
            *stake *= factor;
        }
        for stake in [
            &mut self.even,
            &mut self.odd,
            &mut self.low,
            &mut self.high,
            &mut self.red,
            &mut self.black,
        ] {
            *stake *= factor;
        }
    }

    /// Total credit returned for `outcome`
    pub fn payout(&self, outcome: &DrawOutcome) -> f64 {
        let straight = self.straight[outcome.index as usize] * STRAIGHT_PAYOUT;

        let column = outcome
            .column
            .map_or(0.0, |c| self.columns[c as usize] * COLUMN_DOZEN_PAYOUT);
        let dozen = outcome
            .dozen
            .map_or(0.0, |d| self.dozens[d as usize] * COLUMN_DOZEN_PAYOUT);

        let even_money = [
            (outcome.is_even, self.even),
            (outcome.is_odd, self.odd),
            (outcome.is_low, self.low),
            (outcome.is_high, self.high),
            (outcome.is_red, self.red),
            (outcome.is_black, self.black),
        ]
        .iter()
        .filter(|(hit, _)| *hit)
        .map(|(_, stake)| stake * EVEN_MONEY_PAYOUT)
        .sum::<f64>();

        straight + column + dozen + even_money
    }

    /// Human-readable list of non-zero stakes, e.g. `red:1,7:1,col1:5`
    pub fn render(&self) -> String {
        let mut parts = Vec::new();
        for (label, stake) in [
            ("even", self.even),
            ("odd", self.odd),
            ("high", self.high),
            ("low", self.low),
            ("black", self.black),
            ("red", self.red),
        ] {
            if stake > 0.0 {
                parts.push(format!("{}:{}", label, stake));
            }
        }
        for (number, stake) in self.straight.iter().enumerate() {
            if *stake > 0.0 {
                parts.push(format!("{}:{}", number, stake));
            }
        }
        for (dozen, stake) in self.dozens.iter().enumerate() {
            if *stake > 0.0 {
                parts.push(format!("dz{}:{}", dozen + 1, stake));
            }
        }
        for (column, stake) in self.columns.iter().enumerate() {
            if *stake > 0.0 {
                parts.push(format!("col{}:{}", column + 1, stake));
            }
        }
        parts.join(",")
    }
}

impl fmt::Display for Wager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terminate {
            write!(f, "STOP")
        } else {
            write!(f, "{}", self.render())
        }
    }
}
