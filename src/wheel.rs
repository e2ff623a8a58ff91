//! Wheel model
//!
//! Maps a drawn pocket index (0..=36, single-zero wheel) to the attributes the
//! outside bets are settled against.

use serde::{Deserialize, Serialize};

/// Number of pockets on the wheel
pub const WHEEL_SIZE: u8 = 37;

pub const BLACK_NUMBERS: [u8; 18] = [
    2, 4, 6, 8, 10, 11, 13, 15, 17, 20, 22, 24, 26, 28, 29, 31, 33, 35,
];
pub const RED_NUMBERS: [u8; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];

/// Resolved attributes of one draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawOutcome {
    pub index: u8,
    pub is_zero: bool,
    pub is_even: bool,
    pub is_odd: bool,
    /// 1-18
    pub is_low: bool,
    /// 19-36
    pub is_high: bool,
    pub is_red: bool,
    pub is_black: bool,
    /// 0-based column, `None` on zero
    pub column: Option<u8>,
    /// 0-based dozen, `None` on zero
    pub dozen: Option<u8>,
}

/// Classify a pocket index.
///
/// Indices above 36 are reduced modulo the wheel size so the function is total.
pub fn classify(index: u8) -> DrawOutcome {
    let index = index % WHEEL_SIZE;
    if index == 0 {
        return DrawOutcome {
            index,
            is_zero: true,
            is_even: false,
            is_odd: false,
            is_low: false,
            is_high: false,
            is_red: false,
            is_black: false,
            column: None,
            dozen: None,
        };
    }

    let is_even = index % 2 == 0;
    let is_low = index <= 18;
    DrawOutcome {
        index,
        is_zero: false,
        is_even,
        is_odd: !is_even,
        is_low,
        is_high: !is_low,
        is_red: RED_NUMBERS.contains(&index),
        is_black: BLACK_NUMBERS.contains(&index),
        column: Some((index - 1) % 3),
        dozen: Some((index - 1) / 12),
    }
}

impl DrawOutcome {
    /// 1-based column for display, `None` on zero
    pub fn column_label(&self) -> Option<u8> {
        self.column.map(|c| c + 1)
    }

    /// 1-based dozen for display, `None` on zero
    pub fn dozen_label(&self) -> Option<u8> {
        self.dozen.map(|d| d + 1)
    }
}
