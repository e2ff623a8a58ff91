//! Single random number: one chip straight-up on a fresh random pocket each draw

use super::{DecisionContext, Strategy};
use crate::rng::DrawSource;
use crate::wager::Wager;

#[derive(Debug, Clone, Copy, Default)]
pub struct SingleNumber;

impl Strategy for SingleNumber {
    fn name(&self) -> &'static str {
        "single-random-number"
    }

    fn decide(&mut self, ctx: &mut DecisionContext<'_>) -> Wager {
        // a fractional remainder cannot cover the chip
        if ctx.balance() < 1.0 {
            return Wager::stop();
        }
        let number = ctx.rng().next_index();
        let mut wager = Wager::new();
        wager.on_number(number, 1.0);
        wager
    }
}
