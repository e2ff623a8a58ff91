//! Random draw source
//!
//! Every `rand::RngCore` is a draw source. Production runs use an
//! entropy-seeded `StdRng`; tests and replays pass a fixed seed.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::wheel::WHEEL_SIZE;

/// Uniform source of pocket indices in `0..=36`
pub trait DrawSource {
    fn next_index(&mut self) -> u8;
}

impl<R: RngCore + ?Sized> DrawSource for R {
    fn next_index(&mut self) -> u8 {
        self.gen_range(0..WHEEL_SIZE)
    }
}

/// Draw `len` pockets in order
pub fn draw_sequence<S: DrawSource + ?Sized>(source: &mut S, len: usize) -> Vec<u8> {
    (0..len).map(|_| source.next_index()).collect()
}

/// Build the batch RNG: seeded when a seed is configured, OS entropy otherwise
pub fn batch_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Derive an independent per-session RNG from the batch RNG
pub fn session_rng(parent: &mut dyn RngCore) -> StdRng {
    StdRng::seed_from_u64(parent.next_u64())
}
