//! Roulette-Sim Library
//!
//! Batch simulator comparing roulette betting strategies over shared draw sequences

pub mod batch;
pub mod config;
pub mod error;
pub mod persistence;
pub mod rng;
pub mod session;
pub mod strategy;
pub mod wager;
pub mod wheel;

pub use batch::{BatchReport, BatchRunner, ViolationPolicy};
pub use error::SimError;
pub use session::{Bankroll, DrawRecord, Session, SessionState, SessionSummary};
pub use strategy::{DecisionContext, SetupContext, Strategy, StrategyFactory, StrategyKind};
pub use wager::Wager;
pub use wheel::{classify, DrawOutcome};
