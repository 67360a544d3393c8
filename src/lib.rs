//! # Hedge Scheduler
//!
//! Imbalance timing for multi-leg trading strategies.
//!
//! Strategies that work both sides of a market (arbitrage, statistical
//! arbitrage, guaranteed-win baskets) can end up one-legged: one leg fills
//! and the offsetting leg does not. This crate owns the timing decision for
//! that state: how long a one-sided fill may persist before the strategy
//! must force a corrective hedge.
//!
//! ## Architecture
//!
//! - `config`: Configuration management and validation
//! - `hedging`: Per-contract imbalance tracking and the clock abstraction

pub mod config;
pub mod hedging;

pub use config::Config;
pub use hedging::{
    Clock, HedgeScheduler, ManualClock, PendingImbalance, SchedulerError, SystemClock,
};
