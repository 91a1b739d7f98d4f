//! Monte-Carlo simulation of multipath secret-sharing transmission.
//!
//! Each trial shares a fresh secret, pushes the shares down their assigned
//! paths, and samples two independent events per share: interception (the
//! adversary observes it, probability `ε_j`) and loss (the receiver misses
//! it, probability `1 − ρ_j`). The receiver reconstructs when enough shares
//! survive; the adversary breaches when it observes enough. Aggregates are
//! compared against the analytical engine by the test suite.
//!
//! Trial events come from a seedable deterministic PRNG so runs reproduce;
//! share-polynomial coefficients still come from the OS entropy source.

pub mod simulator;

pub use simulator::{SimulationResult, Simulator, TrialOutcome};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("allocation has {sav_len} entries for {paths} paths")]
    SavShapeMismatch { sav_len: usize, paths: usize },
    #[error("threshold {t} not in [1, {n}]")]
    BadThreshold { t: u32, n: u32 },
    #[error("no shares allocated")]
    EmptyAllocation,
    #[error(transparent)]
    Field(#[from] loris_field::FieldError),
}

/// Half-width of the normal-approximation confidence interval for an
/// empirical proportion: `z · sqrt(p (1 − p) / n)`.
///
/// `z = 3.29` covers ~99.9%; agreement tests use it so a fixed seed stays
/// comfortably inside the band around the analytical rate.
pub fn confidence_half_width(p: f64, n_trials: u64, z: f64) -> f64 {
    z * (p * (1.0 - p) / n_trials as f64).sqrt()
}
