//! Share-allocation-vector (SAV) enumeration strategies.
//!
//! A strategy turns per-path metrics and `(σ, τ)` targets into the ordered
//! set of *minimal* SAV tuples: allocations `(n, t)` that meet both targets
//! and become infeasible when any positive coordinate is decremented.
//!
//! Phase I models a passive adversary with a `(k, k)` scheme; Phase II adds
//! dropping and searches full `(N, t)` thresholds; Phase III is an interface
//! slot for the tampering-adversary strategy.

pub mod phase1;
pub mod phase2;
pub mod phase3;
pub mod strategy;

pub use phase1::Phase1;
pub use phase2::Phase2;
pub use phase3::Phase3;
pub use strategy::{enumerate_minimal, Enumeration, MinimalTuple, PhaseStrategy};

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PhaseError {
    #[error("{name} must lie in {range}, got {value}")]
    InvalidTarget {
        name: &'static str,
        range: &'static str,
        value: f64,
    },
    #[error("no feasible SAV tuple with at most {n_max} total shares")]
    InfeasibleParameters { n_max: u32 },
    #[error("enumeration aborted")]
    Aborted,
    #[error("{0} is not implemented")]
    Unsupported(&'static str),
    #[error(transparent)]
    Prob(#[from] loris_prob::ProbError),
}
