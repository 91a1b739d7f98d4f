//! Secrecy-throughput maximisation over minimal SAV tuples.
//!
//! Formulation: choose non-negative integer multiplicities `x_i`, one per
//! minimal tuple, maximising `Σ x_i` subject to every directed edge's
//! bandwidth: `Σ_i x_i · load(e, n^(i)) <= cap(e)` where `load(e, n)` counts
//! the shares `n` sends across `e`.
//!
//! Solving goes through the narrow [`IlpBackend`] capability. The built-in
//! branch-and-bound backend is exact and dependency-free; the CBC and
//! Gurobi backends shell out to external solver executables.

pub mod backends;
pub mod problem;
pub mod throughput;

pub use backends::branch_bound::BranchBound;
pub use backends::cbc::CbcBackend;
pub use backends::gurobi::GurobiBackend;
pub use problem::{IlpBackend, Solution, SolverStatus, VarId};
pub use throughput::{AllocationEntry, EdgeLoad, OptimizationResult, ThroughputOptimizer};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("problem is unbounded: some tuple loads no capacity-bearing edge")]
    Unbounded,
    #[error("solver hit its budget before proving optimality")]
    Timeout,
    #[error("solver backend failure: {0}")]
    BackendFailure(String),
}
