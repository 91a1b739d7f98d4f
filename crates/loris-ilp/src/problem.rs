//! The backend capability: build a maximisation over non-negative integer
//! variables, then solve.

use crate::SolverError;

pub type VarId = usize;

/// Terminal state reported by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus {
    Optimal,
    Infeasible,
    Unbounded,
    Timeout,
}

/// A solve outcome: status plus, when a solution exists, the assignment.
#[derive(Debug, Clone)]
pub struct Solution {
    pub status: SolverStatus,
    pub objective: u64,
    /// Variable values indexed by [`VarId`].
    pub values: Vec<u64>,
}

impl Solution {
    pub(crate) fn without_assignment(status: SolverStatus, num_vars: usize) -> Self {
        Self {
            status,
            objective: 0,
            values: vec![0; num_vars],
        }
    }
}

/// Abstract ILP solver interface.
///
/// Variables are non-negative integers. Constraints are `Σ coeff·x <= bound`
/// with non-negative coefficients; the objective is `maximize Σ coeff·x`.
/// Backends are selected at construction; there is no further polymorphism
/// beyond this capability.
pub trait IlpBackend {
    /// Declare a new variable and return its id.
    fn add_var(&mut self, name: &str) -> VarId;

    /// Add the constraint `Σ terms <= bound`.
    fn add_constraint(&mut self, name: &str, terms: &[(VarId, u64)], bound: u64);

    /// Set the maximisation objective.
    fn set_objective(&mut self, terms: &[(VarId, u64)]);

    /// Solve the accumulated problem.
    fn solve(&mut self) -> Result<Solution, SolverError>;

    /// Reset to an empty problem.
    fn reset(&mut self);
}

/// Problem data shared by the backends that serialise or search directly.
#[derive(Debug, Clone, Default)]
pub(crate) struct ProblemData {
    pub var_names: Vec<String>,
    pub constraints: Vec<ConstraintData>,
    pub objective: Vec<(VarId, u64)>,
}

#[derive(Debug, Clone)]
pub(crate) struct ConstraintData {
    pub name: String,
    pub terms: Vec<(VarId, u64)>,
    pub bound: u64,
}

impl ProblemData {
    pub fn add_var(&mut self, name: &str) -> VarId {
        self.var_names.push(name.to_string());
        self.var_names.len() - 1
    }

    pub fn add_constraint(&mut self, name: &str, terms: &[(VarId, u64)], bound: u64) {
        self.constraints.push(ConstraintData {
            name: name.to_string(),
            terms: terms.to_vec(),
            bound,
        });
    }

    pub fn num_vars(&self) -> usize {
        self.var_names.len()
    }
}
