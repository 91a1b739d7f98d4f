//! Exact in-process branch-and-bound.
//!
//! Suited to the problems this crate actually produces: tens of variables,
//! small integer bounds. Every coefficient is non-negative, so each
//! variable's ceiling under the remaining capacities is a valid relaxation
//! bound, and the zero vector is always feasible.

use tracing::debug;

use crate::problem::{IlpBackend, ProblemData, Solution, SolverStatus, VarId};
use crate::SolverError;

const DEFAULT_NODE_BUDGET: u64 = 10_000_000;

#[derive(Debug, Default)]
pub struct BranchBound {
    data: ProblemData,
    node_budget: u64,
}

impl BranchBound {
    pub fn new() -> Self {
        Self {
            data: ProblemData::default(),
            node_budget: DEFAULT_NODE_BUDGET,
        }
    }

    /// Cap the number of search nodes; exceeding it reports `Timeout`.
    pub fn with_node_budget(mut self, node_budget: u64) -> Self {
        self.node_budget = node_budget;
        self
    }
}

struct Search<'a> {
    data: &'a ProblemData,
    obj: Vec<u64>,
    node_budget: u64,
    nodes: u64,
    best: u64,
    best_values: Vec<u64>,
}

impl Search<'_> {
    /// DFS over variables; values run from the ceiling downward so good
    /// incumbents arrive early and tighten the prune.
    fn run(&mut self, var: VarId, current: u64, values: &mut Vec<u64>, remaining: &mut Vec<u64>) -> Result<(), SolverError> {
        self.nodes += 1;
        if self.nodes > self.node_budget {
            return Err(SolverError::Timeout);
        }
        if var == self.data.num_vars() {
            if current > self.best {
                self.best = current;
                self.best_values = values.clone();
            }
            return Ok(());
        }

        // optimistic completion: every later variable at its ceiling
        let mut optimistic = current;
        for later in var..self.data.num_vars() {
            if self.obj[later] == 0 {
                continue;
            }
            let ceil = ceiling_of(self.data, later, remaining)
                .expect("unbounded variables are rejected before the search");
            optimistic += self.obj[later] * ceil;
        }
        if optimistic <= self.best && !self.best_values.is_empty() {
            return Ok(());
        }

        // a variable no constraint touches was either rejected up front
        // (positive objective) or is free to stay zero
        let ceil = ceiling_of(self.data, var, remaining).unwrap_or(0);
        for value in (0..=ceil).rev() {
            values.push(value);
            for (row, constraint) in self.data.constraints.iter().enumerate() {
                for &(v, coeff) in &constraint.terms {
                    if v == var {
                        remaining[row] -= coeff * value;
                    }
                }
            }
            self.run(var + 1, current + self.obj[var] * value, values, remaining)?;
            for (row, constraint) in self.data.constraints.iter().enumerate() {
                for &(v, coeff) in &constraint.terms {
                    if v == var {
                        remaining[row] += coeff * value;
                    }
                }
            }
            values.pop();
        }
        Ok(())
    }
}

/// Ceiling of `var` under what is left of every constraint it loads.
/// `None` means no constraint touches it: the problem is unbounded when the
/// variable's objective coefficient is positive.
fn ceiling_of(data: &ProblemData, var: VarId, remaining: &[u64]) -> Option<u64> {
    let mut ceiling: Option<u64> = None;
    for (row, constraint) in data.constraints.iter().enumerate() {
        for &(v, coeff) in &constraint.terms {
            if v == var && coeff > 0 {
                let quota = remaining[row] / coeff;
                ceiling = Some(ceiling.map_or(quota, |c| c.min(quota)));
            }
        }
    }
    ceiling
}

impl IlpBackend for BranchBound {
    fn add_var(&mut self, name: &str) -> VarId {
        self.data.add_var(name)
    }

    fn add_constraint(&mut self, name: &str, terms: &[(VarId, u64)], bound: u64) {
        self.data.add_constraint(name, terms, bound);
    }

    fn set_objective(&mut self, terms: &[(VarId, u64)]) {
        self.data.objective = terms.to_vec();
    }

    fn solve(&mut self) -> Result<Solution, SolverError> {
        let num_vars = self.data.num_vars();
        let mut obj = vec![0u64; num_vars];
        for &(v, c) in &self.data.objective {
            obj[v] = c;
        }

        let mut remaining: Vec<u64> = self.data.constraints.iter().map(|c| c.bound).collect();
        for var in 0..num_vars {
            if obj[var] > 0 && ceiling_of(&self.data, var, &remaining).is_none() {
                return Ok(Solution::without_assignment(SolverStatus::Unbounded, num_vars));
            }
        }

        let mut search = Search {
            data: &self.data,
            obj,
            node_budget: self.node_budget,
            nodes: 0,
            best: 0,
            best_values: Vec::new(),
        };
        let mut values = Vec::with_capacity(num_vars);
        match search.run(0, 0, &mut values, &mut remaining) {
            Ok(()) => {}
            Err(SolverError::Timeout) => {
                return Ok(Solution::without_assignment(SolverStatus::Timeout, num_vars))
            }
            Err(other) => return Err(other),
        }

        debug!(nodes = search.nodes, best = search.best, "branch-and-bound finished");
        let values = if search.best_values.is_empty() {
            vec![0; num_vars]
        } else {
            search.best_values
        };
        Ok(Solution {
            status: SolverStatus::Optimal,
            objective: search.best,
            values,
        })
    }

    fn reset(&mut self) {
        self.data = ProblemData::default();
    }
}
