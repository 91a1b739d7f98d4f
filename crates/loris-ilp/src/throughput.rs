//! The throughput optimizer: tuples + capacities in, allocation out.

use serde::Serialize;
use tracing::info;

use loris_phases::MinimalTuple;
use loris_topo::{NodeId, Topology};

use crate::problem::{IlpBackend, SolverStatus};
use crate::SolverError;

/// One tuple's multiplicity in the optimal allocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationEntry {
    pub sav: Vec<u32>,
    pub threshold: u32,
    pub count: u64,
}

/// Load placed on one edge by the allocation, against its capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EdgeLoad {
    pub from: NodeId,
    pub to: NodeId,
    pub load: u64,
    pub capacity: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimizationResult {
    pub status: String,
    /// Messages per timeslot.
    pub objective: u64,
    /// Tuples with nonzero multiplicity.
    pub allocation: Vec<AllocationEntry>,
    pub edge_loads: Vec<EdgeLoad>,
}

/// Maximise messages per timeslot over a set of minimal tuples.
#[derive(Debug)]
pub struct ThroughputOptimizer<'a> {
    topology: &'a Topology,
}

impl<'a> ThroughputOptimizer<'a> {
    pub fn new(topology: &'a Topology) -> Self {
        Self { topology }
    }

    /// Build the ILP and solve it on `backend`.
    ///
    /// Backend `Infeasible` comes back as an explicit empty allocation;
    /// `Unbounded` means a tuple loads no capacity-bearing edge, which is a
    /// modelling error and surfaces as [`SolverError::Unbounded`].
    pub fn optimize(
        &self,
        tuples: &[MinimalTuple],
        backend: &mut dyn IlpBackend,
    ) -> Result<OptimizationResult, SolverError> {
        if tuples.is_empty() {
            return Ok(OptimizationResult {
                status: "NoTuples".to_string(),
                objective: 0,
                allocation: Vec::new(),
                edge_loads: Vec::new(),
            });
        }

        let edge_paths = self.topology.edge_path_map();
        let vars: Vec<_> = (0..tuples.len())
            .map(|i| backend.add_var(&format!("x{i}")))
            .collect();

        // one capacity row per edge that at least one allocation loads
        let mut rows: Vec<((NodeId, NodeId), Vec<(usize, u64)>, u64)> = Vec::new();
        for (&(from, to), &capacity) in self.topology.bandwidths() {
            let Some(path_indices) = edge_paths.get(&(from, to)) else {
                continue;
            };
            let mut terms = Vec::new();
            for (i, tuple) in tuples.iter().enumerate() {
                let load: u64 = path_indices.iter().map(|&j| u64::from(tuple.sav[j])).sum();
                if load > 0 {
                    terms.push((vars[i], load));
                }
            }
            if terms.is_empty() {
                continue;
            }
            backend.add_constraint(&format!("cap_{from}_{to}"), &terms, u64::from(capacity));
            rows.push(((from, to), terms, u64::from(capacity)));
        }

        let objective: Vec<(usize, u64)> = vars.iter().map(|&v| (v, 1)).collect();
        backend.set_objective(&objective);
        let solution = backend.solve()?;

        match solution.status {
            SolverStatus::Optimal => {}
            SolverStatus::Infeasible => {
                return Ok(OptimizationResult {
                    status: "Infeasible".to_string(),
                    objective: 0,
                    allocation: Vec::new(),
                    edge_loads: Vec::new(),
                });
            }
            SolverStatus::Unbounded => return Err(SolverError::Unbounded),
            SolverStatus::Timeout => return Err(SolverError::Timeout),
        }

        let allocation: Vec<AllocationEntry> = tuples
            .iter()
            .zip(&solution.values)
            .filter(|(_, &count)| count > 0)
            .map(|(tuple, &count)| AllocationEntry {
                sav: tuple.sav.clone(),
                threshold: tuple.threshold,
                count,
            })
            .collect();

        let edge_loads: Vec<EdgeLoad> = rows
            .iter()
            .map(|((from, to), terms, capacity)| {
                let load = terms
                    .iter()
                    .map(|&(var, coeff)| coeff * solution.values[var])
                    .sum();
                EdgeLoad {
                    from: *from,
                    to: *to,
                    load,
                    capacity: *capacity as u32,
                }
            })
            .collect();
        debug_assert!(edge_loads.iter().all(|e| e.load <= u64::from(e.capacity)));

        info!(
            objective = solution.objective,
            tuples_used = allocation.len(),
            "throughput optimisation finished"
        );
        Ok(OptimizationResult {
            status: "Optimal".to_string(),
            objective: solution.objective,
            allocation,
            edge_loads,
        })
    }
}
