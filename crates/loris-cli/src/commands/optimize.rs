use std::path::Path;

use miette::IntoDiagnostic;

use loris_ilp::{BranchBound, CbcBackend, GurobiBackend, IlpBackend, ThroughputOptimizer};

use crate::cli::{PhaseArg, SolverArg};
use crate::commands::{analyze, load_topology};

pub(crate) fn run(
    topology: &Path,
    phase: PhaseArg,
    sigma: f64,
    tau: f64,
    n_max: u32,
    solver: SolverArg,
    json: bool,
) -> miette::Result<()> {
    let topo = load_topology(topology)?;
    let enumeration = analyze::enumerate(&topo, phase, sigma, tau, n_max, 1e-12)?;

    let mut backend: Box<dyn IlpBackend> = match solver {
        SolverArg::BranchBound => Box::new(BranchBound::new()),
        SolverArg::Cbc => Box::new(CbcBackend::new()),
        SolverArg::Gurobi => Box::new(GurobiBackend::new()),
    };
    let result = ThroughputOptimizer::new(&topo)
        .optimize(&enumeration.tuples, backend.as_mut())
        .into_diagnostic()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
        return Ok(());
    }
    println!("status: {}", result.status);
    println!("throughput: {} messages/timeslot", result.objective);
    println!("allocation:");
    for entry in &result.allocation {
        println!("  {}x n={:?} t={}", entry.count, entry.sav, entry.threshold);
    }
    println!("edge loads:");
    for edge in &result.edge_loads {
        println!(
            "  ({}, {}): {}/{}",
            edge.from, edge.to, edge.load, edge.capacity
        );
    }
    Ok(())
}
