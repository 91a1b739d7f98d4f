use std::path::Path;

use miette::{miette, IntoDiagnostic};

use loris_phases::{Enumeration, Phase1, Phase2, PhaseStrategy};

use crate::cli::PhaseArg;
use crate::commands::load_topology;

pub(crate) fn run(
    topology: &Path,
    phase: PhaseArg,
    sigma: f64,
    tau: f64,
    n_max: u32,
    renorm_epsilon: f64,
    json: bool,
) -> miette::Result<()> {
    let topo = load_topology(topology)?;
    let result = enumerate(&topo, phase, sigma, tau, n_max, renorm_epsilon)?;
    report(&topo, &result, json)
}

pub(crate) fn enumerate(
    topo: &loris_topo::Topology,
    phase: PhaseArg,
    sigma: f64,
    tau: f64,
    n_max: u32,
    renorm_epsilon: f64,
) -> miette::Result<Enumeration> {
    match phase {
        PhaseArg::One => {
            let strategy = Phase1::from_topology(topo, sigma, tau).into_diagnostic()?;
            strategy.generate_minimal_tuples(n_max, None).into_diagnostic()
        }
        PhaseArg::Two => {
            let strategy = Phase2::from_topology(topo, sigma, tau)
                .into_diagnostic()?
                .with_renorm_epsilon(renorm_epsilon);
            strategy.generate_minimal_tuples(n_max, None).into_diagnostic()
        }
        PhaseArg::Three => Err(miette!(
            "phase 3 is an interface slot; use phase 1 or 2"
        )),
    }
}

fn report(topo: &loris_topo::Topology, result: &Enumeration, json: bool) -> miette::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result).into_diagnostic()?);
        return Ok(());
    }
    println!("paths:");
    for (j, (path, m)) in topo.paths().iter().zip(topo.metrics()).enumerate() {
        println!(
            "  P{}: {:?}  eps={:.4} rho={:.4}",
            j + 1,
            path,
            m.epsilon,
            m.rho
        );
    }
    println!("minimal tuples ({}):", result.tuples.len());
    for tuple in &result.tuples {
        println!("  {tuple}");
    }
    if result.budget_exhausted {
        println!("note: share budget reached while candidates remained");
    }
    Ok(())
}
