use std::path::Path;

use miette::{miette, IntoDiagnostic};
use num::BigUint;

use loris_field::PrimeField;
use loris_sim::Simulator;

use crate::commands::load_topology;

pub(crate) fn run(
    topology: &Path,
    sav: &[u32],
    threshold: u32,
    trials: u64,
    seed: u64,
    prime: Option<&str>,
    json: bool,
) -> miette::Result<()> {
    let topo = load_topology(topology)?;
    let field = match prime {
        None => PrimeField::mersenne127(),
        Some(text) => {
            let value = text
                .parse::<BigUint>()
                .map_err(|e| miette!("prime {text:?} is not a decimal integer: {e}"))?;
            PrimeField::new(value).into_diagnostic()?
        }
    };

    let mut sim = Simulator::new(&topo, field, seed);
    let result = sim.run(sav, threshold, trials, None).into_diagnostic()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
        return Ok(());
    }
    println!("trials: {} (seed {})", result.n_trials, result.seed);
    println!(
        "reliability: {:.4} ({} reconstructed)",
        result.reliability, result.n_reconstructed
    );
    println!(
        "confidentiality breach: {:.4} ({} breaches)",
        result.confidentiality_breach, result.n_breached
    );
    println!(
        "avg shares received: {:.3}, avg leaked: {:.3}",
        result.avg_shares_received, result.avg_shares_leaked
    );
    Ok(())
}
