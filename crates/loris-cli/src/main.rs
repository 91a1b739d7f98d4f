use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze {
            topology,
            phase,
            sigma,
            tau,
            n_max,
            renorm_epsilon,
            json,
        } => commands::analyze::run(&topology, phase, sigma, tau, n_max, renorm_epsilon, json),
        Commands::Optimize {
            topology,
            phase,
            sigma,
            tau,
            n_max,
            solver,
            json,
        } => commands::optimize::run(&topology, phase, sigma, tau, n_max, solver, json),
        Commands::Simulate {
            topology,
            sav,
            threshold,
            trials,
            seed,
            prime,
            json,
        } => commands::simulate::run(&topology, &sav, threshold, trials, seed, prime.as_deref(), json),
        Commands::Generate { kind } => commands::generate::run(kind),
    }
}
