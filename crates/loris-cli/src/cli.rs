//! CLI argument definitions: top-level `Cli` struct and `Commands` enum.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "loris")]
#[command(about = "Share-allocation analysis for secure multipath transmission")]
#[command(version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum PhaseArg {
    /// Passive adversary, (k, k) scheme
    #[value(name = "1")]
    One,
    /// Dropping adversary, (N, t) scheme
    #[value(name = "2")]
    Two,
    /// Tampering adversary (not yet available)
    #[value(name = "3")]
    Three,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SolverArg {
    /// Built-in exact branch-and-bound
    BranchBound,
    /// External COIN-OR CBC executable
    Cbc,
    /// External Gurobi executable
    Gurobi,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Enumerate minimal share allocations for a topology
    Analyze {
        /// Path to the topology JSON record
        topology: PathBuf,

        /// Adversary phase
        #[arg(long, default_value = "2")]
        phase: PhaseArg,

        /// Reliability target sigma
        #[arg(long, default_value_t = 0.95)]
        sigma: f64,

        /// Leakage bound tau
        #[arg(long, default_value_t = 0.01)]
        tau: f64,

        /// Maximum total shares per message
        #[arg(long, default_value_t = 10)]
        n_max: u32,

        /// Convolution drift guard
        #[arg(long, default_value_t = 1e-12)]
        renorm_epsilon: f64,

        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Enumerate allocations, then maximise messages per timeslot
    Optimize {
        /// Path to the topology JSON record
        topology: PathBuf,

        /// Adversary phase
        #[arg(long, default_value = "2")]
        phase: PhaseArg,

        /// Reliability target sigma
        #[arg(long, default_value_t = 0.95)]
        sigma: f64,

        /// Leakage bound tau
        #[arg(long, default_value_t = 0.01)]
        tau: f64,

        /// Maximum total shares per message
        #[arg(long, default_value_t = 10)]
        n_max: u32,

        /// ILP backend
        #[arg(long, value_enum, default_value_t = SolverArg::BranchBound)]
        solver: SolverArg,

        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Monte-Carlo validation of one allocation
    Simulate {
        /// Path to the topology JSON record
        topology: PathBuf,

        /// Share allocation vector, one count per path
        #[arg(long, value_delimiter = ',', required = true)]
        sav: Vec<u32>,

        /// Reconstruction threshold t
        #[arg(long)]
        threshold: u32,

        /// Number of trials
        #[arg(long, default_value_t = 10_000)]
        trials: u64,

        /// PRNG seed
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Field prime, decimal (default: 2^127 - 1)
        #[arg(long)]
        prime: Option<String>,

        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a random topology record on stdout
    Generate {
        #[command(subcommand)]
        kind: GenerateKind,
    },
}

#[derive(Subcommand)]
pub(crate) enum GenerateKind {
    /// Layered directed graph with guaranteed connectivity
    Layered {
        /// Nodes per layer, e.g. 1,3,3,1
        #[arg(long, value_delimiter = ',', required = true)]
        layers: Vec<usize>,

        /// Probability of each layer-to-layer edge
        #[arg(long, default_value_t = 0.5)]
        edge_prob: f64,

        /// Inclusive bandwidth range
        #[arg(long, default_value_t = 2)]
        bandwidth_min: u32,
        #[arg(long, default_value_t = 8)]
        bandwidth_max: u32,

        /// Number of compromised interior nodes
        #[arg(long, default_value_t = 0)]
        compromised: usize,

        /// Generator seed
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },

    /// Barabási–Albert preferential attachment graph
    Ba {
        /// Total node count
        #[arg(long)]
        nodes: usize,

        /// Fully connected core size
        #[arg(long, default_value_t = 3)]
        core: usize,

        /// Edges attached per new node
        #[arg(long, default_value_t = 2)]
        attach: usize,

        /// Inclusive bandwidth range
        #[arg(long, default_value_t = 2)]
        bandwidth_min: u32,
        #[arg(long, default_value_t = 8)]
        bandwidth_max: u32,

        /// Number of compromised interior nodes
        #[arg(long, default_value_t = 0)]
        compromised: usize,

        /// Generator seed
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}
