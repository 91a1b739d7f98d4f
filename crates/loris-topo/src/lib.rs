//! Network topology model for multipath share routing.
//!
//! A [`Topology`] is a value object: adjacency, sender/receiver, per-node
//! adversary parameters, and per-edge bandwidths. Paths and their derived
//! metrics (`ε`, `ρ`) are computed once at build time and are immutable
//! afterwards. Paths are treated as stochastically independent even when
//! they share nodes; that simplification is part of the model's contract.

pub mod abort;
pub mod generators;
pub mod metrics;
pub mod paths;
pub mod topology;

pub use abort::AbortToken;
pub use metrics::{NodeParams, PathMetrics};
pub use topology::{EdgeSpec, NodeId, Topology, TopologySpec, DEFAULT_MAX_PATHS};

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TopologyError {
    #[error("sender {0} is not a node of the adjacency")]
    MissingSender(NodeId),
    #[error("receiver {0} is not a node of the adjacency")]
    MissingReceiver(NodeId),
    #[error("probability {value} for node {node} is outside [0, 1]")]
    InvalidProbability { node: NodeId, value: f64 },
    #[error("edge ({0}, {1}) has zero capacity")]
    InvalidCapacity(NodeId, NodeId),
    #[error("no path from sender to receiver")]
    NoPaths,
    #[error("malformed path: {0}")]
    MalformedPath(String),
}
