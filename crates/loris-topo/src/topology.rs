//! The topology value object and its JSON-facing input record.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::metrics::{NodeParams, PathMetrics};
use crate::paths::find_all_paths;
use crate::TopologyError;

pub type NodeId = u32;

/// Default bound on enumerated simple paths.
pub const DEFAULT_MAX_PATHS: usize = 50;

fn default_max_paths() -> usize {
    DEFAULT_MAX_PATHS
}

/// One directed edge with its bandwidth capacity (shares per timeslot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub from: NodeId,
    pub to: NodeId,
    pub capacity: u32,
}

/// The serialisable topology record: adjacency, endpoints, per-node
/// adversary parameters, edge bandwidths, and the path-enumeration bound.
///
/// Nodes without parameters default to trusted `(0, 0)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologySpec {
    pub adjacency: IndexMap<NodeId, Vec<NodeId>>,
    pub sender: NodeId,
    pub receiver: NodeId,
    #[serde(default)]
    pub node_params: IndexMap<NodeId, NodeParams>,
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
    #[serde(default = "default_max_paths")]
    pub max_paths: usize,
}

/// A validated topology with its derived path set and metrics.
///
/// Paths and metrics are computed once at build time; the object is
/// immutable afterwards.
#[derive(Debug, Clone)]
pub struct Topology {
    spec: TopologySpec,
    bandwidths: IndexMap<(NodeId, NodeId), u32>,
    paths: Vec<Vec<NodeId>>,
    metrics: Vec<PathMetrics>,
}

impl Topology {
    /// Validate `spec`, enumerate paths, and derive per-path metrics.
    pub fn build(spec: TopologySpec) -> Result<Self, TopologyError> {
        let paths = find_all_paths(&spec.adjacency, spec.sender, spec.receiver, spec.max_paths);
        Self::with_paths(spec, paths)
    }

    /// As [`build`](Self::build), with an externally supplied path set
    /// (validated like any other input).
    pub fn with_paths(
        spec: TopologySpec,
        paths: Vec<Vec<NodeId>>,
    ) -> Result<Self, TopologyError> {
        if !spec.adjacency.contains_key(&spec.sender) {
            return Err(TopologyError::MissingSender(spec.sender));
        }
        let receiver_known = spec.adjacency.contains_key(&spec.receiver)
            || spec
                .adjacency
                .values()
                .any(|neigh| neigh.contains(&spec.receiver));
        if !receiver_known {
            return Err(TopologyError::MissingReceiver(spec.receiver));
        }
        for (node, params) in &spec.node_params {
            params.validate(*node)?;
        }
        let mut bandwidths = IndexMap::new();
        for edge in &spec.edges {
            if edge.capacity == 0 {
                return Err(TopologyError::InvalidCapacity(edge.from, edge.to));
            }
            bandwidths.insert((edge.from, edge.to), edge.capacity);
        }
        if paths.is_empty() {
            return Err(TopologyError::NoPaths);
        }
        let metrics = paths
            .iter()
            .map(|p| PathMetrics::for_path(p, &spec.node_params, spec.sender, spec.receiver))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            spec,
            bandwidths,
            paths,
            metrics,
        })
    }

    pub fn spec(&self) -> &TopologySpec {
        &self.spec
    }

    pub fn sender(&self) -> NodeId {
        self.spec.sender
    }

    pub fn receiver(&self) -> NodeId {
        self.spec.receiver
    }

    /// Ordered sender→receiver paths.
    pub fn paths(&self) -> &[Vec<NodeId>] {
        &self.paths
    }

    pub fn num_paths(&self) -> usize {
        self.paths.len()
    }

    /// Per-path metrics, index-aligned with [`paths`](Self::paths).
    pub fn metrics(&self) -> &[PathMetrics] {
        &self.metrics
    }

    /// Per-path leakage probabilities `ε_j`.
    pub fn epsilons(&self) -> Vec<f64> {
        self.metrics.iter().map(|m| m.epsilon).collect()
    }

    /// Per-path delivery probabilities `ρ_j`.
    pub fn rhos(&self) -> Vec<f64> {
        self.metrics.iter().map(|m| m.rho).collect()
    }

    /// Directed edge bandwidths.
    pub fn bandwidths(&self) -> &IndexMap<(NodeId, NodeId), u32> {
        &self.bandwidths
    }

    /// Map each capacity-bearing edge to the indices of paths crossing it.
    pub fn edge_path_map(&self) -> IndexMap<(NodeId, NodeId), Vec<usize>> {
        let mut map: IndexMap<(NodeId, NodeId), Vec<usize>> = IndexMap::new();
        for (j, path) in self.paths.iter().enumerate() {
            for pair in path.windows(2) {
                map.entry((pair[0], pair[1])).or_default().push(j);
            }
        }
        map
    }
}
