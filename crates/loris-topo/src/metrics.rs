//! Per-node adversary parameters and derived per-path metrics.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::topology::NodeId;
use crate::TopologyError;

/// Adversary parameters for one compromised node.
///
/// `p_int` is the probability the adversary observes a share crossing the
/// node; `delta` is the probability an observed share is then dropped. The
/// absolute per-node drop probability is the product of the two.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeParams {
    pub p_int: f64,
    #[serde(default)]
    pub delta: f64,
}

impl NodeParams {
    pub fn new(p_int: f64, delta: f64) -> Self {
        Self { p_int, delta }
    }

    /// Absolute probability this node drops a share.
    pub fn drop_prob(&self) -> f64 {
        self.p_int * self.delta
    }

    /// Probability a share passes the node intact.
    pub fn forward_prob(&self) -> f64 {
        1.0 - self.drop_prob()
    }

    pub(crate) fn validate(&self, node: NodeId) -> Result<(), TopologyError> {
        for value in [self.p_int, self.delta] {
            if !(0.0..=1.0).contains(&value) {
                return Err(TopologyError::InvalidProbability { node, value });
            }
        }
        Ok(())
    }
}

/// Derived metrics of one sender→receiver path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PathMetrics {
    /// Probability the adversary observes a share sent along the path:
    /// `1 − ∏ (1 − p_int)` over interior nodes.
    pub epsilon: f64,
    /// Probability the receiver obtains a share sent along the path:
    /// `∏ (1 − drop)` over interior nodes.
    pub rho: f64,
}

impl PathMetrics {
    /// Compute metrics for `path`, validating its shape.
    ///
    /// The path must start at `sender`, end at `receiver`, visit neither in
    /// an interior slot, and repeat no node. Nodes without parameters are
    /// trusted (`p_int = 0`, `delta = 0`).
    pub fn for_path(
        path: &[NodeId],
        node_params: &IndexMap<NodeId, NodeParams>,
        sender: NodeId,
        receiver: NodeId,
    ) -> Result<Self, TopologyError> {
        if path.len() < 2 || path[0] != sender || *path.last().expect("non-empty") != receiver {
            return Err(TopologyError::MalformedPath(format!(
                "path {path:?} does not run from {sender} to {receiver}"
            )));
        }
        // a repeat also covers sender/receiver showing up in an interior slot
        for (i, node) in path.iter().enumerate() {
            if path[..i].contains(node) {
                return Err(TopologyError::MalformedPath(format!(
                    "path {path:?} repeats node {node}"
                )));
            }
        }

        let mut non_leak = 1.0f64;
        let mut rho = 1.0f64;
        for node in &path[1..path.len() - 1] {
            if let Some(params) = node_params.get(node) {
                non_leak *= 1.0 - params.p_int;
                rho *= params.forward_prob();
            }
        }
        Ok(Self {
            epsilon: 1.0 - non_leak,
            rho,
        })
    }
}
