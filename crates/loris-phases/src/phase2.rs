//! Phase II: passive leakage plus dropping, full `(N, t)` schemes.

use loris_prob::{sum_pmf, tail_ge, threshold_interval, DEFAULT_RENORM_EPSILON};
use loris_topo::{PathMetrics, Topology};

use crate::strategy::{validate_targets, PhaseStrategy};
use crate::PhaseError;

/// Allocation strategy for an adversary that both observes and drops.
///
/// An allocation `n` is feasible when some threshold `t` gives the receiver
/// `Pr[X_B >= t] >= sigma` with `X_B ~ Σ Binomial(n_j, ρ_j)` while keeping
/// the adversary at `Pr[X_E >= t] <= tau` with `X_E ~ Σ Binomial(n_j, ε_j)`.
/// The canonical threshold is the smallest member of the feasible interval:
/// it leaves the most room for future drops.
#[derive(Debug, Clone)]
pub struct Phase2 {
    epsilons: Vec<f64>,
    rhos: Vec<f64>,
    sigma: f64,
    tau: f64,
    renorm_epsilon: f64,
}

impl Phase2 {
    pub fn new(metrics: &[PathMetrics], sigma: f64, tau: f64) -> Result<Self, PhaseError> {
        validate_targets(sigma, tau)?;
        for m in metrics {
            for value in [m.epsilon, m.rho] {
                if !(0.0..=1.0).contains(&value) {
                    return Err(loris_prob::ProbError::InvalidProbability(value).into());
                }
            }
        }
        Ok(Self {
            epsilons: metrics.iter().map(|m| m.epsilon).collect(),
            rhos: metrics.iter().map(|m| m.rho).collect(),
            sigma,
            tau,
            renorm_epsilon: DEFAULT_RENORM_EPSILON,
        })
    }

    pub fn from_topology(topology: &Topology, sigma: f64, tau: f64) -> Result<Self, PhaseError> {
        Self::new(topology.metrics(), sigma, tau)
    }

    /// Override the convolution drift guard.
    pub fn with_renorm_epsilon(mut self, renorm_epsilon: f64) -> Self {
        self.renorm_epsilon = renorm_epsilon;
        self
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }
}

impl PhaseStrategy for Phase2 {
    fn num_paths(&self) -> usize {
        self.epsilons.len()
    }

    fn feasibility(&self, sav: &[u32]) -> Option<u32> {
        if sav.iter().all(|&n| n == 0) {
            return None;
        }
        let pmf_adversary = sum_pmf(sav, &self.epsilons, self.renorm_epsilon)
            .expect("path probabilities were validated at construction");
        let pmf_receiver = sum_pmf(sav, &self.rhos, self.renorm_epsilon)
            .expect("path probabilities were validated at construction");
        threshold_interval(&pmf_receiver, &pmf_adversary, self.sigma, self.tau)
            .map(|interval| interval.lo)
    }

    fn achieved(&self, sav: &[u32], t: u32) -> (f64, f64) {
        let pmf_adversary = sum_pmf(sav, &self.epsilons, self.renorm_epsilon)
            .expect("path probabilities were validated at construction");
        let pmf_receiver = sum_pmf(sav, &self.rhos, self.renorm_epsilon)
            .expect("path probabilities were validated at construction");
        (
            tail_ge(&pmf_receiver.probs, t as i64),
            tail_ge(&pmf_adversary.probs, t as i64),
        )
    }
}
