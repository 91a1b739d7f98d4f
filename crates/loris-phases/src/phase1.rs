//! Phase I: passive leakage only, `(k, k)` schemes.
//!
//! With no dropping, the receiver always reconstructs and the only
//! constraint is confidentiality: the adversary learns the secret iff it
//! observes every share, so feasibility is `∏ ε_j^{n_j} <= τ`, checked in
//! the log domain. Reliability `∏ ρ_j^{n_j}` is reported on each tuple but
//! never gated; a `(k, k)` scheme is maximally fragile by construction and
//! callers decide what fragility they accept.

use loris_topo::{AbortToken, PathMetrics, Topology};
use tracing::info;

use crate::strategy::{validate_targets, Enumeration, MinimalTuple, PhaseStrategy};
use crate::PhaseError;

#[derive(Debug, Clone)]
pub struct Phase1 {
    log_eps: Vec<f64>,
    rhos: Vec<f64>,
    log_tau: f64,
    /// Path indices ordered by decreasing `|log ε|`: the strongest leakage
    /// reducers first, so the recursion completes each branch as early as
    /// possible.
    order: Vec<usize>,
}

impl Phase1 {
    pub fn new(metrics: &[PathMetrics], sigma: f64, tau: f64) -> Result<Self, PhaseError> {
        validate_targets(sigma, tau)?;
        for m in metrics {
            for value in [m.epsilon, m.rho] {
                if !(0.0..=1.0).contains(&value) {
                    return Err(loris_prob::ProbError::InvalidProbability(value).into());
                }
            }
        }
        let log_eps: Vec<f64> = metrics
            .iter()
            .map(|m| if m.epsilon > 0.0 { m.epsilon.ln() } else { f64::NEG_INFINITY })
            .collect();
        let mut order: Vec<usize> = (0..metrics.len()).collect();
        order.sort_by(|&a, &b| {
            log_eps[b]
                .abs()
                .partial_cmp(&log_eps[a].abs())
                .expect("log-epsilons are never NaN")
        });
        Ok(Self {
            log_eps,
            rhos: metrics.iter().map(|m| m.rho).collect(),
            log_tau: tau.ln(),
            order,
        })
    }

    pub fn from_topology(topology: &Topology, sigma: f64, tau: f64) -> Result<Self, PhaseError> {
        Self::new(topology.metrics(), sigma, tau)
    }

    /// Accumulated log-leakage `Σ n_j · log ε_j`.
    fn log_leakage(&self, sav: &[u32]) -> f64 {
        sav.iter()
            .zip(&self.log_eps)
            .filter(|(&n, _)| n > 0)
            .map(|(&n, &le)| n as f64 * le)
            .sum()
    }

    /// Recursive search over the ordered paths.
    ///
    /// At each level the share count runs upward from zero; the first count
    /// closing the leakage bound is emitted as a candidate (any larger one
    /// cannot be minimal on this coordinate) and smaller counts recurse into
    /// the remaining paths. Candidates still pass the exact minimality
    /// filter at emission.
    fn search(
        &self,
        level: usize,
        log_acc: f64,
        used: u32,
        n_max: u32,
        prefix: &mut Vec<u32>,
        candidates: &mut Vec<Vec<u32>>,
        budget_exhausted: &mut bool,
    ) {
        if level == self.order.len() {
            return;
        }
        let le = self.log_eps[self.order[level]];
        let mut n = 0u32;
        loop {
            if used + n > n_max {
                // a completion on this branch would blow the share budget
                *budget_exhausted = true;
                break;
            }
            let log_here = if n > 0 { log_acc + n as f64 * le } else { log_acc };
            if log_here <= self.log_tau && used + n > 0 {
                prefix.push(n);
                let mut sav = vec![0u32; self.order.len()];
                for (slot, &count) in prefix.iter().enumerate() {
                    sav[self.order[slot]] = count;
                }
                candidates.push(sav);
                prefix.pop();
                break;
            }
            prefix.push(n);
            self.search(
                level + 1,
                log_here,
                used + n,
                n_max,
                prefix,
                candidates,
                budget_exhausted,
            );
            prefix.pop();
            if le == 0.0 {
                // epsilon = 1: more shares never reduce leakage
                break;
            }
            n += 1;
        }
    }
}

impl PhaseStrategy for Phase1 {
    fn num_paths(&self) -> usize {
        self.log_eps.len()
    }

    /// `(k, k)` feasibility: the threshold is always the total.
    fn feasibility(&self, sav: &[u32]) -> Option<u32> {
        let total: u32 = sav.iter().sum();
        if total == 0 {
            return None;
        }
        (self.log_leakage(sav) <= self.log_tau).then_some(total)
    }

    fn achieved(&self, sav: &[u32], _t: u32) -> (f64, f64) {
        let reliability = sav
            .iter()
            .zip(&self.rhos)
            .map(|(&n, &rho)| rho.powi(n as i32))
            .product();
        let log_leak = self.log_leakage(sav);
        let leakage = if log_leak == f64::NEG_INFINITY {
            0.0
        } else {
            log_leak.exp()
        };
        (reliability, leakage)
    }

    /// Recursive log-domain enumeration instead of the generic BFS; the
    /// feasibility predicate is cheap enough that the specialised search is
    /// purely an ordering optimisation, and the emitted set is identical.
    fn generate_minimal_tuples(
        &self,
        n_max: u32,
        abort: Option<&AbortToken>,
    ) -> Result<Enumeration, PhaseError> {
        if abort.is_some_and(AbortToken::is_aborted) {
            return Err(PhaseError::Aborted);
        }
        let mut candidates = Vec::new();
        let mut budget_exhausted = false;
        let mut prefix = Vec::with_capacity(self.order.len());
        self.search(
            0,
            0.0,
            0,
            n_max,
            &mut prefix,
            &mut candidates,
            &mut budget_exhausted,
        );

        let mut savs: Vec<Vec<u32>> = candidates
            .into_iter()
            .filter(|sav| self.is_minimal(sav))
            .collect();
        savs.sort();
        savs.dedup();

        if savs.is_empty() {
            return Err(PhaseError::InfeasibleParameters { n_max });
        }
        let tuples = savs
            .into_iter()
            .map(|sav| {
                let total: u32 = sav.iter().sum();
                let (reliability, leakage) = self.achieved(&sav, total);
                MinimalTuple {
                    sav,
                    threshold: total,
                    reliability,
                    leakage,
                }
            })
            .collect::<Vec<_>>();
        info!(
            tuples = tuples.len(),
            budget_exhausted, "phase I enumeration finished"
        );
        Ok(Enumeration {
            tuples,
            budget_exhausted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(eps: &[f64]) -> Vec<PathMetrics> {
        eps.iter()
            .map(|&epsilon| PathMetrics { epsilon, rho: 1.0 })
            .collect()
    }

    #[test]
    fn two_path_example_emits_exactly_the_minimal_set() {
        let strategy = Phase1::new(&metrics(&[0.5, 0.1]), 0.95, 0.01).unwrap();
        let result = strategy.generate_minimal_tuples(10, None).unwrap();
        let savs: Vec<Vec<u32>> = result.tuples.iter().map(|t| t.sav.clone()).collect();
        // 0.1^2 = 0.01 <= tau; 0.5^4 * 0.1 = 0.00625 <= tau; 0.5^7 = 0.0078 <= tau
        assert_eq!(savs, vec![vec![0, 2], vec![4, 1], vec![7, 0]]);
        for tuple in &result.tuples {
            assert_eq!(tuple.threshold, tuple.total(), "(k, k) scheme");
            assert!(tuple.leakage <= 0.01 + 1e-12);
        }
    }

    #[test]
    fn matches_the_generic_driver() {
        // the specialised recursion and the BFS driver must agree
        let strategy = Phase1::new(&metrics(&[0.5, 0.1]), 0.95, 0.01).unwrap();
        let specialised = strategy.generate_minimal_tuples(10, None).unwrap();
        let generic = crate::strategy::enumerate_minimal(&strategy, 10, None).unwrap();
        let a: Vec<&Vec<u32>> = specialised.tuples.iter().map(|t| &t.sav).collect();
        let mut b: Vec<&Vec<u32>> = generic.tuples.iter().map(|t| &t.sav).collect();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn reliability_is_reported_but_not_gated() {
        let lossy = [
            PathMetrics { epsilon: 0.1, rho: 0.2 },
            PathMetrics { epsilon: 0.1, rho: 0.3 },
        ];
        let strategy = Phase1::new(&lossy, 0.99, 0.02).unwrap();
        let result = strategy.generate_minimal_tuples(10, None).unwrap();
        // (1,1): 0.1 * 0.1 = 0.01 <= 0.02, minimal despite terrible reliability
        let tuple = result
            .tuples
            .iter()
            .find(|t| t.sav == vec![1, 1])
            .expect("(1,1) is minimal");
        assert!((tuple.reliability - 0.06).abs() < 1e-12);
        assert!(tuple.reliability < 0.99, "far below sigma, still emitted");
    }

    #[test]
    fn perfectly_private_path_needs_one_share() {
        let strategy = Phase1::new(&metrics(&[0.4, 0.0]), 0.9, 0.05).unwrap();
        let result = strategy.generate_minimal_tuples(10, None).unwrap();
        let savs: Vec<Vec<u32>> = result.tuples.iter().map(|t| t.sav.clone()).collect();
        assert!(savs.contains(&vec![0, 1]), "eps = 0 completes with one share");
        for tuple in &result.tuples {
            if tuple.sav == vec![0, 1] {
                assert_eq!(tuple.leakage, 0.0);
            }
        }
    }

    #[test]
    fn useless_paths_never_receive_shares() {
        let strategy = Phase1::new(&metrics(&[1.0, 0.1]), 0.9, 0.05).unwrap();
        let result = strategy.generate_minimal_tuples(10, None).unwrap();
        for tuple in &result.tuples {
            assert_eq!(tuple.sav[0], 0, "eps = 1 path must stay empty: {tuple}");
        }
    }

    #[test]
    fn infeasible_when_the_budget_is_too_small() {
        // needs 0.5^7 to reach 0.01 on a single path
        let strategy = Phase1::new(&metrics(&[0.5]), 0.9, 0.01).unwrap();
        let err = strategy.generate_minimal_tuples(3, None).unwrap_err();
        assert_eq!(err, PhaseError::InfeasibleParameters { n_max: 3 });
    }

    #[test]
    fn budget_flag_is_set_when_the_search_is_cut() {
        let strategy = Phase1::new(&metrics(&[0.5, 0.1]), 0.95, 0.01).unwrap();
        // (0,2) fits in a budget of 2 but the single-path branch is cut
        let result = strategy.generate_minimal_tuples(2, None).unwrap();
        let savs: Vec<Vec<u32>> = result.tuples.iter().map(|t| t.sav.clone()).collect();
        assert_eq!(savs, vec![vec![0, 2]]);
        assert!(result.budget_exhausted);
    }
}
