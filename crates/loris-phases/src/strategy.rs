//! The strategy capability and the shared breadth-first enumeration driver.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::Serialize;
use tracing::info;

use loris_topo::AbortToken;

use crate::PhaseError;

/// One emitted minimal allocation with its achieved guarantees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinimalTuple {
    /// Shares per path.
    pub sav: Vec<u32>,
    /// Reconstruction threshold `t`.
    pub threshold: u32,
    /// Achieved reliability `Pr[X_B >= t]`.
    pub reliability: f64,
    /// Achieved leakage `Pr[X_E >= t]`.
    pub leakage: f64,
}

impl MinimalTuple {
    /// Total number of shares `N = Σ n_j`.
    pub fn total(&self) -> u32 {
        self.sav.iter().sum()
    }
}

impl fmt::Display for MinimalTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={:?} t={} N={} sigma={:.6} tau={:.6}",
            self.sav,
            self.threshold,
            self.total(),
            self.reliability,
            self.leakage
        )
    }
}

/// The result of an enumeration run.
#[derive(Debug, Clone, Serialize)]
pub struct Enumeration {
    /// Minimal tuples, ordered by total `N` and then lexicographically.
    pub tuples: Vec<MinimalTuple>,
    /// True when the share budget cut the search off while candidate
    /// vectors were still being expanded; larger budgets may yield more
    /// tuples. Informational, not an error.
    pub budget_exhausted: bool,
}

/// A phase-specific allocation strategy.
///
/// `feasibility` is the phase's whole security model: it maps an allocation
/// to its canonical threshold, or `None`. Everything else (minimality, the
/// search itself) is shared machinery over that predicate, which must be
/// monotone: adding shares never turns a feasible allocation infeasible.
pub trait PhaseStrategy {
    fn num_paths(&self) -> usize;

    /// Canonical threshold for `sav`, or `None` when the allocation cannot
    /// meet the targets.
    fn feasibility(&self, sav: &[u32]) -> Option<u32>;

    /// Achieved `(reliability, leakage)` for an allocation at threshold `t`.
    fn achieved(&self, sav: &[u32], t: u32) -> (f64, f64);

    /// Successor allocations explored from an infeasible `sav`.
    fn neighbours(&self, sav: &[u32]) -> Vec<Vec<u32>> {
        (0..sav.len())
            .map(|j| {
                let mut next = sav.to_vec();
                next[j] += 1;
                next
            })
            .collect()
    }

    /// A feasible allocation is minimal when every single-coordinate
    /// decrement is infeasible.
    fn is_minimal(&self, sav: &[u32]) -> bool {
        for j in 0..sav.len() {
            if sav[j] > 0 {
                let mut dec = sav.to_vec();
                dec[j] -= 1;
                if self.feasibility(&dec).is_some() {
                    return false;
                }
            }
        }
        true
    }

    /// Enumerate all minimal tuples with total at most `n_max`.
    fn generate_minimal_tuples(
        &self,
        n_max: u32,
        abort: Option<&AbortToken>,
    ) -> Result<Enumeration, PhaseError> {
        enumerate_minimal(self, n_max, abort)
    }
}

/// Breadth-first driver over total share count.
///
/// Level `N` holds the vectors of total `N`; each level is generated from
/// the infeasible vectors of the previous one by single-coordinate
/// increments, deduplicated globally. Feasible vectors are emitted (after a
/// minimality re-check) and not expanded: a strict super-vector of a
/// feasible vector can never be minimal.
pub fn enumerate_minimal<S: PhaseStrategy + ?Sized>(
    strategy: &S,
    n_max: u32,
    abort: Option<&AbortToken>,
) -> Result<Enumeration, PhaseError> {
    let m = strategy.num_paths();
    let mut visited: HashSet<Vec<u32>> = HashSet::new();
    let mut frontier: BTreeSet<Vec<u32>> = BTreeSet::new();
    for j in 0..m {
        let mut unit = vec![0u32; m];
        unit[j] = 1;
        visited.insert(unit.clone());
        frontier.insert(unit);
    }

    let mut tuples = Vec::new();
    let mut budget_exhausted = false;
    for level in 1..=n_max {
        if abort.is_some_and(AbortToken::is_aborted) {
            return Err(PhaseError::Aborted);
        }
        let mut next = BTreeSet::new();
        for sav in &frontier {
            match strategy.feasibility(sav) {
                Some(t) => {
                    if strategy.is_minimal(sav) {
                        let (reliability, leakage) = strategy.achieved(sav, t);
                        tuples.push(MinimalTuple {
                            sav: sav.clone(),
                            threshold: t,
                            reliability,
                            leakage,
                        });
                    }
                }
                None if level < n_max => {
                    for succ in strategy.neighbours(sav) {
                        if visited.insert(succ.clone()) {
                            next.insert(succ);
                        }
                    }
                }
                None => budget_exhausted = true,
            }
        }
        frontier = next;
    }

    if tuples.is_empty() {
        return Err(PhaseError::InfeasibleParameters { n_max });
    }
    info!(
        tuples = tuples.len(),
        budget_exhausted, "minimal SAV enumeration finished"
    );
    Ok(Enumeration {
        tuples,
        budget_exhausted,
    })
}

/// Shared validation of the `(σ, τ)` targets.
pub(crate) fn validate_targets(sigma: f64, tau: f64) -> Result<(), PhaseError> {
    if !(sigma > 0.0 && sigma <= 1.0) {
        return Err(PhaseError::InvalidTarget {
            name: "sigma",
            range: "(0, 1]",
            value: sigma,
        });
    }
    if !(tau > 0.0 && tau < 1.0) {
        return Err(PhaseError::InvalidTarget {
            name: "tau",
            range: "(0, 1)",
            value: tau,
        });
    }
    Ok(())
}
