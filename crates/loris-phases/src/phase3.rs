//! Phase III: robustness against tampering adversaries.
//!
//! Interface slot only. The strategy covers adversaries that corrupt share
//! payloads in transit rather than merely observing or dropping them, which
//! needs an error-correcting decoding layer on top of the threshold scheme.
//! The type exists so callers can select the phase and configure targets;
//! every operation reports [`PhaseError::Unsupported`] until the decoding
//! strategy lands.

use loris_topo::{AbortToken, PathMetrics, Topology};

use crate::strategy::{validate_targets, Enumeration};
use crate::PhaseError;

#[derive(Debug, Clone)]
pub struct Phase3 {
    _metrics: Vec<PathMetrics>,
    _sigma: f64,
    _tau: f64,
}

impl Phase3 {
    pub fn new(metrics: &[PathMetrics], sigma: f64, tau: f64) -> Result<Self, PhaseError> {
        validate_targets(sigma, tau)?;
        Ok(Self {
            _metrics: metrics.to_vec(),
            _sigma: sigma,
            _tau: tau,
        })
    }

    pub fn from_topology(topology: &Topology, sigma: f64, tau: f64) -> Result<Self, PhaseError> {
        Self::new(topology.metrics(), sigma, tau)
    }

    pub fn feasibility(&self, _sav: &[u32]) -> Result<Option<u32>, PhaseError> {
        Err(PhaseError::Unsupported("phase III feasibility"))
    }

    pub fn generate_minimal_tuples(
        &self,
        _n_max: u32,
        _abort: Option<&AbortToken>,
    ) -> Result<Enumeration, PhaseError> {
        Err(PhaseError::Unsupported("phase III enumeration"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructs_but_refuses_to_run() {
        let metrics = [PathMetrics { epsilon: 0.1, rho: 0.9 }];
        let strategy = Phase3::new(&metrics, 0.9, 0.1).unwrap();
        assert!(matches!(
            strategy.feasibility(&[1]),
            Err(PhaseError::Unsupported(_))
        ));
        assert!(matches!(
            strategy.generate_minimal_tuples(10, None),
            Err(PhaseError::Unsupported(_))
        ));
    }

    #[test]
    fn still_validates_targets() {
        let metrics = [PathMetrics { epsilon: 0.1, rho: 0.9 }];
        assert!(Phase3::new(&metrics, 2.0, 0.1).is_err());
    }
}
