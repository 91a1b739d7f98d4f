//! PMFs of single binomials and of sums of independent non-identical
//! binomials, by direct convolution in double precision.

use tracing::warn;

use crate::ProbError;

/// Renormalisation guard: drift beyond this triggers a renormalising pass.
pub const DEFAULT_RENORM_EPSILON: f64 = 1e-12;

/// A probability mass function over `0..=n`.
///
/// `probs[k] = Pr[X = k]`. `renormalized` records whether convolution drift
/// exceeded the guard and a renormalising pass was applied; callers treat it
/// as a numerical warning, not a failure.
#[derive(Debug, Clone, PartialEq)]
pub struct Pmf {
    pub probs: Vec<f64>,
    pub renormalized: bool,
}

impl Pmf {
    /// The distribution of the constant zero.
    pub fn unit() -> Self {
        Self {
            probs: vec![1.0],
            renormalized: false,
        }
    }

    /// Largest value in the support.
    pub fn max_value(&self) -> usize {
        self.probs.len() - 1
    }
}

/// PMF of `Binomial(n, q)` by the stable multiplicative recurrence
/// `b_{k+1} = b_k * (n-k)/(k+1) * q/(1-q)`.
///
/// The degenerate cases `q = 0` and `q = 1` are handled explicitly; the
/// recurrence would divide by zero on the latter.
pub fn binomial_pmf(n: u32, q: f64) -> Result<Vec<f64>, ProbError> {
    if !(0.0..=1.0).contains(&q) {
        return Err(ProbError::InvalidProbability(q));
    }
    let n = n as usize;
    if q == 0.0 {
        let mut pmf = vec![0.0; n + 1];
        pmf[0] = 1.0;
        return Ok(pmf);
    }
    if q == 1.0 {
        let mut pmf = vec![0.0; n + 1];
        pmf[n] = 1.0;
        return Ok(pmf);
    }

    let mut pmf = Vec::with_capacity(n + 1);
    pmf.push((1.0 - q).powi(n as i32));
    let ratio = q / (1.0 - q);
    for k in 0..n {
        let next = pmf[k] * ((n - k) as f64) / ((k + 1) as f64) * ratio;
        pmf.push(next);
    }
    Ok(pmf)
}

/// PMF of `X = Σ_j Y_j` with `Y_j ~ Binomial(n_j, q_j)` independent.
///
/// Convolves one binomial at a time (`O(N²)` total). After each convolution
/// the mass is checked against 1; if the drift exceeds `renorm_epsilon` the
/// array is renormalised and the result flagged.
pub fn sum_pmf(counts: &[u32], probs: &[f64], renorm_epsilon: f64) -> Result<Pmf, ProbError> {
    if counts.len() != probs.len() {
        return Err(ProbError::LengthMismatch {
            counts: counts.len(),
            probs: probs.len(),
        });
    }

    let mut acc = vec![1.0f64];
    let mut renormalized = false;
    for (&n_j, &q_j) in counts.iter().zip(probs) {
        if n_j == 0 {
            continue;
        }
        let part = binomial_pmf(n_j, q_j)?;
        let mut next = vec![0.0f64; acc.len() + n_j as usize];
        for (i, &a) in acc.iter().enumerate() {
            if a == 0.0 {
                continue;
            }
            for (k, &b) in part.iter().enumerate() {
                next[i + k] += a * b;
            }
        }
        let mass: f64 = next.iter().sum();
        if (mass - 1.0).abs() > renorm_epsilon {
            warn!(drift = mass - 1.0, "convolution drift exceeded guard; renormalising");
            for v in &mut next {
                *v /= mass;
            }
            renormalized = true;
        }
        acc = next;
    }

    Ok(Pmf {
        probs: acc,
        renormalized,
    })
}
