//! Tail probabilities and the feasible-threshold interval search.

use crate::binomial::Pmf;

/// `Pr[X >= t]`, summed from the high end so the small tail terms
/// accumulate before the large ones.
pub fn tail_ge(pmf: &[f64], t: i64) -> f64 {
    if t <= 0 {
        return 1.0;
    }
    let n = pmf.len() as i64 - 1;
    if t > n {
        return 0.0;
    }
    let mut acc = 0.0f64;
    for k in (t as usize..pmf.len()).rev() {
        acc += pmf[k];
    }
    acc
}

/// `Pr[X < t]`. Summed directly from the low end while the low tail is the
/// short side; otherwise via the complement of [`tail_ge`].
pub fn tail_lt(pmf: &[f64], t: i64) -> f64 {
    if t <= 0 {
        return 0.0;
    }
    let n = pmf.len() as i64 - 1;
    if t > n {
        return 1.0;
    }
    if 2 * t <= n {
        let mut acc = 0.0f64;
        for k in (0..t as usize).rev() {
            acc += pmf[k];
        }
        acc
    } else {
        1.0 - tail_ge(pmf, t)
    }
}

/// `ln Pr[X >= t]` by log-sum-exp over the tail.
///
/// For supports far beyond what double-precision convolution keeps accurate
/// this loses less of the extreme tail than the linear sum.
pub fn tail_ge_log(pmf: &[f64], t: i64) -> f64 {
    if t <= 0 {
        return 0.0;
    }
    let n = pmf.len() as i64 - 1;
    if t > n {
        return f64::NEG_INFINITY;
    }
    let logs: Vec<f64> = pmf[t as usize..]
        .iter()
        .filter(|&&p| p > 0.0)
        .map(|&p| p.ln())
        .collect();
    match logs.iter().cloned().fold(f64::NEG_INFINITY, f64::max) {
        m if m == f64::NEG_INFINITY => f64::NEG_INFINITY,
        m => m + logs.iter().map(|&l| (l - m).exp()).sum::<f64>().ln(),
    }
}

/// The integer interval of thresholds satisfying both targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdInterval {
    /// Smallest `t` with `Pr[X_E >= t] <= tau`.
    pub lo: u32,
    /// Largest `t` with `Pr[X_B >= t] >= sigma`.
    pub hi: u32,
}

/// Search `T(n) = { t : Pr[X_B >= t] >= sigma  and  Pr[X_E >= t] <= tau }`.
///
/// Both tails are monotone non-increasing in `t`, so the confidentiality
/// constraint holds on a suffix `[t_lo, N]` and the reliability constraint
/// on a prefix `[1, t_hi]`; each endpoint is found by binary search and the
/// answer is their intersection, or `None` when it is empty.
pub fn threshold_interval(
    pmf_receiver: &Pmf,
    pmf_adversary: &Pmf,
    sigma: f64,
    tau: f64,
) -> Option<ThresholdInterval> {
    let n = pmf_receiver.max_value().min(pmf_adversary.max_value()) as i64;
    if n < 1 {
        return None;
    }

    // leftmost t in [1, n] with tail_E(t) <= tau
    let t_lo = {
        let (mut lo, mut hi) = (1i64, n);
        let mut found = None;
        while lo <= hi {
            let mid = lo + (hi - lo) / 2;
            if tail_ge(&pmf_adversary.probs, mid) <= tau {
                found = Some(mid);
                hi = mid - 1;
            } else {
                lo = mid + 1;
            }
        }
        found?
    };

    // rightmost t in [1, n] with tail_B(t) >= sigma
    let t_hi = {
        let (mut lo, mut hi) = (1i64, n);
        let mut found = None;
        while lo <= hi {
            let mid = lo + (hi - lo) / 2;
            if tail_ge(&pmf_receiver.probs, mid) >= sigma {
                found = Some(mid);
                lo = mid + 1;
            } else {
                hi = mid - 1;
            }
        }
        found?
    };

    if t_lo <= t_hi {
        Some(ThresholdInterval {
            lo: t_lo as u32,
            hi: t_hi as u32,
        })
    } else {
        None
    }
}
