//! Shamir `(N, t)` threshold sharing over GF(p).

use num::{BigUint, One, Zero};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::field::PrimeField;
use crate::FieldError;

/// A single share: the evaluation point `x` and `y = f(x) mod p`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
    pub x: u32,
    pub y: BigUint,
}

/// The sharing scheme bound to a field.
#[derive(Debug, Clone)]
pub struct Shamir {
    field: PrimeField,
}

impl Shamir {
    pub fn new(field: PrimeField) -> Self {
        Self { field }
    }

    /// Scheme over the default Mersenne-127 field.
    pub fn with_default_prime() -> Self {
        Self::new(PrimeField::mersenne127())
    }

    pub fn field(&self) -> &PrimeField {
        &self.field
    }

    /// Split `secret` into `n` shares with reconstruction threshold `t`,
    /// drawing polynomial coefficients from the OS entropy source.
    ///
    /// Requires `0 <= secret < p` and `1 <= t <= n < p`.
    pub fn share(&self, secret: &BigUint, n: u32, t: u32) -> Result<Vec<Share>, FieldError> {
        self.share_with_rng(secret, n, t, &mut OsRng)
    }

    /// As [`share`](Self::share), with an explicit cryptographic RNG.
    ///
    /// The `CryptoRng` bound is deliberate: coefficient sampling must not be
    /// driven by the deterministic simulation PRNG.
    pub fn share_with_rng<R: RngCore + CryptoRng>(
        &self,
        secret: &BigUint,
        n: u32,
        t: u32,
        rng: &mut R,
    ) -> Result<Vec<Share>, FieldError> {
        if t < 1 || t > n || !self.field.contains(&BigUint::from(n)) {
            return Err(FieldError::InvalidThreshold { t, n });
        }
        if !self.field.contains(secret) {
            return Err(FieldError::FieldOverflow);
        }

        // f(x) = s + a_1 x + ... + a_{t-1} x^{t-1}, coefficients uniform
        let mut coeffs = Vec::with_capacity(t as usize);
        coeffs.push(secret.clone());
        for _ in 1..t {
            coeffs.push(self.field.sample(rng));
        }

        Ok((1..=n)
            .map(|x| Share {
                x,
                y: self.eval(&coeffs, x),
            })
            .collect())
    }

    /// Horner evaluation of the polynomial at `x`.
    fn eval(&self, coeffs: &[BigUint], x: u32) -> BigUint {
        let x = BigUint::from(x);
        let mut acc = BigUint::zero();
        for c in coeffs.iter().rev() {
            acc = self.field.add(&self.field.mul(&acc, &x), c);
        }
        acc
    }

    /// Reconstruct the secret from at least `threshold` distinct shares by
    /// Lagrange interpolation at `x = 0`.
    ///
    /// All supplied shares participate; points beyond the threshold lie on
    /// the same polynomial and do not change the result.
    pub fn reconstruct(&self, shares: &[Share], threshold: u32) -> Result<BigUint, FieldError> {
        if shares.len() < threshold as usize || shares.is_empty() {
            return Err(FieldError::InsufficientShares {
                needed: threshold as usize,
                got: shares.len(),
            });
        }
        for (i, s) in shares.iter().enumerate() {
            if shares[..i].iter().any(|other| other.x == s.x) {
                return Err(FieldError::DuplicateIndex(s.x));
            }
        }

        // L_i(0) = prod_{j != i} (-x_j) / (x_i - x_j); secret = sum y_i L_i(0)
        let mut secret = BigUint::zero();
        for (i, si) in shares.iter().enumerate() {
            let xi = BigUint::from(si.x);
            let mut num = BigUint::one();
            let mut den = BigUint::one();
            for (j, sj) in shares.iter().enumerate() {
                if i == j {
                    continue;
                }
                let xj = BigUint::from(sj.x);
                num = self.field.mul(&num, &self.field.neg(&xj));
                den = self.field.mul(&den, &self.field.sub(&xi, &xj));
            }
            // den != 0: the x_i are distinct and below p
            let den_inv = self
                .field
                .inverse(&den)
                .expect("distinct points give nonzero denominator");
            let basis = self.field.mul(&num, &den_inv);
            secret = self.field.add(&secret, &self.field.mul(&si.y, &basis));
        }
        Ok(secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field257() -> Shamir {
        Shamir::new(PrimeField::new(BigUint::from(257u32)).unwrap())
    }

    #[test]
    fn any_t_subset_reconstructs() {
        let sss = field257();
        let secret = BigUint::from(123u32);
        let shares = sss.share(&secret, 5, 3).unwrap();
        assert_eq!(shares.len(), 5);

        // every 3-subset of 5 shares
        for a in 0..5 {
            for b in (a + 1)..5 {
                for c in (b + 1)..5 {
                    let subset = vec![shares[a].clone(), shares[b].clone(), shares[c].clone()];
                    assert_eq!(sss.reconstruct(&subset, 3).unwrap(), secret);
                }
            }
        }
    }

    #[test]
    fn extra_shares_do_not_change_the_result() {
        let sss = field257();
        let secret = BigUint::from(200u32);
        let shares = sss.share(&secret, 6, 2).unwrap();
        assert_eq!(sss.reconstruct(&shares, 2).unwrap(), secret);
    }

    #[test]
    fn threshold_one_is_a_constant_polynomial() {
        let sss = field257();
        let secret = BigUint::from(42u32);
        let shares = sss.share(&secret, 3, 1).unwrap();
        for s in &shares {
            assert_eq!(s.y, secret);
        }
    }

    #[test]
    fn zero_secret_round_trips() {
        let sss = field257();
        let shares = sss.share(&BigUint::zero(), 4, 4).unwrap();
        assert_eq!(sss.reconstruct(&shares, 4).unwrap(), BigUint::zero());
    }

    #[test]
    fn rejects_bad_parameters() {
        let sss = field257();
        let s = BigUint::from(1u32);
        assert_eq!(
            sss.share(&s, 3, 0).unwrap_err(),
            FieldError::InvalidThreshold { t: 0, n: 3 }
        );
        assert_eq!(
            sss.share(&s, 3, 4).unwrap_err(),
            FieldError::InvalidThreshold { t: 4, n: 3 }
        );
        assert_eq!(
            sss.share(&BigUint::from(257u32), 3, 2).unwrap_err(),
            FieldError::FieldOverflow
        );
    }

    #[test]
    fn rejects_duplicate_and_insufficient_shares() {
        let sss = field257();
        let secret = BigUint::from(9u32);
        let shares = sss.share(&secret, 4, 3).unwrap();

        let err = sss.reconstruct(&shares[..2], 3).unwrap_err();
        assert_eq!(err, FieldError::InsufficientShares { needed: 3, got: 2 });

        let dup = vec![shares[0].clone(), shares[1].clone(), shares[0].clone()];
        assert_eq!(
            sss.reconstruct(&dup, 3).unwrap_err(),
            FieldError::DuplicateIndex(shares[0].x)
        );
    }

    #[test]
    fn share_count_must_stay_below_the_modulus() {
        let sss = Shamir::new(PrimeField::new(BigUint::from(5u32)).unwrap());
        let s = BigUint::from(2u32);
        assert!(sss.share(&s, 4, 2).is_ok());
        assert!(matches!(
            sss.share(&s, 5, 2),
            Err(FieldError::InvalidThreshold { .. })
        ));
    }
}
