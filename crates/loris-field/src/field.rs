//! The prime field GF(p): validated modulus, modular inverses, sampling.

use num::bigint::{BigInt, Sign};
use num::{BigUint, Integer, One, Zero};
use rand::RngCore;

use crate::FieldError;

/// A prime modulus together with the arithmetic helpers the sharing scheme
/// needs. Construction validates primality, so every nonzero element is
/// invertible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimeField {
    modulus: BigUint,
}

impl PrimeField {
    /// Construct a field from a probable-prime modulus.
    ///
    /// Primality is checked with Miller–Rabin over the first twelve prime
    /// bases, which is exact for moduli below 3.3·10^24 and leaves a
    /// negligible error probability above.
    pub fn new(modulus: BigUint) -> Result<Self, FieldError> {
        if modulus < BigUint::from(2u32) {
            return Err(FieldError::ModulusTooSmall);
        }
        if !is_probable_prime(&modulus) {
            return Err(FieldError::CompositeModulus(modulus.to_string()));
        }
        Ok(Self { modulus })
    }

    /// The default field: the Mersenne prime 2^127 − 1.
    pub fn mersenne127() -> Self {
        let p = (BigUint::one() << 127u32) - BigUint::one();
        Self { modulus: p }
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Bit length of the modulus.
    pub fn bits(&self) -> u64 {
        self.modulus.bits()
    }

    /// How many whole message bytes fit in one field element: ⌊log₂ p / 8⌋.
    pub fn chunk_size(&self) -> usize {
        ((self.modulus.bits() - 1) / 8) as usize
    }

    /// True iff `value` is a canonical field element, i.e. `value < p`.
    pub fn contains(&self, value: &BigUint) -> bool {
        value < &self.modulus
    }

    pub fn add(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a + b) % &self.modulus
    }

    pub fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.modulus
    }

    /// Additive inverse: `p − a` for nonzero `a`.
    pub fn neg(&self, a: &BigUint) -> BigUint {
        if a.is_zero() {
            BigUint::zero()
        } else {
            &self.modulus - a
        }
    }

    /// `a − b (mod p)`.
    pub fn sub(&self, a: &BigUint, b: &BigUint) -> BigUint {
        if a >= b {
            a - b
        } else {
            &self.modulus - b + a
        }
    }

    /// Multiplicative inverse via the extended Euclidean algorithm.
    ///
    /// Returns `None` for the zero element. The modulus is prime, so every
    /// other element is invertible.
    pub fn inverse(&self, a: &BigUint) -> Option<BigUint> {
        if a.is_zero() {
            return None;
        }
        let a = BigInt::from_biguint(Sign::Plus, a.clone());
        let p = BigInt::from_biguint(Sign::Plus, self.modulus.clone());

        // Extended Euclid: maintain old_r = old_s * a (mod p).
        let (mut old_r, mut r) = (a, p.clone());
        let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
        while !r.is_zero() {
            let q = &old_r / &r;
            let next_r = &old_r - &q * &r;
            old_r = std::mem::replace(&mut r, next_r);
            let next_s = &old_s - &q * &s;
            old_s = std::mem::replace(&mut s, next_s);
        }
        // gcd(a, p) = 1 since p is prime and a != 0 (mod p).
        let inv = old_s.mod_floor(&p);
        let (_, mag) = inv.into_parts();
        Some(mag)
    }

    /// Sample a uniform element of `[0, p)` by rejection.
    pub fn sample(&self, rng: &mut impl RngCore) -> BigUint {
        let nbits = self.modulus.bits();
        let nbytes = nbits.div_ceil(8) as usize;
        let excess = (nbytes as u64 * 8 - nbits) as u32;
        let mut buf = vec![0u8; nbytes];
        loop {
            rng.fill_bytes(&mut buf);
            buf[0] &= 0xffu8 >> excess;
            let v = BigUint::from_bytes_be(&buf);
            if v < self.modulus {
                return v;
            }
        }
    }
}

/// Miller–Rabin with the first twelve prime bases.
fn is_probable_prime(n: &BigUint) -> bool {
    let two = BigUint::from(2u32);
    if n < &two {
        return false;
    }
    const BASES: [u32; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];
    for b in BASES {
        if n == &BigUint::from(b) {
            return true;
        }
    }
    if n.is_even() {
        return false;
    }

    // n - 1 = d * 2^r with d odd
    let n_minus_one = n - BigUint::one();
    let r = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> r;

    'witness: for b in BASES {
        let a = BigUint::from(b) % n;
        if a.is_zero() {
            continue;
        }
        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..r {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}
