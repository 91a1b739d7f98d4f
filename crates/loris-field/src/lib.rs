//! Prime-field arithmetic and Shamir `(N, t)` threshold secret sharing.
//!
//! Field elements live in GF(p) for a configurable prime `p` (default: the
//! Mersenne prime 2^127 − 1, so elements exceed `u64` and are carried as
//! `BigUint`). Shares are points `(i, f(i))` on a random polynomial with the
//! secret as constant term; any `t` shares reconstruct via Lagrange
//! interpolation at zero, fewer reveal nothing.

pub mod bytes;
pub mod field;
pub mod shamir;

pub use bytes::{reconstruct_bytes, share_bytes};
pub use field::PrimeField;
pub use shamir::{Shamir, Share};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("modulus {0} is not prime")]
    CompositeModulus(String),
    #[error("modulus must be at least 2")]
    ModulusTooSmall,
    #[error("need 1 <= t <= n < p, got t={t}, n={n}")]
    InvalidThreshold { t: u32, n: u32 },
    #[error("value does not fit in the field (chunk or secret >= p)")]
    FieldOverflow,
    #[error("reconstruction needs {needed} shares, got {got}")]
    InsufficientShares { needed: usize, got: usize },
    #[error("duplicate evaluation point x={0}")]
    DuplicateIndex(u32),
    #[error("prime too small for byte-level sharing")]
    PrimeTooSmall,
}
