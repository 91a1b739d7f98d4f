//! Byte-level sharing: chunk a message into field elements and share each
//! chunk independently under the same `(N, t)`.
//!
//! The message is prefixed with its length as eight big-endian bytes, then
//! split into chunks of `⌊log₂ p / 8⌋` bytes (big-endian, the final chunk
//! zero-padded). Reconstruction reads the prefix back, so no out-of-band
//! length needs to travel with the shares.

use num::BigUint;

use crate::shamir::{Shamir, Share};
use crate::FieldError;

/// Share a byte string. Returns one share vector per chunk; reconstruction
/// needs at least `t` shares for every chunk index.
pub fn share_bytes(
    sss: &Shamir,
    data: &[u8],
    n: u32,
    t: u32,
) -> Result<Vec<Vec<Share>>, FieldError> {
    let chunk_size = sss.field().chunk_size();
    if chunk_size == 0 {
        return Err(FieldError::PrimeTooSmall);
    }

    let mut framed = Vec::with_capacity(8 + data.len());
    framed.extend_from_slice(&(data.len() as u64).to_be_bytes());
    framed.extend_from_slice(data);
    // pad to a whole number of chunks; the prefix says where the payload ends
    framed.resize(framed.len().div_ceil(chunk_size) * chunk_size, 0);

    framed
        .chunks(chunk_size)
        .map(|chunk| {
            // chunk < 2^(8*chunk_size) <= 2^(bits(p)-1) <= p, so no overflow
            let secret = BigUint::from_bytes_be(chunk);
            sss.share(&secret, n, t)
        })
        .collect()
}

/// Reconstruct a byte string from per-chunk share sets.
pub fn reconstruct_bytes(
    sss: &Shamir,
    chunks: &[Vec<Share>],
    t: u32,
) -> Result<Vec<u8>, FieldError> {
    let chunk_size = sss.field().chunk_size();
    if chunk_size == 0 {
        return Err(FieldError::PrimeTooSmall);
    }

    let mut framed = Vec::with_capacity(chunks.len() * chunk_size);
    for shares in chunks {
        let secret = sss.reconstruct(shares, t)?;
        let raw = secret.to_bytes_be();
        if raw.len() > chunk_size {
            // inconsistent shares interpolated past the chunk range
            return Err(FieldError::FieldOverflow);
        }
        // restore leading zeros lost in the integer representation
        framed.resize(framed.len() + chunk_size - raw.len(), 0);
        framed.extend_from_slice(&raw);
    }

    if framed.len() < 8 {
        return Err(FieldError::InsufficientShares {
            needed: 8usize.div_ceil(chunk_size),
            got: chunks.len(),
        });
    }
    let mut len_bytes = [0u8; 8];
    len_bytes.copy_from_slice(&framed[..8]);
    let total = u64::from_be_bytes(len_bytes) as usize;
    if framed.len() < 8 + total {
        return Err(FieldError::InsufficientShares {
            needed: (8 + total).div_ceil(chunk_size),
            got: chunks.len(),
        });
    }
    Ok(framed[8..8 + total].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::PrimeField;

    #[test]
    fn round_trip_default_prime() {
        let sss = Shamir::with_default_prime();
        let msg = b"the quick brown fox jumps over the lazy dog";
        let chunks = share_bytes(&sss, msg, 5, 3).unwrap();
        let back = reconstruct_bytes(&sss, &chunks, 3).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn round_trip_from_a_share_subset() {
        let sss = Shamir::with_default_prime();
        let msg = b"short";
        let chunks = share_bytes(&sss, msg, 7, 4).unwrap();
        let subset: Vec<Vec<Share>> = chunks
            .iter()
            .map(|c| vec![c[1].clone(), c[3].clone(), c[4].clone(), c[6].clone()])
            .collect();
        assert_eq!(reconstruct_bytes(&sss, &subset, 4).unwrap(), msg);
    }

    #[test]
    fn empty_message_round_trips() {
        let sss = Shamir::with_default_prime();
        let chunks = share_bytes(&sss, b"", 3, 2).unwrap();
        assert_eq!(reconstruct_bytes(&sss, &chunks, 2).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn leading_zero_bytes_survive() {
        let sss = Shamir::with_default_prime();
        let msg = [0u8, 0, 0, 7, 0, 0, 0];
        let chunks = share_bytes(&sss, &msg, 4, 2).unwrap();
        assert_eq!(reconstruct_bytes(&sss, &chunks, 2).unwrap(), msg);
    }

    #[test]
    fn one_byte_chunks_on_a_small_prime() {
        let sss = Shamir::new(PrimeField::new(num::BigUint::from(257u32)).unwrap());
        let msg = b"ab";
        let chunks = share_bytes(&sss, msg, 5, 3).unwrap();
        // 8 prefix bytes + 2 payload bytes, one byte per chunk
        assert_eq!(chunks.len(), 10);
        assert_eq!(reconstruct_bytes(&sss, &chunks, 3).unwrap(), msg);
    }

    #[test]
    fn tiny_prime_is_rejected() {
        let sss = Shamir::new(PrimeField::new(num::BigUint::from(251u32)).unwrap());
        assert_eq!(
            share_bytes(&sss, b"x", 3, 2).unwrap_err(),
            FieldError::PrimeTooSmall
        );
    }
}
