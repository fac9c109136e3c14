// SPDX-License-Identifier: Apache-2.0

//! Iterated SHA-256 expansion of a seed into a fixed-length bit string, rejection-sampled until a
//! prime is found. Used by the aggregate Fiat-Shamir transform (`hash_prime`/`hash_prime_fast`)
//! and, with a different sprout-advance rule, by [`crate::hash_to_group`].

use crate::primality::is_probable_prime;
use aggvdf_primitives::{AggVdfError, AggVdfResult};
use num_bigint::BigUint;
use sha2::{Digest, Sha256};

/// Advance `sprout` as a standard big-endian counter: increment the last byte; on overflow, carry
/// into the preceding byte; stop as soon as a byte does *not* overflow. Used by [`hash_prime`] and
/// [`hash_prime_fast`].
pub(crate) fn advance_sprout_carrying(sprout: &mut [u8]) {
    for byte in sprout.iter_mut().rev() {
        *byte = byte.wrapping_add(1);
        if *byte != 0 {
            break;
        }
    }
}

/// Advance `sprout` with the carry-*truncating* rule used only by `H_G`/`H_G_fast`: increment the
/// last byte; if it overflows to zero, stop immediately without touching the preceding byte (the
/// carry is dropped rather than propagated); if it does not overflow, continue incrementing the
/// preceding byte as well. This is the mirror image of [`advance_sprout_carrying`]; the two call
/// sites are deliberately kept as separate named helpers rather than one function parameterized by
/// a flag, so the distinction stays visible at each use.
pub(crate) fn advance_sprout_truncating(sprout: &mut [u8]) {
    for byte in sprout.iter_mut().rev() {
        *byte = byte.wrapping_add(1);
        if *byte == 0 {
            break;
        }
    }
}

fn force_bits_in_place(candidate: &mut BigUint, force_bits: &[usize]) {
    for &bit in force_bits {
        candidate.set_bit(bit as u64, true);
    }
    candidate.set_bit(0, true);
}

fn next_candidate(sprout: &mut Vec<u8>, l_bits: usize, force_bits: &[usize]) -> BigUint {
    let byte_len = l_bits / 8;
    let mut blob = Vec::with_capacity(byte_len + Sha256::output_size());
    while blob.len() * 8 < l_bits {
        advance_sprout_carrying(sprout);
        blob.extend_from_slice(&Sha256::digest(sprout.as_slice()));
    }
    blob.truncate(byte_len);

    let mut candidate = BigUint::from_bytes_be(&blob);
    force_bits_in_place(&mut candidate, force_bits);
    candidate
}

/// Rejection-sample an `l_bits`-bit prime from `seed`, forcing the bit positions in `force_bits`
/// (and always bit 0) to one. `l_bits` must be a multiple of 8. Returns the prime together with
/// its 1-based acceptance index.
pub fn hash_prime(seed: &[u8], l_bits: usize, force_bits: &[usize]) -> (BigUint, u64) {
    assert_eq!(l_bits % 8, 0, "l_bits must be a whole number of bytes");

    let mut sprout = seed.to_vec();
    let mut k: u64 = 0;

    loop {
        let candidate = next_candidate(&mut sprout, l_bits, force_bits);
        k += 1;
        if is_probable_prime(&candidate) {
            return (candidate, k);
        }
    }
}

/// Returns the first prime with acceptance index `>= skip`, without re-testing the primality of
/// any earlier candidate. The sprout is still advanced for every intervening candidate — only the
/// primality tests below index `skip` are skipped — and the search continues past `skip` for as
/// long as it takes to find a prime, exactly as [`hash_prime`] itself would from that point on.
pub fn hash_prime_fast(
    seed: &[u8],
    l_bits: usize,
    force_bits: &[usize],
    skip: u64,
) -> AggVdfResult<BigUint> {
    assert_eq!(l_bits % 8, 0, "l_bits must be a whole number of bytes");
    if skip == 0 {
        return Err(AggVdfError::InvalidInput);
    }

    let mut sprout = seed.to_vec();
    let mut k: u64 = 0;

    loop {
        let candidate = next_candidate(&mut sprout, l_bits, force_bits);
        k += 1;
        if k >= skip && is_probable_prime(&candidate) {
            return Ok(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_prime_finds_a_prime() {
        let (p, _k) = hash_prime(b"aggvdf-test-seed", 256, &[0, 1]);
        assert!(is_probable_prime(&p));
    }

    #[test]
    fn hash_prime_fast_replays_the_same_candidate() {
        let (p, k) = hash_prime(b"aggvdf-test-seed-2", 264, &[263]);
        let replayed = hash_prime_fast(b"aggvdf-test-seed-2", 264, &[263], k).unwrap();
        assert_eq!(p, replayed);
    }

    #[test]
    fn hash_prime_fast_skips_forward_past_a_non_prime_index() {
        let (p, k) = hash_prime(b"aggvdf-test-seed-3", 264, &[263]);

        // A skip at or before the true acceptance index must still land on the same prime.
        for probe in 1..=k {
            assert_eq!(
                hash_prime_fast(b"aggvdf-test-seed-3", 264, &[263], probe).unwrap(),
                p
            );
        }

        // A skip past the true acceptance index must not error: it returns the next prime at or
        // after that index instead of failing on a non-prime candidate.
        let shifted = hash_prime_fast(b"aggvdf-test-seed-3", 264, &[263], k + 1).unwrap();
        assert!(is_probable_prime(&shifted));
    }

    #[test]
    fn carrying_and_truncating_sprouts_diverge_on_overflow() {
        let mut carrying = vec![0x00, 0xFF];
        advance_sprout_carrying(&mut carrying);
        assert_eq!(carrying, vec![0x01, 0x00]);

        let mut truncating = vec![0x00, 0xFF];
        advance_sprout_truncating(&mut truncating);
        assert_eq!(truncating, vec![0x00, 0x00]);
    }
}
