// SPDX-License-Identifier: Apache-2.0

//! Deterministic discriminant derivation from a seed. Not used internally by the
//! evaluator/prover/verifier (which all take `D` as a caller-supplied input) but exposed for
//! callers that need to produce one.

use crate::class_group::Discriminant;
use crate::hash_prime::hash_prime;
use aggvdf_primitives::{AggVdfError, AggVdfResult};
use num_bigint::BigInt;

/// Derive a valid discriminant of `size_in_bits` bits deterministically from `seed`, by forcing
/// the underlying prime to be `7 mod 8` (so the negated discriminant is `1 mod 8`, hence `1 mod
/// 4`) and rejection-sampling with the same [`hash_prime`] primitive used for the Fiat-Shamir
/// challenge. Returns the acceptance index alongside, mirroring `a_iter`/`b_iter`.
pub fn create_discriminant(seed: &[u8], size_in_bits: usize) -> AggVdfResult<(Discriminant, u64)> {
    if size_in_bits == 0 || size_in_bits % 8 != 0 {
        return Err(AggVdfError::InvalidInput);
    }

    let force_bits = [0, 1, 2, size_in_bits - 1];
    let (prime, iterations) = hash_prime(seed, size_in_bits, &force_bits);
    let value = -BigInt::from(prime);
    let discriminant = Discriminant::try_from(value)?;

    Ok((discriminant, iterations))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_a_valid_1024_bit_discriminant() {
        let (d, iterations) = create_discriminant(b"aggvdf-discriminant-seed", 1024).unwrap();
        assert!(iterations >= 1);
        assert_eq!(d.bits(), 1024);
    }

    #[test]
    fn rejects_non_byte_aligned_size() {
        assert!(create_discriminant(b"seed", 1023).is_err());
    }
}
