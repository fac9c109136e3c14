// SPDX-License-Identifier: Apache-2.0

//! Deterministic map from a challenge integer to a reduced form of a fixed discriminant, `H_G`.

use crate::class_group::{Discriminant, QuadraticForm};
use crate::encoding::{challenge_seed_width_bytes, encode_int};
use crate::hash_prime::advance_sprout_truncating;
use crate::primality::is_probable_prime;
use aggvdf_primitives::AggVdfResult;
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};
use sha2::{Digest, Sha256};

fn next_candidate(sprout: &mut Vec<u8>) -> BigUint {
    advance_sprout_truncating(sprout);
    let digest = Sha256::digest(sprout.as_slice());
    let mut candidate = BigUint::from_bytes_be(&digest);
    // Force a ≡ 3 (mod 4): bit 0 (odd) and bit 1 set.
    candidate.set_bit(0, true);
    candidate.set_bit(1, true);
    candidate
}

fn form_from_candidate(a: &BigUint, discriminant: &Discriminant) -> Option<QuadraticForm> {
    if !is_probable_prime(a) {
        return None;
    }

    let a_signed = BigInt::from(a.clone());
    let k = discriminant.value().mod_floor(&a_signed);
    let k = k.to_biguint()?;

    let exponent = (a - BigUint::one()) >> 1u32;
    if k.modpow(&exponent, a) != BigUint::one() {
        return None;
    }

    let sqrt_exponent = (a + BigUint::one()) >> 2u32;
    let mut b = k.modpow(&sqrt_exponent, a);
    if b.is_even() {
        b = a - &b;
    }

    QuadraticForm::from_a_b_discriminant(a_signed, BigInt::from(b), discriminant)
        .ok()
        .map(QuadraticForm::reduce)
}

/// `H_G(challenge, D) -> (g, a_iter)`.
pub fn h_g(challenge: &BigInt, discriminant: &Discriminant) -> AggVdfResult<(QuadraticForm, u64)> {
    let width = challenge_seed_width_bytes(discriminant.bits());
    let mut sprout = encode_int(challenge, width)?;

    let mut iterations: u64 = 0;
    loop {
        let a = next_candidate(&mut sprout);
        iterations += 1;
        if let Some(form) = form_from_candidate(&a, discriminant) {
            return Ok((form, iterations));
        }
    }
}

/// `H_G_fast(challenge, D, target) -> g`: replays the sprout walk to iteration `target` and
/// performs a single primality test and square-root attempt, returning the group identity if that
/// index does not in fact hold a valid witness.
pub fn h_g_fast(challenge: &BigInt, discriminant: &Discriminant, target: u64) -> AggVdfResult<QuadraticForm> {
    let width = challenge_seed_width_bytes(discriminant.bits());
    let mut sprout = encode_int(challenge, width)?;

    let mut a = BigUint::zero();
    for _ in 0..target {
        a = next_candidate(&mut sprout);
    }

    Ok(form_from_candidate(&a, discriminant).unwrap_or_else(|| QuadraticForm::identity(discriminant)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_discriminant() -> Discriminant {
        Discriminant::try_from(BigInt::from(-1255)).unwrap()
    }

    #[test]
    fn h_g_fast_reproduces_h_g() {
        let d = test_discriminant();
        let challenge = BigInt::from(424242);
        let (g, a_iter) = h_g(&challenge, &d).unwrap();
        let replayed = h_g_fast(&challenge, &d, a_iter).unwrap();
        assert_eq!(g, replayed);
    }

    #[test]
    fn different_challenges_give_different_forms() {
        let d = test_discriminant();
        let (g1, _) = h_g(&BigInt::from(1), &d).unwrap();
        let (g2, _) = h_g(&BigInt::from(2), &d).unwrap();
        assert_ne!(g1, g2);
    }
}
