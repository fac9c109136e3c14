// SPDX-License-Identifier: Apache-2.0

//! The aggregate prover: combines `n` independent VDF evaluations into a single quotient-form
//! proof via a Fiat-Shamir linear combination.

use crate::class_group::{pow, Discriminant, QuadraticForm};
use crate::hash_prime::hash_prime;
use crate::hash_to_group::h_g_fast;
use crate::transcript::{alpha, serialize_batch};
use aggvdf_primitives::{AggVdfError, AggVdfResult};
use num_bigint::{BigInt, BigUint};
use num_traits::One;
use tracing::debug;

/// `π^B` exponent width: a 264-bit Fiat-Shamir prime with the top bit forced set.
const FIAT_SHAMIR_BITS: usize = 264;
const FIAT_SHAMIR_FORCE_BITS: [usize; 1] = [263];

/// Given per-VDF `(challenge_i, y_i, a_iter_i)` and the shared `T`, returns the aggregated proof
/// `π` and the Fiat-Shamir prime's acceptance index `b_iter`.
pub fn aggregate_prove(
    discriminant: &Discriminant,
    t: u64,
    challenges: &[BigInt],
    ys: &[QuadraticForm],
    a_iters: &[u64],
) -> AggVdfResult<(QuadraticForm, u64)> {
    let n = challenges.len();
    if ys.len() != n || a_iters.len() != n {
        return Err(AggVdfError::InvalidInput);
    }

    // 1. Recompute each g_i from its recorded acceptance index.
    let gs: Vec<QuadraticForm> = challenges
        .iter()
        .zip(a_iters)
        .map(|(c, &a_iter)| h_g_fast(c, discriminant, a_iter))
        .collect::<AggVdfResult<_>>()?;

    // 2. Build the per-batch digest.
    let s = serialize_batch(&gs, ys);

    // 3. Fiat-Shamir prime B.
    let (b, b_iter) = hash_prime(&s, FIAT_SHAMIR_BITS, &FIAT_SHAMIR_FORCE_BITS);

    // 4. / 5. Scalars alpha_i and the linear combination agg_g = prod g_i^{alpha_i}.
    let mut agg_g = QuadraticForm::identity(discriminant);
    for (i, g) in gs.iter().enumerate() {
        let alpha_i = alpha(i as u32, &s);
        agg_g = agg_g.nucomp(&pow(g, &alpha_i));
    }

    // 6. The quotient-form proof.
    let pi = pow_form_with_quotient(&agg_g, discriminant, t, &b);

    debug!(n, b_iter, "aggregate_prove found Fiat-Shamir prime");

    Ok((pi, b_iter))
}

/// Computes `g^{⌊2^T / B⌋}` in `O(T)` group operations and `O(1)` auxiliary state: the heart of
/// the aggregate scheme. Maintains a running quotient-form accumulator `x` and remainder `r` such
/// that after iteration `t`, `x = g^{q_t}` and `r = 2^{t+1} mod B`, where `q_t` is the running
/// quotient of `2^{t+1}` divided by `B`.
pub(crate) fn pow_form_with_quotient(
    g: &QuadraticForm,
    discriminant: &Discriminant,
    t: u64,
    b: &BigUint,
) -> QuadraticForm {
    let mut x = QuadraticForm::identity(discriminant);
    let mut r = BigUint::one();

    for _ in 0..t {
        x = x.nudupl();
        let two_r = &r << 1u32;
        if &two_r >= b {
            x = x.nucomp(g);
        }
        r = &two_r % b;
    }

    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::eval;
    use crate::verifier::{aggregate_verify, VerifierOptions};
    use proptest::prelude::*;

    fn test_discriminant() -> Discriminant {
        Discriminant::try_from(BigInt::from(-1255)).unwrap()
    }

    proptest! {
        #[test]
        fn pow_form_with_quotient_matches_floor_division_for_small_t_and_b(
            t in 0u64..20,
            b in 1u32..200,
        ) {
            let d = test_discriminant();
            let g = QuadraticForm::generator(&d);
            let b = BigUint::from(b);

            let pi = pow_form_with_quotient(&g, &d, t, &b);

            let two_pow_t = BigUint::from(1u32) << t as u32;
            let quotient = &two_pow_t / &b;
            let expected = pow(&g, &BigInt::from(quotient));

            prop_assert_eq!(pi, expected);
        }
    }

    #[test]
    fn pow_form_with_quotient_matches_floor_division_law() {
        let d = test_discriminant();
        let g = QuadraticForm::generator(&d);
        let t = 12u64;
        let b = BigUint::from(97u32);

        let pi = pow_form_with_quotient(&g, &d, t, &b);

        let two_pow_t = BigUint::from(1u32) << t as u32;
        let quotient = &two_pow_t / &b;
        let expected = pow(&g, &BigInt::from(quotient));

        assert_eq!(pi, expected);
    }

    #[test]
    fn batch_of_eight_round_trips() {
        let d = test_discriminant();
        let t = 32u64;
        let challenges: Vec<BigInt> = (0..8).map(BigInt::from).collect();

        let mut ys = Vec::new();
        let mut a_iters = Vec::new();
        for c in &challenges {
            let (y, a_iter) = eval(&d, c, t).unwrap();
            ys.push(y);
            a_iters.push(a_iter);
        }

        let (pi, b_iter) = aggregate_prove(&d, t, &challenges, &ys, &a_iters).unwrap();
        let ok = aggregate_verify(
            &d,
            t,
            &challenges,
            &ys,
            &a_iters,
            &pi,
            b_iter,
            &VerifierOptions::default(),
        )
        .unwrap();
        assert!(ok);
    }
}
