// SPDX-License-Identifier: Apache-2.0

//! The aggregate verifier: recomputes the Fiat-Shamir state in parallel and checks a single
//! algebraic identity. Parallelism is plain `std::thread::scope` fork-join over two disjoint
//! phases; no `Mutex` or `Arc` is needed because each worker only ever touches its own slice of a
//! pre-sized output buffer, or its own locally-owned accumulator.

use crate::class_group::{pow, Discriminant, QuadraticForm};
use crate::hash_prime::hash_prime_fast;
use crate::hash_to_group::h_g_fast;
use crate::transcript::{alpha, serialize_batch};
use aggvdf_primitives::{AggVdfError, AggVdfResult};
use num_bigint::{BigInt, BigUint};
use tracing::{debug, trace, warn};

const FIAT_SHAMIR_BITS: usize = 264;
const FIAT_SHAMIR_FORCE_BITS: [usize; 1] = [263];

/// The verifier's only configurable knob: how many worker threads to fork over the batch.
pub struct VerifierOptions {
    pub thread_count: usize,
}

impl Default for VerifierOptions {
    fn default() -> Self {
        Self { thread_count: 4 }
    }
}

/// Contiguous index ranges `[⌊i·n/N⌋, ⌊(i+1)·n/N⌋)` for `N` workers over `n` items.
fn worker_ranges(n: usize, thread_count: usize) -> Vec<(usize, usize)> {
    (0..thread_count)
        .map(|i| (i * n / thread_count, (i + 1) * n / thread_count))
        .collect()
}

/// `verify(D, (challenge_i), (y_i), π, T, (a_iter_i), b_iter) -> bool`, forked over
/// `options.thread_count` worker threads.
#[allow(clippy::too_many_arguments)]
pub fn aggregate_verify(
    discriminant: &Discriminant,
    t: u64,
    challenges: &[BigInt],
    ys: &[QuadraticForm],
    a_iters: &[u64],
    pi: &QuadraticForm,
    b_iter: u64,
    options: &VerifierOptions,
) -> AggVdfResult<bool> {
    let n = challenges.len();
    if ys.len() != n || a_iters.len() != n {
        return Err(AggVdfError::InvalidInput);
    }
    if n == 0 {
        return Err(AggVdfError::InvalidInput);
    }

    let thread_count = options.thread_count.clamp(1, n);
    debug!(n, thread_count, "aggregate_verify start");

    // Phase 1: recompute every g_i in parallel into a shared, index-addressed, pre-sized buffer.
    let mut gs: Vec<QuadraticForm> = (0..n).map(|_| QuadraticForm::identity(discriminant)).collect();
    let ranges = worker_ranges(n, thread_count);

    let phase1: AggVdfResult<()> = std::thread::scope(|scope| {
        let mut handles = Vec::with_capacity(thread_count);
        let mut remaining = gs.as_mut_slice();

        for &(start, end) in &ranges {
            let (chunk, rest) = remaining.split_at_mut(end - start);
            remaining = rest;
            let challenges_slice = &challenges[start..end];
            let a_iters_slice = &a_iters[start..end];

            handles.push(scope.spawn(move || -> AggVdfResult<()> {
                for (local_i, slot) in chunk.iter_mut().enumerate() {
                    *slot = h_g_fast(&challenges_slice[local_i], discriminant, a_iters_slice[local_i])?;
                }
                Ok(())
            }));
        }

        for handle in handles {
            handle.join().expect("hash-to-group worker thread panicked")?;
        }
        Ok(())
    });
    phase1?;
    trace!("aggregate_verify: hash-to-group phase done");

    // 2. Build s strictly after phase 1's join barrier.
    let s = serialize_batch(&gs, ys);

    // 3. Recompute the Fiat-Shamir prime without re-testing earlier candidates.
    let b = hash_prime_fast(&s, FIAT_SHAMIR_BITS, &FIAT_SHAMIR_FORCE_BITS, b_iter)?;

    // 4. Fold each worker's private accumulators; each thread owns its own `agg_gg`/`agg_yy` and
    // returns them as its join value rather than writing into shared state.
    let folded: Vec<(QuadraticForm, QuadraticForm)> = std::thread::scope(|scope| {
        let mut handles = Vec::with_capacity(thread_count);

        for &(start, end) in &ranges {
            let gs_slice = &gs[start..end];
            let ys_slice = &ys[start..end];

            handles.push(scope.spawn(move || {
                let mut agg_gg = QuadraticForm::identity(discriminant);
                let mut agg_yy = QuadraticForm::identity(discriminant);
                for local_i in 0..gs_slice.len() {
                    let alpha_i = alpha((start + local_i) as u32, &s);
                    agg_gg = agg_gg.nucomp(&pow(&gs_slice[local_i], &alpha_i));
                    agg_yy = agg_yy.nucomp(&pow(&ys_slice[local_i], &alpha_i));
                }
                (agg_gg, agg_yy)
            }));
        }

        handles
            .into_iter()
            .map(|h| h.join().expect("linear-combination worker thread panicked"))
            .collect()
    });
    trace!("aggregate_verify: linear combination phase done");

    // 5. Fold worker outputs sequentially.
    let mut agg_x = QuadraticForm::identity(discriminant);
    let mut agg_y = QuadraticForm::identity(discriminant);
    for (gg, yy) in folded {
        agg_x = agg_x.nucomp(&gg);
        agg_y = agg_y.nucomp(&yy);
    }

    // 6. r = 2^T mod B.
    let r = (BigUint::from(1u32) << t as usize) % &b;

    // 7. Accept iff pi^B compose agg_x^r == agg_y.
    let pi_to_b = pow(pi, &BigInt::from(b));
    let agg_x_to_r = pow(&agg_x, &BigInt::from(r));
    let lhs = pi_to_b.nucomp(&agg_x_to_r);

    let accepted = lhs == agg_y;
    if !accepted {
        warn!("aggregate_verify: final identity check failed");
    }

    Ok(accepted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::eval;
    use crate::prover::aggregate_prove;
    use proptest::prelude::*;

    fn test_discriminant() -> Discriminant {
        Discriminant::try_from(BigInt::from(-1255)).unwrap()
    }

    proptest! {
        #[test]
        fn verification_is_invariant_to_thread_count(thread_count in 1usize..9) {
            let d = test_discriminant();
            let t = 8u64;
            let challenges: Vec<BigInt> = (0..6).map(BigInt::from).collect();

            let mut ys = Vec::new();
            let mut a_iters = Vec::new();
            for c in &challenges {
                let (y, a_iter) = eval(&d, c, t).unwrap();
                ys.push(y);
                a_iters.push(a_iter);
            }

            let (pi, b_iter) = aggregate_prove(&d, t, &challenges, &ys, &a_iters).unwrap();
            let ok = aggregate_verify(
                &d, t, &challenges, &ys, &a_iters, &pi, b_iter, &VerifierOptions { thread_count },
            )
            .unwrap();
            prop_assert!(ok);
        }
    }

    #[test]
    fn thread_count_does_not_change_the_result() {
        let d = test_discriminant();
        let t = 16u64;
        let challenges: Vec<BigInt> = (0..8).map(BigInt::from).collect();

        let mut ys = Vec::new();
        let mut a_iters = Vec::new();
        for c in &challenges {
            let (y, a_iter) = eval(&d, c, t).unwrap();
            ys.push(y);
            a_iters.push(a_iter);
        }

        let (pi, b_iter) = aggregate_prove(&d, t, &challenges, &ys, &a_iters).unwrap();

        for thread_count in [1, 2, 4, 8] {
            let ok = aggregate_verify(
                &d,
                t,
                &challenges,
                &ys,
                &a_iters,
                &pi,
                b_iter,
                &VerifierOptions { thread_count },
            )
            .unwrap();
            assert!(ok, "thread_count={thread_count} should verify");
        }
    }

    #[test]
    fn tampered_proof_is_rejected() {
        let d = test_discriminant();
        let t = 16u64;
        let challenges: Vec<BigInt> = (0..4).map(BigInt::from).collect();

        let mut ys = Vec::new();
        let mut a_iters = Vec::new();
        for c in &challenges {
            let (y, a_iter) = eval(&d, c, t).unwrap();
            ys.push(y);
            a_iters.push(a_iter);
        }

        let (pi, b_iter) = aggregate_prove(&d, t, &challenges, &ys, &a_iters).unwrap();

        let mut bad_ys = ys.clone();
        bad_ys[0] = bad_ys[0].clone().nudupl();

        let ok = aggregate_verify(
            &d,
            t,
            &challenges,
            &bad_ys,
            &a_iters,
            &pi,
            b_iter,
            &VerifierOptions::default(),
        )
        .unwrap();
        assert!(!ok);
    }
}
