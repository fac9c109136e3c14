// SPDX-License-Identifier: Apache-2.0

//! An aggregatable Wesolowski verifiable delay function over an imaginary quadratic class group.
//!
//! A VDF computes `y = g^{2^T}` for a group element `g` derived from a caller-supplied challenge;
//! the output can only be obtained by `T` sequential squarings, yet the result carries a short
//! proof verifiable in time sub-linear in `T`. This crate's aggregate scheme lets a prover bundle
//! `n` independent evaluations sharing the same discriminant `D` and iteration count `T` into a
//! single constant-size proof, verified far faster than `n` individual checks.
//!
//! The crate is organized leaf-first: [`encoding`] and [`class_group`] are the ambient ground
//! layer everything else is built on; [`hash_prime`] and [`hash_to_group`] derive group elements
//! and Fiat-Shamir challenges deterministically from byte seeds; [`evaluator`] runs the sequential
//! squaring loop; [`prover`] and [`verifier`] implement the aggregate scheme itself.

pub mod class_group;
pub mod discriminant;
pub mod encoding;
pub mod evaluator;
pub mod extended_gcd;
pub mod hash_prime;
pub mod hash_to_group;
pub mod primality;
pub mod prover;
mod transcript;
pub mod verifier;

pub use aggvdf_primitives::{AggVdfError, AggVdfResult};
pub use class_group::{Discriminant, QuadraticForm};
pub use discriminant::create_discriminant;
pub use verifier::VerifierOptions;

use num_bigint::{BigInt, Sign};

fn discriminant_from_be(d_be: &[u8]) -> AggVdfResult<Discriminant> {
    let magnitude = BigInt::from_bytes_be(Sign::Plus, d_be);
    Discriminant::try_from(-magnitude)
}

fn split_y_blob(y_blob: &[u8]) -> AggVdfResult<(&[u8], u64)> {
    if y_blob.len() < 4 {
        return Err(AggVdfError::InputLengthWrong(4));
    }
    let (form_bytes, iter_bytes) = y_blob.split_at(y_blob.len() - 4);
    let iter = u32::from_le_bytes(iter_bytes.try_into().expect("exactly 4 bytes")) as u64;
    Ok((form_bytes, iter))
}

fn challenges_from_be(challenges_be: &[Vec<u8>]) -> Vec<BigInt> {
    challenges_be
        .iter()
        .map(|bytes| BigInt::from_bytes_be(Sign::Plus, bytes))
        .collect()
}

/// `aggvdf_eval(d_be, t, challenges_be) -> [y_blob]`. `d_be` is the big-endian absolute value of
/// `|D|`. Each returned blob is `serialize_form(y, bits(|D|)) ‖ LE32(a_iter)`.
pub fn aggvdf_eval(d_be: &[u8], t: u64, challenges_be: &[Vec<u8>]) -> AggVdfResult<Vec<Vec<u8>>> {
    let discriminant = discriminant_from_be(d_be)?;
    let challenges = challenges_from_be(challenges_be);

    challenges
        .iter()
        .map(|challenge| {
            let (y, a_iter) = evaluator::eval(&discriminant, challenge, t)?;
            let mut blob = y.as_bytes_with_width();
            blob.extend((a_iter as u32).to_le_bytes());
            Ok(blob)
        })
        .collect()
}

/// `aggvdf_prove(d_be, t, challenges_be, y_blobs) -> proof_blob`. Output is
/// `serialize_form(π, bits(|D|)) ‖ LE32(b_iter)`.
pub fn aggvdf_prove(
    d_be: &[u8],
    t: u64,
    challenges_be: &[Vec<u8>],
    y_blobs: &[Vec<u8>],
) -> AggVdfResult<Vec<u8>> {
    let discriminant = discriminant_from_be(d_be)?;
    let challenges = challenges_from_be(challenges_be);

    let mut ys = Vec::with_capacity(y_blobs.len());
    let mut a_iters = Vec::with_capacity(y_blobs.len());
    for blob in y_blobs {
        let (form_bytes, a_iter) = split_y_blob(blob)?;
        ys.push(QuadraticForm::from_bytes(form_bytes, &discriminant)?);
        a_iters.push(a_iter);
    }

    let (pi, b_iter) = prover::aggregate_prove(&discriminant, t, &challenges, &ys, &a_iters)?;

    let mut blob = pi.as_bytes_with_width();
    blob.extend((b_iter as u32).to_le_bytes());
    Ok(blob)
}

/// `aggvdf_verify(d_be, t, challenges_be, y_blobs, proof_blob, thread_count) -> bool`.
#[allow(clippy::too_many_arguments)]
pub fn aggvdf_verify(
    d_be: &[u8],
    t: u64,
    challenges_be: &[Vec<u8>],
    y_blobs: &[Vec<u8>],
    proof_blob: &[u8],
    thread_count: usize,
) -> AggVdfResult<bool> {
    let discriminant = discriminant_from_be(d_be)?;
    let challenges = challenges_from_be(challenges_be);

    let mut ys = Vec::with_capacity(y_blobs.len());
    let mut a_iters = Vec::with_capacity(y_blobs.len());
    for blob in y_blobs {
        let (form_bytes, a_iter) = split_y_blob(blob)?;
        ys.push(QuadraticForm::from_bytes(form_bytes, &discriminant)?);
        a_iters.push(a_iter);
    }

    let (pi_bytes, b_iter) = split_y_blob(proof_blob)?;
    let pi = QuadraticForm::from_bytes(pi_bytes, &discriminant)?;

    verifier::aggregate_verify(
        &discriminant,
        t,
        &challenges,
        &ys,
        &a_iters,
        &pi,
        b_iter,
        &VerifierOptions {
            thread_count: thread_count.max(1),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_interface_round_trips() {
        let (discriminant, _) = create_discriminant(b"aggvdf-lib-test-seed", 256).unwrap();
        let d_be = discriminant.value().magnitude().to_bytes_be();
        let t = 16u64;
        let challenges_be: Vec<Vec<u8>> = (0..4u32).map(|i| i.to_be_bytes().to_vec()).collect();

        let y_blobs = aggvdf_eval(&d_be, t, &challenges_be).unwrap();
        let proof_blob = aggvdf_prove(&d_be, t, &challenges_be, &y_blobs).unwrap();
        let ok = aggvdf_verify(&d_be, t, &challenges_be, &y_blobs, &proof_blob, 4).unwrap();
        assert!(ok);
    }
}
