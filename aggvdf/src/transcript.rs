// SPDX-License-Identifier: Apache-2.0

//! The per-batch digest `s` and per-element scalars `α_i` shared by the aggregate prover and
//! verifier. Kept in one place so the two sides cannot accidentally disagree on byte layout.

use crate::class_group::QuadraticForm;
use num_bigint::{BigInt, Sign};
use sha2::{Digest, Sha256};

/// `s = serialize(g_0) ‖ ... ‖ serialize(g_{n-1}) ‖ serialize(y_0) ‖ ... ‖ serialize(y_{n-1})`.
pub(crate) fn serialize_batch(gs: &[QuadraticForm], ys: &[QuadraticForm]) -> Vec<u8> {
    let mut s = Vec::new();
    for g in gs {
        s.extend(g.as_bytes_with_width());
    }
    for y in ys {
        s.extend(y.as_bytes_with_width());
    }
    s
}

/// `α_i = int(SHA-256(BE32(i) ‖ s))`.
pub(crate) fn alpha(i: u32, s: &[u8]) -> BigInt {
    let mut hasher = Sha256::new();
    hasher.update(i.to_be_bytes());
    hasher.update(s);
    BigInt::from_bytes_be(Sign::Plus, &hasher.finalize())
}
