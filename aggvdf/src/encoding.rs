// SPDX-License-Identifier: Apache-2.0

//! Fixed-width, signed, big-endian encoding of arbitrary-precision integers, and the small
//! byte-level plumbing (splitting/joining serialized batches) the rest of this crate is built on.
//!
//! Positive values are the ordinary unsigned big-endian representation, left zero-padded.
//! Negative values follow two's complement: the magnitude of `|x| - 1` is taken in big-endian,
//! every bit is flipped, and the result is left-padded with `0xFF`.

use aggvdf_primitives::{AggVdfError, AggVdfResult};
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Zero;

/// Encode `x` into exactly `n` bytes of signed big-endian two's complement.
///
/// Returns `Err(AggVdfError::InputTooLong)` if `x` does not fit in `n` bytes, i.e. if
/// `x < -2^(8n-1)` or `x >= 2^(8n-1)` is violated for the signed range `n` bytes can carry... in
/// practice this crate only ever calls this with `n` large enough for its own values, so the error
/// path exists to make the function total rather than to reject any legitimate caller.
pub fn encode_int(x: &BigInt, n: usize) -> AggVdfResult<Vec<u8>> {
    let magnitude_bytes = if x.sign() != Sign::Minus {
        x.to_biguint().expect("non-negative BigInt").to_bytes_be()
    } else {
        let shifted = (-x) - 1;
        shifted
            .to_biguint()
            .expect("|x| - 1 is non-negative for negative x")
            .to_bytes_be()
    };

    if magnitude_bytes.len() > n {
        return Err(AggVdfError::InputTooLong(x.bits() as usize));
    }

    let mut out = vec![0u8; n];
    let offset = n - magnitude_bytes.len();
    out[offset..].copy_from_slice(&magnitude_bytes);

    if x.sign() == Sign::Minus {
        for byte in out.iter_mut() {
            *byte = !*byte;
        }
    }

    Ok(out)
}

/// Decode a fixed-width signed big-endian two's complement byte string into a [BigInt].
///
/// The high bit of the first byte (if any bytes are present) determines the sign; an empty slice
/// decodes to zero.
pub fn decode_int_be(bytes: &[u8]) -> BigInt {
    if bytes.is_empty() {
        return BigInt::zero();
    }

    if bytes[0] & 0x80 == 0 {
        return BigInt::from_bytes_be(Sign::Plus, bytes);
    }

    let flipped: Vec<u8> = bytes.iter().map(|b| !b).collect();
    let magnitude = BigUint::from_bytes_be(&flipped);
    -(BigInt::from(magnitude) + 1)
}

/// Number of bytes needed to hold a challenge seed for `H_G`, as a function of the discriminant's
/// bit length: `ceil((bits(|D|) + 16) / 16)`.
pub fn challenge_seed_width_bytes(discriminant_bits: u64) -> usize {
    ((discriminant_bits + 16).div_ceil(16)) as usize
}

/// Width in bytes of a single signed form coordinate (`a` or `b`) for a discriminant of the given
/// bit length. Both coordinates of a reduced form of discriminant `D` fit comfortably within
/// `bits(|D|)/2` bits, so this leaves generous headroom for the sign byte and rounding.
pub fn form_coordinate_width_bytes(discriminant_bits: u64) -> usize {
    (discriminant_bits as usize) / 16 + 8
}
