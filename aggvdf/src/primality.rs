// SPDX-License-Identifier: Apache-2.0

//! Miller-Rabin primality testing over [BigUint]. `num-bigint` does not ship a primality test, so
//! this crate carries a small hand-rolled one, used by both the hash-to-prime and hash-to-group
//! layers.

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

/// Witnesses used for the Miller-Rabin test below. These are not a substitute for the random or
/// prime-derived witnesses used in some libraries, but repeated rounds over a fixed witness set of
/// this size make the probability of a false positive negligible for the candidate sizes this
/// crate deals with (256 and 264 bits), and keep the test fully deterministic.
const WITNESSES: &[u64] = &[
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71,
];

/// Returns `true` if `n` is (probably) prime.
pub fn is_probable_prime(n: &BigUint) -> bool {
    let two = BigUint::from(2u8);
    let three = BigUint::from(3u8);

    if *n < two {
        return false;
    }
    if *n == two || *n == three {
        return true;
    }
    if n.is_even() {
        return false;
    }

    let n_minus_one = n - BigUint::one();
    let mut d = n_minus_one.clone();
    let mut r = 0u32;
    while d.is_even() {
        d >>= 1;
        r += 1;
    }

    'witness: for &a in WITNESSES {
        let a = BigUint::from(a);
        if a >= *n {
            continue;
        }

        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }

        for _ in 0..r - 1 {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }

        return false;
    }

    true
}
