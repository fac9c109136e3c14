// SPDX-License-Identifier: Apache-2.0

//! Binary quadratic forms of a fixed negative discriminant `D`, which form a group under
//! composition, a representation of the ideal class group of the imaginary quadratic order of
//! discriminant `D`. See e.g. chapter 5 in Henri Cohen (2010), "A Course in Computational
//! Algebraic Number Theory" for background.
//!
//! Composition (`nucomp`) and squaring (`nudupl`) follow Jacobson & van der Poorten,
//! "Computational aspects of NUCOMP" (2002), built directly on `num_bigint::BigInt`.

use crate::encoding::{decode_int_be, encode_int, form_coordinate_width_bytes};
use crate::extended_gcd::extended_euclidean_algorithm;
use aggvdf_primitives::{AggVdfError, AggVdfResult, Parameter, ParameterizedGroupElement, ToBytes, UnknownOrderGroupElement};
use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

/// A negative discriminant `D ≡ 1 (mod 4)` defining a class group `Cl(D)`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Discriminant {
    value: BigInt,
    /// `⌊|D|^(1/4)⌋`, the bound used by `reduce`'s partial-gcd step in squaring.
    lroot: BigInt,
}

/// A generous ceiling on discriminant size; this crate has no inherent limit, but an unbounded
/// discriminant would make every downstream computation unboundedly slow, so inputs this large are
/// rejected as malformed rather than accepted and left to time out.
pub const MAX_DISCRIMINANT_SIZE_IN_BITS: u64 = 8192;

impl Discriminant {
    pub fn value(&self) -> &BigInt {
        &self.value
    }

    /// Bit length of `|D|`.
    pub fn bits(&self) -> u64 {
        self.value.bits()
    }

    fn lroot(&self) -> &BigInt {
        &self.lroot
    }
}

impl TryFrom<BigInt> for Discriminant {
    type Error = AggVdfError;

    fn try_from(value: BigInt) -> AggVdfResult<Self> {
        if value.sign() != Sign::Minus {
            return Err(AggVdfError::InvalidInput);
        }
        if value.mod_floor(&BigInt::from(4)) != BigInt::one() {
            return Err(AggVdfError::InvalidInput);
        }
        let bits = value.bits();
        if bits > MAX_DISCRIMINANT_SIZE_IN_BITS {
            return Err(AggVdfError::InputTooLong(bits as usize));
        }

        let abs = value.magnitude().clone();
        let lroot = BigInt::from(isqrt(&isqrt(&abs)));

        Ok(Self { value, lroot })
    }
}

impl Parameter for Discriminant {
    fn from_seed(seed: &[u8], size_in_bits: usize) -> AggVdfResult<Self> {
        crate::discriminant::create_discriminant(seed, size_in_bits).map(|(d, _iterations)| d)
    }
}

impl ToBytes for Discriminant {
    fn to_bytes(&self) -> Vec<u8> {
        self.value.magnitude().to_bytes_be()
    }
}

/// Integer square root of a non-negative [BigUint] via Newton's method.
fn isqrt(n: &BigUint) -> BigUint {
    if n.is_zero() {
        return BigUint::zero();
    }
    let bit_len = n.bits() as usize;
    let mut x = BigUint::one() << (bit_len.div_ceil(2) + 1);
    loop {
        let next = (&x + n / &x) >> 1usize;
        if next >= x {
            return x;
        }
        x = next;
    }
}

/// A reduced binary quadratic form `(a, b, c)` of a fixed discriminant `D = b^2 - 4ac`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QuadraticForm {
    a: BigInt,
    b: BigInt,
    c: BigInt,
    lroot: BigInt,
    discriminant_bits: u64,
}

impl QuadraticForm {
    /// Construct a form from its `a`, `b` coordinates and the discriminant they belong to,
    /// recovering `c = (b^2 - D) / 4a`. Fails if the pair does not actually produce an integral,
    /// discriminant-preserving `c` (i.e. the input was not a valid form of this discriminant).
    pub fn from_a_b_discriminant(
        a: BigInt,
        b: BigInt,
        discriminant: &Discriminant,
    ) -> AggVdfResult<Self> {
        if a.is_zero() {
            return Err(AggVdfError::InvalidInput);
        }
        let numerator = &b * &b - discriminant.value();
        let denominator = BigInt::from(4) * &a;
        if !(&numerator % &denominator).is_zero() {
            return Err(AggVdfError::ArithmeticError(
                "(b^2 - D) is not divisible by 4a".to_string(),
            ));
        }
        let c = numerator / denominator;

        Ok(Self {
            a,
            b,
            c,
            lroot: discriminant.lroot().clone(),
            discriminant_bits: discriminant.bits(),
        })
    }

    /// The identity element `(1, 1, (1-D)/4)` of `Cl(D)`.
    pub fn identity(discriminant: &Discriminant) -> Self {
        Self::from_a_b_discriminant(BigInt::one(), BigInt::one(), discriminant)
            .expect("(1, 1) is always a valid form coordinate pair")
    }

    /// An element of presumed large order in `Cl(D)`, used only by tests.
    #[cfg(test)]
    pub fn generator(discriminant: &Discriminant) -> Self {
        Self::from_a_b_discriminant(BigInt::from(2), BigInt::one(), discriminant)
            .expect("(2, 1) is a valid form coordinate pair whenever D is odd")
    }

    /// The discriminant `b^2 - 4ac` this form belongs to.
    pub fn discriminant(&self) -> BigInt {
        &self.b * &self.b - BigInt::from(4) * &self.a * &self.c
    }

    /// Gauss reduction: repeatedly swap-and-negate when `a > c`, and apply a Euclidean step on `b`
    /// when `|b| > a`, until `|b| <= a <= c`. `c` is recomputed from `(a, b, D)` after every change
    /// to `b` rather than updated incrementally, trading a handful of extra big-integer divisions
    /// for a construction that cannot drift from the true discriminant.
    pub fn reduce(mut self) -> Self {
        let d_value = self.discriminant();

        loop {
            if self.a > self.c {
                std::mem::swap(&mut self.a, &mut self.c);
                self.b = -self.b;
            }

            let abs_b = self.b.abs();
            if abs_b <= self.a && self.a <= self.c {
                if (abs_b == self.a || self.a == self.c) && self.b.is_negative() {
                    self.b = -self.b;
                }
                break;
            }

            let two_a = BigInt::from(2) * &self.a;
            let mut new_b = self.b.mod_floor(&two_a);
            if new_b > self.a {
                new_b -= &two_a;
            }
            self.b = new_b;
            self.c = (&self.b * &self.b - &d_value) / (BigInt::from(4) * &self.a);
        }

        debug_assert_eq!(self.discriminant(), d_value);
        self
    }

    /// Squaring (`nudupl`), an optimised special case of composition with itself: "a slightly
    /// optimised version of algorithm 2 from Jacobson, Jr, Michael & Poorten, Alfred (2002),
    /// 'Computational aspects of NUCOMP'"; the paragraph numbers below follow that paper.
    pub fn nudupl(self) -> Self {
        let Self {
            a: u,
            b: v,
            c: w,
            lroot,
            discriminant_bits,
        } = self;

        // 1.
        let xgcd = extended_euclidean_algorithm(&u, &v);
        let g = xgcd.gcd;
        let y0 = xgcd.y;
        let (capital_by, capital_dy) = if g.is_one() {
            (&u / &g, &v / &g)
        } else {
            (u.clone(), v.clone())
        };

        // 2.
        let capital_bx = (&w * &y0).mod_floor(&capital_by);

        // 3. (partial xgcd, bounded by Lroot)
        let mut bx = capital_bx;
        let mut by = capital_by.clone();
        let mut x = BigInt::one();
        let mut y = BigInt::zero();
        let mut z: u32 = 0;

        while by.abs() > lroot && !bx.is_zero() {
            let (q, t) = by.div_rem(&bx);
            by = bx;
            bx = t;
            let t2 = &y - &q * &x;
            y = x;
            x = t2;
            z += 1;
        }

        if z % 2 == 1 {
            by = -by;
            y = -y;
        }

        // 4. / 5.
        let mut u3 = &by * &by;
        let mut w3 = &bx * &bx;
        let mut v3 = -((&bx * &by) << 1u32);

        if z == 0 {
            // 4.
            let mut dx = (&bx * &capital_dy - &w) / &capital_by;
            v3 += &v;
            if !g.is_one() {
                dx *= &g;
            }
            w3 -= &dx;
        } else {
            // 5.
            let dx = (&bx * &capital_dy - &w * &x) / &capital_by;
            let q1 = &dx * &y;
            let dy = (&q1 + &capital_dy) / &x;
            v3 += &g * &(&dy + &q1);

            if !g.is_one() {
                x *= &g;
                y *= &g;
            }
            u3 -= &y * &dy;
            w3 -= &x * &dx;
        }

        Self {
            a: u3,
            b: v3,
            c: w3,
            lroot,
            discriminant_bits,
        }
        .reduce()
    }

    /// General composition (`nucomp`) of two forms of the same discriminant, following the
    /// classical reduction-based composition algorithm (Cohen, "A Course in Computational
    /// Algebraic Number Theory", Algorithm 5.4.7).
    pub fn nucomp(&self, other: &Self) -> Self {
        debug_assert_eq!(self.lroot, other.lroot, "forms must share a discriminant");

        if self.a.is_one() {
            return other.clone();
        }
        if other.a.is_one() {
            return self.clone();
        }

        let (a1, b1, a2, b2) = (&self.a, &self.b, &other.a, &other.b);
        let s = (b1 + b2) / BigInt::from(2);

        let gcd_a1_a2 = extended_euclidean_algorithm(a1, a2);
        let g = extended_euclidean_algorithm(&gcd_a1_a2.gcd, &s).gcd;

        let (a3, b3) = if g.is_one() {
            let a3 = a1 * a2;
            let b3 = b1 + BigInt::from(2) * a2 * ((b2 - b1) / BigInt::from(2));
            (a3, b3)
        } else {
            let a1_g = a1 / &g;
            let a2_g = a2 / &g;
            let s_g = &s / &g;
            let u = extended_euclidean_algorithm(&a1_g, &a2_g).x;

            let a3 = &g * &a1_g * &a2_g;
            let b3 = b1 + BigInt::from(2) * &g * &a2_g * &u * (&s_g - b1 / &g);
            (a3, b3)
        };

        let c3 = (&b3 * &b3 - self.discriminant()) / (BigInt::from(4) * &a3);

        Self {
            a: a3,
            b: b3,
            c: c3,
            lroot: self.lroot.clone(),
            discriminant_bits: self.discriminant_bits,
        }
        .reduce()
    }

    /// Serialize `(a, b)` at a width determined by the discriminant's bit length; `c` is always
    /// recoverable from `(a, b, D)` so it is never transmitted.
    pub fn as_bytes_with_width(&self) -> Vec<u8> {
        let width = form_coordinate_width_bytes(self.discriminant_bits);
        let mut out = encode_int(&self.a, width).expect("reduced `a` fits within its own width");
        out.extend(encode_int(&self.b, width).expect("reduced `b` fits within its own width"));
        out
    }

    /// Deserialize a form produced by [`QuadraticForm::as_bytes_with_width`].
    pub fn from_bytes(bytes: &[u8], discriminant: &Discriminant) -> AggVdfResult<Self> {
        let width = form_coordinate_width_bytes(discriminant.bits());
        if bytes.len() != 2 * width {
            return Err(AggVdfError::InputLengthWrong(2 * width));
        }
        let a = decode_int_be(&bytes[..width]);
        let b = decode_int_be(&bytes[width..]);
        Self::from_a_b_discriminant(a, b, discriminant)
    }
}

impl std::ops::Add for QuadraticForm {
    type Output = QuadraticForm;

    fn add(self, rhs: QuadraticForm) -> Self::Output {
        self.nucomp(&rhs)
    }
}

impl std::ops::Add<&QuadraticForm> for QuadraticForm {
    type Output = QuadraticForm;

    fn add(self, rhs: &QuadraticForm) -> Self::Output {
        self.nucomp(rhs)
    }
}

impl std::ops::Neg for QuadraticForm {
    type Output = QuadraticForm;

    fn neg(self) -> Self::Output {
        Self {
            b: -self.b,
            ..self
        }
    }
}

impl ParameterizedGroupElement for QuadraticForm {
    type ParameterType = Discriminant;
    type ScalarType = BigInt;

    fn zero(parameters: &Self::ParameterType) -> Self {
        Self::identity(parameters)
    }

    fn double(self) -> Self {
        self.nudupl()
    }

    fn mul(&self, scale: &BigInt) -> Self {
        pow(self, scale)
    }

    fn as_bytes(&self) -> Vec<u8> {
        self.as_bytes_with_width()
    }

    fn same_group(&self, other: &Self) -> bool {
        self.discriminant() == other.discriminant()
    }
}

impl UnknownOrderGroupElement for QuadraticForm {}

/// Binary exponentiation `g^scale` via repeated `nudupl`/`nucomp`, used by tests and by callers
/// that need an ordinary (non-quotient) power; the aggregate prover/verifier instead call
/// `nudupl`/`nucomp` directly so they can interleave the `PowFormWithQuotient` bookkeeping.
pub fn pow(g: &QuadraticForm, scale: &BigInt) -> QuadraticForm {
    assert!(!scale.is_negative(), "negative exponents are not supported");

    let identity_like_lroot = QuadraticForm {
        a: BigInt::one(),
        b: BigInt::one(),
        c: (BigInt::one() - g.discriminant()) / BigInt::from(4),
        lroot: g.lroot.clone(),
        discriminant_bits: g.discriminant_bits,
    };

    let mut result = identity_like_lroot;
    let mut base = g.clone();
    let mut exponent = scale.clone();

    while !exponent.is_zero() {
        if exponent.is_odd() {
            result = result.nucomp(&base);
        }
        base = base.nudupl();
        exponent >>= 1u32;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_discriminant() -> Discriminant {
        Discriminant::try_from(BigInt::from(-1255)).unwrap()
    }

    #[test]
    fn reduced_identity_is_already_reduced() {
        let d = test_discriminant();
        let id = QuadraticForm::identity(&d);
        assert_eq!(id.clone().reduce(), id);
    }

    #[test]
    fn nudupl_matches_nucomp_with_self() {
        let d = test_discriminant();
        let g = QuadraticForm::generator(&d);
        for _ in 0..200 {
            let doubled = g.clone().nudupl();
            let composed = g.nucomp(&g);
            assert_eq!(doubled, composed);
        }
    }

    #[test]
    fn pow_two_matches_repeated_nudupl() {
        let d = test_discriminant();
        let g = QuadraticForm::generator(&d);

        let mut by_squaring = g.clone();
        for _ in 0..10 {
            by_squaring = by_squaring.nudupl();
        }

        let by_pow = pow(&g, &(BigInt::from(1) << 10u32));
        assert_eq!(by_squaring, by_pow);
    }

    #[test]
    fn form_serialization_round_trips() {
        let d = test_discriminant();
        let g = QuadraticForm::generator(&d).nudupl();
        let bytes = g.as_bytes_with_width();
        let decoded = QuadraticForm::from_bytes(&bytes, &d).unwrap();
        assert_eq!(g, decoded);
    }

    #[test]
    fn rejects_non_negative_discriminant() {
        assert!(Discriminant::try_from(BigInt::from(5)).is_err());
    }

    #[test]
    fn rejects_discriminant_not_one_mod_four() {
        assert!(Discriminant::try_from(BigInt::from(-4)).is_err());
    }
}
