// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Error type used by the aggregatable VDF core. Every fallible operation in this crate family
/// returns `Result<T, AggVdfError>`; a rejected proof is not an error (see `aggvdf::verifier`).
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum AggVdfError {
    /// A decoded value (challenge, discriminant, form, or blob) did not satisfy the format or
    /// mathematical invariants expected of it.
    #[error("invalid input")]
    InvalidInput,

    /// A byte blob had a different length than the protocol requires.
    #[error("input has wrong length, expected {0} bytes")]
    InputLengthWrong(usize),

    /// A value did not fit in the number of bits/bytes the caller requested for it.
    #[error("input is too large, has {0} bits")]
    InputTooLong(usize),

    /// An arithmetic invariant (e.g. discriminant preservation under reduction) was violated.
    #[error("arithmetic error: {0}")]
    ArithmeticError(String),

    /// A catch-all for conditions not covered by the other variants.
    #[error("{0}")]
    GeneralError(String),
}

pub type AggVdfResult<T> = Result<T, AggVdfError>;
