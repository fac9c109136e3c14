// SPDX-License-Identifier: Apache-2.0

//! Error type and group-element traits shared across the aggregatable class-group VDF crate.
//! This mirrors the split between `fastcrypto` and `fastcrypto-vdf` in this workspace's ancestry:
//! this crate holds the ambient pieces (errors, trait contracts) while `aggvdf` holds the
//! protocol itself.

pub mod error;
pub mod groups;

pub use error::{AggVdfError, AggVdfResult};
pub use groups::{Parameter, ParameterizedGroupElement, ToBytes, UnknownOrderGroupElement};
