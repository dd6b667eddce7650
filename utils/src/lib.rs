//! Arkworks helpers used by the `arithmetization` crate: field/big-integer
//! conversions, small integer math, serde adapters and domain-separated
//! digests.

pub mod field_helpers;
pub mod hasher;
pub mod math;
pub mod serialization;

pub use field_helpers::{FieldHelpers, FieldHelpersError};
pub use hasher::CryptoDigest;
