//! Concrete components.

pub mod arithmetic;
pub mod linear_check;
pub mod range_check;
