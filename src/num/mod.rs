//! Arbitrary-precision numbers over a digit vector.

mod arith;
mod div;
mod num;

pub use num::DigitNumber;
