//! Definitions.

use core::fmt::Display;

/// A digit.
pub type Digit = u32;

/// Doubled digit.
pub type DoubleDigit = u64;

/// An exponent.
pub type Exponent = i64;

/// Base of the digit representation.
///
/// Digit sequences are decimal by default. The arithmetic is written against
/// the symbolic base, so any base whose square fits a [`DoubleDigit`] works.
pub const DIGIT_BASE: Digit = 10;

/// Default cap on the precision an iterator may reach while it refines an
/// enclosure on its own, e.g. to drive a divisor interval away from zero.
pub const DEFAULT_MAX_PRECISION: usize = 10;

/// Sign.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
pub enum Sign {
    /// Negative.
    Neg = -1,

    /// Positive.
    Pos = 1,
}

impl Sign {
    /// Changes the sign to the opposite.
    pub fn invert(&self) -> Self {
        match *self {
            Sign::Pos => Sign::Neg,
            Sign::Neg => Sign::Pos,
        }
    }

    /// Returns true if `self` is positive.
    pub fn is_positive(&self) -> bool {
        *self == Sign::Pos
    }

    /// Returns true if `self` is negative.
    pub fn is_negative(&self) -> bool {
        *self == Sign::Neg
    }

    /// Sign of a product of two values with signs `self` and `other`.
    pub fn product(&self, other: Sign) -> Self {
        if *self == other {
            Sign::Pos
        } else {
            Sign::Neg
        }
    }
}

/// Rounding direction for operations that may lose information.
///
/// Outward rounding of an interval is obtained by rounding its lower bound
/// with [`RoundingMode::Down`] and its upper bound with [`RoundingMode::Up`].
#[derive(Eq, PartialEq, Debug, Copy, Clone)]
pub enum RoundingMode {
    /// Round toward negative infinity.
    Down,

    /// Round toward positive infinity.
    Up,
}

impl RoundingMode {
    /// Changes the direction to the opposite.
    pub fn invert(&self) -> Self {
        match *self {
            RoundingMode::Down => RoundingMode::Up,
            RoundingMode::Up => RoundingMode::Down,
        }
    }

    /// Returns true if `self` rounds toward positive infinity.
    pub fn is_up(&self) -> bool {
        *self == RoundingMode::Up
    }
}

/// Possible errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A string did not denote a decimal number.
    InvalidStringNumber,

    /// Division by an exactly zero divisor.
    DivisionByZero,

    /// A divisor interval still contained zero when the precision cap was
    /// reached, so one side of the quotient tends to infinity.
    DivergentDivisionResult,

    /// The exponent of an integer power was not an integer at maximum
    /// refinement.
    NonIntegralExponent,

    /// The exponent of an integer power was negative.
    NegativeIntegerExponent,

    /// Logarithm of a value that is not strictly positive.
    LogDomain,

    /// A trigonometric operation could not leave the neighborhood of a
    /// derivative sign change before the precision cap was reached.
    MaxPrecisionTrig,

    /// An operation node carried no usable operator tag.
    NoOperation,
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let repr = match self {
            Error::InvalidStringNumber => "invalid string number",
            Error::DivisionByZero => "division by zero",
            Error::DivergentDivisionResult => "divergent division result",
            Error::NonIntegralExponent => "exponent is not an integer",
            Error::NegativeIntegerExponent => "negative integer exponents are not supported",
            Error::LogDomain => "logarithm is not defined for non-positive numbers",
            Error::MaxPrecisionTrig => {
                "maximum precision reached inside a trigonometric operation"
            }
            Error::NoOperation => "operation node without an operation",
        };
        f.write_str(repr)
    }
}
