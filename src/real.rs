//! The public real-number value type.

use crate::defs::Digit;
use crate::defs::Error;
use crate::defs::Exponent;
use crate::defs::Sign;
use crate::defs::DEFAULT_MAX_PRECISION;
use crate::interval::Interval;
use crate::iter::PrecisionIterator;
use crate::leaf::AlgorithmNumber;
use crate::leaf::ExplicitNumber;
use crate::leaf::RationalNumber;
use crate::node::Op;
use crate::node::Term;
use crate::num::DigitNumber;
use crate::parser::parse_decimal;

use core::ops::Add;
use core::ops::Div;
use core::ops::Mul;
use core::ops::Sub;
use core::str::FromStr;
use std::sync::Arc;

/// A real number described by an expression tree over exact leaves.
///
/// A `Real` never computes anything by itself: observing a value goes
/// through [`Real::precision_iter`], which produces a nested chain of
/// enclosing intervals on demand. Cloning is cheap, and combining reals
/// shares their subtrees immutably, so a value reused in several
/// expressions is represented once.
///
/// ```
/// use creal::Real;
///
/// let a: Real = "1.9".parse().unwrap();
/// let sq = &a * &a;
///
/// let mut it = sq.precision_iter().unwrap();
/// it.advance().unwrap();
/// assert_eq!(format!("{}", it.interval()), "[3.61, 3.61]");
/// ```
#[derive(Clone, Debug)]
pub struct Real {
    term: Arc<Term>,
    max_precision: usize,
}

impl Real {
    fn from_term(term: Term, max_precision: usize) -> Self {
        Real {
            term: Arc::new(term),
            max_precision,
        }
    }

    /// A real from an explicit digit sequence, most significant digit
    /// first: the value is `sign * 0.digits * B^exponent`.
    pub fn from_digits(digits: &[Digit], exponent: Exponent, sign: Sign) -> Self {
        let num = DigitNumber::from_parts(digits, exponent, sign);
        Self::from_term(
            Term::Explicit(ExplicitNumber::new(num)),
            DEFAULT_MAX_PRECISION,
        )
    }

    /// A real from an integer.
    pub fn from_int(v: i64) -> Self {
        Self::from_term(
            Term::Explicit(ExplicitNumber::new(DigitNumber::from_i64(v))),
            DEFAULT_MAX_PRECISION,
        )
    }

    /// A real defined by a digit function: `digit_at(i)` yields the digit
    /// at position `i` of a possibly infinite stream, most significant
    /// first. The stream is never read past `max_precision` digits.
    pub fn from_fn<F>(digit_at: F, exponent: Exponent, sign: Sign, max_precision: usize) -> Self
    where
        F: Fn(usize) -> Digit + Send + Sync + 'static,
    {
        Self::from_term(
            Term::Algorithm(AlgorithmNumber::new(
                Box::new(digit_at),
                exponent,
                sign,
                max_precision,
            )),
            DEFAULT_MAX_PRECISION,
        )
    }

    /// A real with the exact value `num / den`.
    ///
    /// ## Errors
    ///
    ///  - DivisionByZero: `den` is zero.
    pub fn from_ratio(num: i64, den: i64) -> Result<Self, Error> {
        let r = RationalNumber::new(DigitNumber::from_i64(num), DigitNumber::from_i64(den))?;
        Ok(Self::from_term(Term::Rational(r), DEFAULT_MAX_PRECISION))
    }

    /// The precision cap used by refinement loops inside division,
    /// logarithm, and the trigonometric operations.
    pub fn max_precision(&self) -> usize {
        self.max_precision
    }

    /// Returns the same real with a different precision cap. The cap must
    /// be set before iteration begins; running iterators are unaffected.
    pub fn with_max_precision(mut self, max_precision: usize) -> Self {
        self.max_precision = max_precision.max(1);
        self
    }

    /// A fresh iterator at precision 1, pre-populated with its first
    /// enclosure.
    ///
    /// ## Errors
    ///
    /// Computing the first enclosure already refines where an operation
    /// demands it, so any refinement error can surface here.
    pub fn precision_iter(&self) -> Result<PrecisionIterator, Error> {
        PrecisionIterator::new(&self.term, self.max_precision)
    }

    /// The enclosure at precision `p`, computed by a throwaway iterator.
    pub fn enclosure(&self, p: usize) -> Result<Interval, Error> {
        let mut it = self.precision_iter()?;
        if p > 1 {
            it.advance_n(p - 1)?;
        }
        Ok(it.interval().clone())
    }

    fn binary(op: Op, lhs: &Real, rhs: &Real) -> Real {
        Real {
            term: Arc::new(Term::Operation {
                op,
                lhs: lhs.term.clone(),
                rhs: Some(rhs.term.clone()),
            }),
            max_precision: lhs.max_precision.max(rhs.max_precision),
        }
    }

    fn unary(op: Op, lhs: &Real) -> Real {
        Real {
            term: Arc::new(Term::Operation {
                op,
                lhs: lhs.term.clone(),
                rhs: None,
            }),
            max_precision: lhs.max_precision,
        }
    }

    /// `self` raised to the power of `exp`. The exponent must refine to a
    /// non-negative integer; the iterator reports
    /// [`Error::NonIntegralExponent`] or [`Error::NegativeIntegerExponent`]
    /// otherwise.
    pub fn pow(&self, exp: &Real) -> Real {
        Real::binary(Op::IntPow, self, exp)
    }

    /// The exponential of `self`.
    pub fn exp(&self) -> Real {
        Real::unary(Op::Exp, self)
    }

    /// The natural logarithm of `self`.
    pub fn ln(&self) -> Real {
        Real::unary(Op::Log, self)
    }

    /// The sine of `self`.
    pub fn sin(&self) -> Real {
        Real::unary(Op::Sin, self)
    }

    /// The cosine of `self`.
    pub fn cos(&self) -> Real {
        Real::unary(Op::Cos, self)
    }

    /// The tangent of `self`.
    pub fn tan(&self) -> Real {
        Real::unary(Op::Tan, self)
    }

    /// The cotangent of `self`.
    pub fn cot(&self) -> Real {
        Real::unary(Op::Cot, self)
    }

    /// The secant of `self`.
    pub fn sec(&self) -> Real {
        Real::unary(Op::Sec, self)
    }

    /// The cosecant of `self`.
    pub fn csc(&self) -> Real {
        Real::unary(Op::Csc, self)
    }
}

impl FromStr for Real {
    type Err = Error;

    /// Parses a decimal literal into an explicit real.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let num = parse_decimal(s)?;
        Ok(Real::from_term(
            Term::Explicit(ExplicitNumber::new(num)),
            DEFAULT_MAX_PRECISION,
        ))
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $op:expr) => {
        impl $trait for &Real {
            type Output = Real;

            fn $method(self, rhs: &Real) -> Real {
                Real::binary($op, self, rhs)
            }
        }

        impl $trait for Real {
            type Output = Real;

            fn $method(self, rhs: Real) -> Real {
                Real::binary($op, &self, &rhs)
            }
        }
    };
}

impl_binary_op!(Add, add, Op::Add);
impl_binary_op!(Sub, sub, Op::Sub);
impl_binary_op!(Mul, mul, Op::Mul);
impl_binary_op!(Div, div, Op::Div);

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_construction_surface() {
        let a: Real = "1.9".parse().unwrap();
        let i = a.enclosure(2).unwrap();
        assert_eq!(i.lower, i.upper);

        assert!("1.9.2".parse::<Real>().is_err());

        let r = Real::from_ratio(1, 3).unwrap();
        let i = r.enclosure(3).unwrap();
        assert!(i.lower < i.upper);

        assert_eq!(Real::from_ratio(1, 0).err(), Some(Error::DivisionByZero));

        let n = Real::from_int(-42);
        let i = n.enclosure(5).unwrap();
        assert_eq!(i.lower, DigitNumber::from_i64(-42));
        assert_eq!(i.upper, DigitNumber::from_i64(-42));
    }

    #[test]
    fn test_max_precision_propagates() {
        let a: Real = "1".parse::<Real>().unwrap().with_max_precision(25);
        let b: Real = "3".parse().unwrap();
        assert_eq!((&a / &b).max_precision(), 25);
        assert_eq!(a.sin().max_precision(), 25);
    }
}
