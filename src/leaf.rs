//! Leaf reals: the numbers an expression tree refines at its fringe.

use crate::common::buf::DigitBuf;
use crate::common::util::increment;
use crate::defs::Digit;
use crate::defs::Error;
use crate::defs::Exponent;
use crate::defs::RoundingMode;
use crate::defs::Sign;
use crate::defs::DIGIT_BASE;
use crate::interval::Interval;
use crate::num::DigitNumber;

use core::fmt::Debug;

/// A real number given by a finite digit sequence.
#[derive(Clone, Debug)]
pub(crate) struct ExplicitNumber {
    num: DigitNumber,
}

impl ExplicitNumber {
    pub fn new(num: DigitNumber) -> Self {
        ExplicitNumber { num }
    }

    /// Enclosure from the first `p` digits. Exact once `p` covers the whole
    /// digit sequence.
    pub fn enclosure(&self, p: usize) -> Interval {
        Interval {
            lower: self.num.truncate(p, RoundingMode::Down),
            upper: self.num.truncate(p, RoundingMode::Up),
        }
    }
}

/// A real number given by a digit function: index 0 yields the most
/// significant digit of a possibly infinite stream.
pub(crate) struct AlgorithmNumber {
    digit_at: Box<dyn Fn(usize) -> Digit + Send + Sync>,
    e: Exponent,
    s: Sign,
    max_precision: usize,
}

impl AlgorithmNumber {
    pub fn new(
        digit_at: Box<dyn Fn(usize) -> Digit + Send + Sync>,
        e: Exponent,
        s: Sign,
        max_precision: usize,
    ) -> Self {
        AlgorithmNumber {
            digit_at,
            e,
            s,
            max_precision: max_precision.max(1),
        }
    }

    pub fn max_precision(&self) -> usize {
        self.max_precision
    }

    /// Enclosure from the first `p` digits of the stream. The upper end of
    /// the magnitude range adds one unit at the last read position, since
    /// an unread tail may carry arbitrarily far.
    pub fn enclosure(&self, p: usize) -> Interval {
        let p = p.clamp(1, self.max_precision);
        let digits: Vec<Digit> = (0..p).map(|i| (self.digit_at)(i) % DIGIT_BASE).collect();

        let low_mag = DigitNumber::from_parts(&digits, self.e, Sign::Pos);
        let mut up = DigitBuf::from_vec(digits);
        let mut up_e = self.e;
        if increment(&mut up) {
            up.push_front(1);
            up_e += 1;
        }
        let high_mag = DigitNumber::from_parts(&up, up_e, Sign::Pos);

        match self.s {
            Sign::Pos => Interval {
                lower: low_mag,
                upper: high_mag,
            },
            Sign::Neg => Interval {
                lower: high_mag.neg(),
                upper: low_mag.neg(),
            },
        }
    }
}

impl Debug for AlgorithmNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AlgorithmNumber")
            .field("e", &self.e)
            .field("s", &self.s)
            .field("max_precision", &self.max_precision)
            .finish_non_exhaustive()
    }
}

/// A real number given as a ratio of two integers.
#[derive(Clone, Debug)]
pub(crate) struct RationalNumber {
    num: DigitNumber,
    den: DigitNumber,
}

impl RationalNumber {
    /// ## Errors
    ///
    ///  - DivisionByZero: the denominator is zero.
    pub fn new(num: DigitNumber, den: DigitNumber) -> Result<Self, Error> {
        if den.is_zero() {
            Err(Error::DivisionByZero)
        } else {
            Ok(RationalNumber { num, den })
        }
    }

    /// Enclosure from two directed divisions at precision `p`.
    pub fn enclosure(&self, p: usize) -> Result<Interval, Error> {
        Ok(Interval {
            lower: self.num.divide(&self.den, p, RoundingMode::Down)?,
            upper: self.num.divide(&self.den, p, RoundingMode::Up)?,
        })
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    fn num(d: &[Digit], e: Exponent, s: Sign) -> DigitNumber {
        DigitNumber::from_parts(d, e, s)
    }

    #[test]
    fn test_explicit_enclosure() {
        let x = ExplicitNumber::new(num(&[1, 9], 1, Sign::Pos)); // 1.9
        let i = x.enclosure(1);
        assert_eq!(i.lower, num(&[1], 1, Sign::Pos));
        assert_eq!(i.upper, num(&[2], 1, Sign::Pos));

        // all digits covered: the interval collapses to a point
        let i = x.enclosure(2);
        assert_eq!(i.lower, i.upper);
        assert_eq!(i.lower, num(&[1, 9], 1, Sign::Pos));

        let x = ExplicitNumber::new(num(&[1, 9], 1, Sign::Neg));
        let i = x.enclosure(1);
        assert_eq!(i.lower, num(&[2], 1, Sign::Neg));
        assert_eq!(i.upper, num(&[1], 1, Sign::Neg));
    }

    #[test]
    fn test_algorithm_enclosure() {
        // 1.999...
        let x = AlgorithmNumber::new(
            Box::new(|i| if i == 0 { 1 } else { 9 }),
            1,
            Sign::Pos,
            100,
        );
        let i = x.enclosure(1);
        assert_eq!(i.lower, num(&[1], 1, Sign::Pos));
        assert_eq!(i.upper, num(&[2], 1, Sign::Pos));

        // the carry ripples through the nines
        let i = x.enclosure(3);
        assert_eq!(i.lower, num(&[1, 9, 9], 1, Sign::Pos));
        assert_eq!(i.upper, num(&[2], 1, Sign::Pos));

        // -1.111...
        let x = AlgorithmNumber::new(Box::new(|_| 1), 1, Sign::Neg, 100);
        let i = x.enclosure(2);
        assert_eq!(i.lower, num(&[1, 2], 1, Sign::Neg));
        assert_eq!(i.upper, num(&[1, 1], 1, Sign::Neg));

        // the stream is not read past the leaf's own precision cap
        let x = AlgorithmNumber::new(Box::new(|i| if i < 3 { 5 } else { panic!() }), 0, Sign::Pos, 3);
        let i = x.enclosure(10);
        assert_eq!(i.lower, num(&[5, 5, 5], 0, Sign::Pos));
    }

    #[test]
    fn test_rational_enclosure() {
        let r = RationalNumber::new(DigitNumber::from_u64(1), DigitNumber::from_u64(3)).unwrap();
        let i = r.enclosure(3).unwrap();
        assert_eq!(i.lower, num(&[3, 3, 3], 0, Sign::Pos));
        assert_eq!(i.upper, num(&[3, 3, 4], 0, Sign::Pos));

        let r = RationalNumber::new(DigitNumber::from_i64(-1), DigitNumber::from_u64(4)).unwrap();
        let i = r.enclosure(2).unwrap();
        // -0.25 divides exactly
        assert_eq!(i.lower, i.upper);
        assert_eq!(i.lower, num(&[2, 5], 0, Sign::Neg));

        assert_eq!(
            RationalNumber::new(DigitNumber::from_u64(1), DigitNumber::zero()).err(),
            Some(Error::DivisionByZero)
        );
    }
}
