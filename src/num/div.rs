//! Directed long division and integer exponentiation.

use crate::common::buf::DigitBuf;
use crate::common::consts::ONE;
use crate::common::util::cmp_int;
use crate::common::util::div_int_by_digit;
use crate::common::util::is_all_zero;
use crate::common::util::leading_zeroes;
use crate::common::util::mul_int_by_digit;
use crate::common::util::sub_int;
use crate::defs::Digit;
use crate::defs::Error;
use crate::defs::Exponent;
use crate::defs::RoundingMode;
use crate::defs::DIGIT_BASE;
use crate::num::DigitNumber;

use core::cmp::Ordering;

impl DigitNumber {
    /// Long division producing a quotient of `p` significant digits,
    /// rounded in the direction `rm` when the quotient does not terminate
    /// within `p` digits.
    ///
    /// ## Errors
    ///
    ///  - DivisionByZero: `den` is zero.
    pub fn divide(&self, den: &Self, p: usize, rm: RoundingMode) -> Result<Self, Error> {
        if den.is_zero() {
            return Err(Error::DivisionByZero);
        }
        if self.is_zero() {
            return Ok(Self::zero());
        }
        let p = p.max(1);
        let s = self.s.product(den.s);
        let nd: &[Digit] = &self.m;
        let dd: &[Digit] = &den.m;

        let mut rem: Vec<Digit> = Vec::new();
        let mut q: Vec<Digit> = Vec::new();
        let mut sig = 0usize;
        let mut pos = 0usize;

        // Schoolbook long division: each step appends the next numerator
        // digit (or zero past its end) to the running remainder and finds
        // the largest quotient digit that still fits.
        while sig < p || pos < nd.len() {
            rem.push(if pos < nd.len() { nd[pos] } else { 0 });
            let qd = next_quotient_digit(&rem, dd);
            if qd > 0 {
                rem = sub_int(&rem, &mul_int_by_digit(dd, qd));
            }
            let lz = leading_zeroes(&rem);
            rem.drain(..lz);
            q.push(qd);
            if sig > 0 || qd > 0 {
                sig += 1;
            }
            pos += 1;
        }

        let sticky = !is_all_zero(&rem);
        let z = leading_zeroes(&q);
        let e = self.e - den.e + dd.len() as Exponent - z as Exponent;
        // rounding happens before normalization: a trailing zero in the
        // quotient still names the position the sticky digits round into
        let ret = DigitNumber {
            s,
            e,
            m: DigitBuf::from_slice(&q[z..]),
        };
        Ok(ret.truncate_sticky(p, rm, sticky))
    }

    /// Raises `self` to the power of a non-negative integer exponent by
    /// repeated squaring. The result is exact.
    pub fn int_pow(&self, exp: &Self) -> Self {
        debug_assert!(exp.is_integer() && !(exp.s.is_negative() && !exp.is_zero()));

        // the exponent's digits, padded with the zeroes its exponent implies
        let mut ed: Vec<Digit> = exp.m.to_vec();
        ed.resize(exp.e.max(ed.len() as Exponent) as usize, 0);

        let mut result = ONE.clone();
        let mut sq = self.clone();
        while !is_all_zero(&ed) {
            let (qd, r) = div_int_by_digit(&ed, 2);
            if r == 1 {
                result = result.mul(&sq);
            }
            let lz = leading_zeroes(&qd);
            ed = qd[lz..].to_vec();
            if !is_all_zero(&ed) {
                sq = sq.mul(&sq);
            }
        }
        result
    }
}

// Largest digit q with q * den <= rem, found by binary search so the cost
// stays logarithmic in the base.
fn next_quotient_digit(rem: &[Digit], den: &[Digit]) -> Digit {
    let mut lo: Digit = 0;
    let mut hi: Digit = DIGIT_BASE - 1;
    while lo < hi {
        let mid = (lo + hi + 1) / 2;
        if cmp_int(&mul_int_by_digit(den, mid), rem) != Ordering::Greater {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    lo
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::defs::Sign;
    use rand::random;

    #[test]
    fn test_divide_directed() {
        let one = DigitNumber::from_u64(1);
        let three = DigitNumber::from_u64(3);

        let q = one.divide(&three, 3, RoundingMode::Down).unwrap();
        assert_eq!(q, DigitNumber::from_parts(&[3, 3, 3], 0, Sign::Pos));
        let q = one.divide(&three, 3, RoundingMode::Up).unwrap();
        assert_eq!(q, DigitNumber::from_parts(&[3, 3, 4], 0, Sign::Pos));

        // negative quotients round the other way on the value axis
        let q = one.neg().divide(&three, 3, RoundingMode::Down).unwrap();
        assert_eq!(q, DigitNumber::from_parts(&[3, 3, 4], 0, Sign::Neg));
        let q = one.neg().divide(&three, 3, RoundingMode::Up).unwrap();
        assert_eq!(q, DigitNumber::from_parts(&[3, 3, 3], 0, Sign::Neg));

        // terminating quotients are exact in either direction
        let four = DigitNumber::from_u64(4);
        let two = DigitNumber::from_u64(2);
        assert_eq!(four.divide(&two, 5, RoundingMode::Up).unwrap(), two);
        let eight = DigitNumber::from_u64(8);
        let five = DigitNumber::from_u64(5);
        assert_eq!(
            eight.divide(&five, 8, RoundingMode::Down).unwrap(),
            DigitNumber::from_parts(&[1, 6], 1, Sign::Pos)
        );

        assert_eq!(
            one.divide(&DigitNumber::zero(), 1, RoundingMode::Down),
            Err(Error::DivisionByZero)
        );
    }

    #[test]
    fn test_divide_fractional_operands() {
        // 1.9 / 0.25 = 7.6
        let a = DigitNumber::from_parts(&[1, 9], 1, Sign::Pos);
        let b = DigitNumber::from_parts(&[2, 5], 0, Sign::Pos);
        assert_eq!(
            a.divide(&b, 4, RoundingMode::Down).unwrap(),
            DigitNumber::from_parts(&[7, 6], 1, Sign::Pos)
        );

        // 0.001 / 10 = 0.0001
        let a = DigitNumber::from_parts(&[1], -2, Sign::Pos);
        let b = DigitNumber::from_u64(10);
        assert_eq!(
            a.divide(&b, 4, RoundingMode::Up).unwrap(),
            DigitNumber::from_parts(&[1], -3, Sign::Pos)
        );
    }

    #[test]
    fn test_divide_random() {
        for _ in 0..500 {
            let x = (random::<u32>() % 1000000) as u64;
            let y = (random::<u32>() % 999 + 1) as u64;
            let a = DigitNumber::from_u64(x);
            let b = DigitNumber::from_u64(y);
            let q = a.divide(&b, 20, RoundingMode::Down).unwrap();
            let r = a.divide(&b, 20, RoundingMode::Up).unwrap();
            if x % y == 0 {
                assert_eq!(q, DigitNumber::from_u64(x / y));
                assert_eq!(r, q);
            } else {
                assert!(q <= r);
                assert!(q <= a.divide(&b, 40, RoundingMode::Down).unwrap());
                // the quotient encloses the exact ratio: q * y <= x <= r * y
                assert!(q.mul(&b) <= a);
                assert!(r.mul(&b) >= a);
            }
        }
    }

    #[test]
    fn test_int_pow() {
        let two = DigitNumber::from_u64(2);
        assert_eq!(two.int_pow(&DigitNumber::from_u64(10)), DigitNumber::from_u64(1024));
        assert_eq!(two.int_pow(&DigitNumber::zero()), DigitNumber::from_u64(1));

        let neg3 = DigitNumber::from_i64(-3);
        assert_eq!(neg3.int_pow(&DigitNumber::from_u64(3)), DigitNumber::from_i64(-27));
        assert_eq!(neg3.int_pow(&DigitNumber::from_u64(4)), DigitNumber::from_u64(81));

        // fractional base stays exact
        let half = DigitNumber::from_parts(&[5], 0, Sign::Pos);
        assert_eq!(
            half.int_pow(&DigitNumber::from_u64(3)),
            DigitNumber::from_parts(&[1, 2, 5], 0, Sign::Pos)
        );
    }
}
