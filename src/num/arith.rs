//! Exact addition, subtraction, and multiplication.

use crate::common::buf::DigitBuf;
use crate::defs::Digit;
use crate::defs::DoubleDigit;
use crate::defs::Exponent;
use crate::defs::DIGIT_BASE;
use crate::num::DigitNumber;

use core::cmp::Ordering;

use itertools::izip;

impl DigitNumber {
    /// Exact sum of `self` and `rhs`.
    pub fn add(&self, rhs: &Self) -> Self {
        if self.is_zero() {
            return rhs.clone();
        }
        if rhs.is_zero() {
            return self.clone();
        }
        let mut ret = if self.s == rhs.s {
            let (m, e) = add_abs(self, rhs);
            DigitNumber { s: self.s, e, m }
        } else {
            match self.abs_cmp(rhs) {
                Ordering::Equal => return Self::zero(),
                Ordering::Greater => {
                    let (m, e) = sub_abs(self, rhs);
                    DigitNumber { s: self.s, e, m }
                }
                Ordering::Less => {
                    let (m, e) = sub_abs(rhs, self);
                    DigitNumber { s: rhs.s, e, m }
                }
            }
        };
        ret.normalize();
        ret
    }

    /// Exact difference of `self` and `rhs`.
    pub fn sub(&self, rhs: &Self) -> Self {
        self.add(&rhs.neg())
    }

    /// Exact product of `self` and `rhs`.
    pub fn mul(&self, rhs: &Self) -> Self {
        if self.is_zero() || rhs.is_zero() {
            return Self::zero();
        }
        let (m, e) = mul_abs(self, rhs);
        let mut ret = DigitNumber {
            s: self.s.product(rhs.s),
            e,
            m,
        };
        ret.normalize();
        ret
    }
}

// Position of the least significant digit of `n` on the exponent scale.
fn low_exponent(n: &DigitNumber) -> Exponent {
    n.e - n.m.len() as Exponent
}

// Magnitude sum. Digits of both operands are aligned by their exponents;
// the extra leading slot absorbs the carry.
fn add_abs(a: &DigitNumber, b: &DigitNumber) -> (DigitBuf, Exponent) {
    let hi = a.e.max(b.e);
    let lo = low_exponent(a).min(low_exponent(b));
    let len = (hi - lo) as usize + 1;

    let mut buf = vec![0 as Digit; len];
    for (i, &d) in a.m.iter().enumerate() {
        buf[(hi - a.e) as usize + 1 + i] += d;
    }
    for (i, &d) in b.m.iter().enumerate() {
        buf[(hi - b.e) as usize + 1 + i] += d;
    }

    let mut carry = 0;
    for x in buf.iter_mut().rev() {
        let v = *x + carry;
        *x = v % DIGIT_BASE;
        carry = v / DIGIT_BASE;
    }
    debug_assert_eq!(carry, 0);

    (DigitBuf::from_vec(buf), hi + 1)
}

// Magnitude difference. Requires |a| >= |b|.
fn sub_abs(a: &DigitNumber, b: &DigitNumber) -> (DigitBuf, Exponent) {
    debug_assert!(a.abs_cmp(b) != Ordering::Less);
    let hi = a.e.max(b.e);
    let lo = low_exponent(a).min(low_exponent(b));
    let len = (hi - lo) as usize;

    let mut av = vec![0 as Digit; len];
    for (i, &d) in a.m.iter().enumerate() {
        av[(hi - a.e) as usize + i] = d;
    }
    let mut bv = vec![0 as Digit; len];
    for (i, &d) in b.m.iter().enumerate() {
        bv[(hi - b.e) as usize + i] = d;
    }

    let mut borrow: Digit = 0;
    for (x, &y) in izip!(av.iter_mut().rev(), bv.iter().rev()) {
        let sub = y + borrow;
        if *x >= sub {
            *x -= sub;
            borrow = 0;
        } else {
            *x += DIGIT_BASE - sub;
            borrow = 1;
        }
    }
    debug_assert_eq!(borrow, 0);

    (DigitBuf::from_vec(av), hi)
}

// Magnitude schoolbook product: cross products accumulate in doubled
// digits, a single pass resolves the carries.
fn mul_abs(a: &DigitNumber, b: &DigitNumber) -> (DigitBuf, Exponent) {
    let len = a.m.len() + b.m.len();
    let mut acc = vec![0 as DoubleDigit; len];
    for (i, &da) in a.m.iter().enumerate() {
        for (j, &db) in b.m.iter().enumerate() {
            acc[i + j + 1] += da as DoubleDigit * db as DoubleDigit;
        }
    }

    let mut buf = vec![0 as Digit; len];
    let mut carry: DoubleDigit = 0;
    for (x, &v) in izip!(buf.iter_mut().rev(), acc.iter().rev()) {
        let cur = v + carry;
        *x = (cur % DIGIT_BASE as DoubleDigit) as Digit;
        carry = cur / DIGIT_BASE as DoubleDigit;
    }
    debug_assert_eq!(carry, 0);

    (DigitBuf::from_vec(buf), a.e + b.e)
}
