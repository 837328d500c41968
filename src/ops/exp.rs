//! Exponential kernel.

use crate::common::consts::ONE;
use crate::common::consts::TWO;
use crate::defs::Error;
use crate::defs::Exponent;
use crate::defs::RoundingMode;
use crate::num::DigitNumber;
use crate::ops::series::err_bound;
use crate::ops::series::series_sum;
use crate::ops::series::TermGen;

// Terms of exp(y): y^n / n!.
struct ExpTermGen {
    term: DigitNumber,
    y: DigitNumber,
    n: u64,
}

impl TermGen for ExpTermGen {
    fn next(&mut self, wp: usize) -> Result<DigitNumber, Error> {
        self.n += 1;
        self.term = self
            .term
            .mul(&self.y)
            .divide(&DigitNumber::from_u64(self.n), wp, RoundingMode::Down)?;
        Ok(self.term.clone())
    }
}

/// Computes `exp(x)` to `p` digits. The result is not greater than the
/// true value for [`RoundingMode::Down`] and not less for
/// [`RoundingMode::Up`].
///
/// The argument is reduced by halving until it is below 1/2, the series
/// runs with an explicit error budget, and a squaring ladder on the
/// budget-shifted pair restores the value.
pub(crate) fn exp(x: &DigitNumber, p: usize, rm: RoundingMode) -> Result<DigitNumber, Error> {
    if x.is_zero() {
        return Ok(ONE.clone());
    }
    if x.sign().is_negative() {
        // exp(-y) = 1 / exp(y), with the direction flipped by the
        // reciprocal
        let y = exp(&x.abs(), p + 2, rm.invert())?;
        return ONE.divide(&y, p, rm);
    }

    // 2^k > 2 * B^e >= 2 * x
    let e = x.exponent();
    let k = if e > 0 { (4 * e + 1) as usize } else { 1 };
    let wp = p + k / 3 + 8;

    let pow2k = TWO.int_pow(&DigitNumber::from_u64(k as u64));
    let y = x.divide(&pow2k, wp, RoundingMode::Down)?;

    let first = ONE.add(&y);
    let mut gen = ExpTermGen {
        term: y.clone(),
        y,
        n: 1,
    };
    let thr = -((p + 4) as Exponent);
    let (s, niter) = series_sum(first, &mut gen, wp, thr)?;

    let eps = err_bound(3 * niter as u64 + 16, 1 - wp as Exponent).add(&err_bound(4, thr));
    let mut lo = s.sub(&eps);
    let mut hi = s.add(&eps);
    for _ in 0..k {
        lo = lo.mul(&lo).truncate(wp, RoundingMode::Down);
        hi = hi.mul(&hi).truncate(wp, RoundingMode::Up);
    }

    Ok(match rm {
        RoundingMode::Down => lo.truncate(p, rm),
        RoundingMode::Up => hi.truncate(p, rm),
    })
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::defs::Sign;

    fn to_f64(x: &DigitNumber) -> f64 {
        format!("{}", x).parse().unwrap()
    }

    fn check_encloses(x: f64, num: &DigitNumber, p: usize, tol: f64) {
        let lo = exp(num, p, RoundingMode::Down).unwrap();
        let hi = exp(num, p, RoundingMode::Up).unwrap();
        assert!(lo <= hi);
        let t = x.exp();
        assert!(to_f64(&lo) <= t, "exp({}) lower bound {} above {}", x, lo, t);
        assert!(to_f64(&hi) >= t, "exp({}) upper bound {} below {}", x, hi, t);
        assert!(to_f64(&hi) - to_f64(&lo) < tol);
    }

    #[test]
    fn test_exp_enclosure() {
        check_encloses(1.0, &DigitNumber::from_u64(1), 12, 1e-8);
        check_encloses(0.5, &DigitNumber::from_parts(&[5], 0, Sign::Pos), 12, 1e-8);
        check_encloses(-1.0, &DigitNumber::from_i64(-1), 12, 1e-8);
        check_encloses(
            -2.5,
            &DigitNumber::from_parts(&[2, 5], 1, Sign::Neg),
            12,
            1e-8,
        );
        check_encloses(7.0, &DigitNumber::from_u64(7), 12, 1e-5);
        check_encloses(
            0.001,
            &DigitNumber::from_parts(&[1], -2, Sign::Pos),
            12,
            1e-10,
        );
    }

    #[test]
    fn test_exp_zero() {
        let r = exp(&DigitNumber::zero(), 5, RoundingMode::Down).unwrap();
        assert_eq!(r, DigitNumber::from_u64(1));
    }
}
