//! Natural logarithm kernel.

use crate::common::consts::ONE;
use crate::common::consts::TWO;
use crate::defs::Error;
use crate::defs::Exponent;
use crate::defs::RoundingMode;
use crate::num::DigitNumber;
use crate::ops::consts::with_consts;
use crate::ops::series::atanh_series;
use crate::ops::series::err_bound;

/// Computes `ln(x)` to `p` digits. The result is not greater than the
/// true value for [`RoundingMode::Down`] and not less for
/// [`RoundingMode::Up`].
///
/// The argument is reduced to `x = m * 2^k` with `m` in `[1, 2)`;
/// `ln(m) = 2 * atanh((m - 1) / (m + 1))` with the series argument below
/// 1/3, and `k * ln(2)` comes from the constants cache with the direction
/// flipped for negative `k`.
///
/// ## Errors
///
///  - LogDomain: `x` is zero or negative.
pub(crate) fn log(x: &DigitNumber, p: usize, rm: RoundingMode) -> Result<DigitNumber, Error> {
    if x.is_zero() || x.sign().is_negative() {
        return Err(Error::LogDomain);
    }
    let wp = p + 10;

    let mut m = x.clone();
    let mut k: i64 = 0;
    while m >= *TWO {
        m = m.divide(&TWO, wp, RoundingMode::Down)?;
        k += 1;
    }
    while m < *ONE {
        m = m.mul(&TWO).truncate(wp, RoundingMode::Down);
        k -= 1;
    }

    let t = m.sub(&ONE).divide(&m.add(&ONE), wp, RoundingMode::Down)?;
    let thr = 2 - wp as Exponent;
    let (s, niter) = atanh_series(&t, wp, thr)?;
    let lnm = s.mul(&TWO);

    let eps = err_bound(4 * (niter as u64 + k.unsigned_abs()) + 32, thr);
    let (lo, hi) = if k != 0 {
        let (ln2_lo, ln2_hi) = with_consts(|c| c.ln2_pair(wp))?;
        let kk = DigitNumber::from_i64(k);
        let (klo, khi) = if k > 0 {
            (kk.mul(&ln2_lo), kk.mul(&ln2_hi))
        } else {
            (kk.mul(&ln2_hi), kk.mul(&ln2_lo))
        };
        (klo.add(&lnm.sub(&eps)), khi.add(&lnm.add(&eps)))
    } else {
        (lnm.sub(&eps), lnm.add(&eps))
    };

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
        let lo = log(num, p, RoundingMode::Down).unwrap();
        let hi = log(num, p, RoundingMode::Up).unwrap();
        assert!(lo <= hi);
        let t = x.ln();
        assert!(to_f64(&lo) <= t, "ln({}) lower bound {} above {}", x, lo, t);
        assert!(to_f64(&hi) >= t, "ln({}) upper bound {} below {}", x, hi, t);
        assert!(to_f64(&hi) - to_f64(&lo) < tol);
    }

    #[test]
    fn test_log_enclosure() {
        check_encloses(2.0, &DigitNumber::from_u64(2), 12, 1e-8);
        check_encloses(10.0, &DigitNumber::from_u64(10), 12, 1e-8);
        check_encloses(0.5, &DigitNumber::from_parts(&[5], 0, Sign::Pos), 12, 1e-8);
        check_encloses(
            0.001,
            &DigitNumber::from_parts(&[1], -2, Sign::Pos),
            12,
            1e-8,
        );
        check_encloses(123456.0, &DigitNumber::from_u64(123456), 12, 1e-7);
    }

    #[test]
    fn test_log_one() {
        // ln(1) = 0 exactly up to the error budget
        let lo = log(&DigitNumber::from_u64(1), 10, RoundingMode::Down).unwrap();
        let hi = log(&DigitNumber::from_u64(1), 10, RoundingMode::Up).unwrap();
        assert!(lo.sign().is_negative() || lo.is_zero());
        assert!(hi.sign().is_positive());
        assert!(to_f64(&hi) < 1e-10);
        assert!(to_f64(&lo) > -1e-10);
    }

    #[test]
    fn test_log_domain() {
        assert_eq!(
            log(&DigitNumber::zero(), 5, RoundingMode::Down),
            Err(Error::LogDomain)
        );
        assert_eq!(
            log(&DigitNumber::from_i64(-3), 5, RoundingMode::Down),
            Err(Error::LogDomain)
        );
    }
}
