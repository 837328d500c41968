//! Series accumulation shared by the kernels.
//!
//! Every kernel follows the same discipline: run the series at a working
//! precision `wp` with a few guard digits, truncate each freshly produced
//! term and the accumulator back to `wp` digits, and account for every
//! truncation plus the series tail in an explicit error budget. The caller
//! shifts the accumulated sum by the budget in the rounding direction, so
//! the returned bound provably encloses the true value.

use crate::common::consts::ONE;
use crate::defs::Error;
use crate::defs::Exponent;
use crate::defs::RoundingMode;
use crate::defs::Sign;
use crate::num::DigitNumber;

/// Generator of consecutive series terms.
pub(crate) trait TermGen {
    /// Produces the next term at working precision `wp`.
    fn next(&mut self, wp: usize) -> Result<DigitNumber, Error>;
}

/// Adds terms to `first` until a term's magnitude drops to `B^thr` or
/// below. Returns the accumulated sum and the number of terms consumed.
pub(crate) fn series_sum<G: TermGen>(
    first: DigitNumber,
    gen: &mut G,
    wp: usize,
    thr: Exponent,
) -> Result<(DigitNumber, usize), Error> {
    let mut acc = first;
    let mut niter = 0usize;
    loop {
        let t = gen.next(wp)?;
        niter += 1;
        if t.is_zero() || t.exponent() <= thr {
            break;
        }
        acc = acc.add(&t).truncate(wp, RoundingMode::Down);
    }
    Ok((acc, niter))
}

/// `B^k` as a number.
pub(crate) fn base_pow(k: Exponent) -> DigitNumber {
    DigitNumber::from_parts(&[1], k + 1, Sign::Pos)
}

/// `count * B^k` as a number, the shape every error budget takes.
pub(crate) fn err_bound(count: u64, k: Exponent) -> DigitNumber {
    DigitNumber::from_u64(count.max(1)).scale(k)
}

// Terms of atanh(t): t^(2n+1) / (2n+1).
struct AtanhTermGen {
    pow: DigitNumber,
    t2: DigitNumber,
    n: u64,
}

impl TermGen for AtanhTermGen {
    fn next(&mut self, wp: usize) -> Result<DigitNumber, Error> {
        self.pow = self.pow.mul(&self.t2).truncate(wp, RoundingMode::Down);
        self.n += 2;
        self.pow.divide(&DigitNumber::from_u64(self.n), wp, RoundingMode::Down)
    }
}

/// Partial sum of `atanh(t) = t + t^3/3 + t^5/5 + ...` for `0 <= t < 1/2`.
pub(crate) fn atanh_series(
    t: &DigitNumber,
    wp: usize,
    thr: Exponent,
) -> Result<(DigitNumber, usize), Error> {
    if t.is_zero() {
        return Ok((DigitNumber::zero(), 0));
    }
    let t2 = t.mul(t).truncate(wp, RoundingMode::Down);
    let mut gen = AtanhTermGen {
        pow: t.clone(),
        t2,
        n: 1,
    };
    series_sum(t.clone(), &mut gen, wp, thr)
}

// Terms of atan(t): (-1)^n * t^(2n+1) / (2n+1).
struct AtanTermGen {
    pow: DigitNumber,
    t2neg: DigitNumber,
    n: u64,
}

impl TermGen for AtanTermGen {
    fn next(&mut self, wp: usize) -> Result<DigitNumber, Error> {
        self.pow = self.pow.mul(&self.t2neg).truncate(wp, RoundingMode::Down);
        self.n += 2;
        self.pow.divide(&DigitNumber::from_u64(self.n), wp, RoundingMode::Down)
    }
}

/// Partial sum of `atan(1/d) = 1/d - 1/(3 d^3) + 1/(5 d^5) - ...` for an
/// integer `d > 1`.
pub(crate) fn atan_inv_series(
    d: &DigitNumber,
    wp: usize,
    thr: Exponent,
) -> Result<(DigitNumber, usize), Error> {
    let t = ONE.divide(d, wp, RoundingMode::Down)?;
    let t2neg = t.mul(&t).truncate(wp, RoundingMode::Down).neg();
    let mut gen = AtanTermGen {
        pow: t.clone(),
        t2neg,
        n: 1,
    };
    series_sum(t, &mut gen, wp, thr)
}
