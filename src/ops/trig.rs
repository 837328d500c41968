//! Joint sine/cosine kernel.

use crate::common::consts::ONE;
use crate::defs::Error;
use crate::defs::Exponent;
use crate::defs::RoundingMode;
use crate::num::DigitNumber;
use crate::ops::consts::with_consts;
use crate::ops::series::base_pow;
use crate::ops::series::err_bound;

/// Computes `(sin(x), cos(x))` to `p` digits. Both results are not greater
/// than the true values for [`RoundingMode::Down`] and not less for
/// [`RoundingMode::Up`].
///
/// The argument is reduced modulo 2*pi against a directed enclosure of the
/// constant; the reduction error enters the budget scaled by the quotient,
/// since sine and cosine are 1-Lipschitz.
pub(crate) fn sin_cos(
    x: &DigitNumber,
    p: usize,
    rm: RoundingMode,
) -> Result<(DigitNumber, DigitNumber), Error> {
    let wp = p + x.exponent().max(0) as usize + 12;

    let (two_pi_lo, _) = with_consts(|c| c.two_pi_pair(wp))?;
    let (r, red_err_exp) = if x.abs() < two_pi_lo {
        (x.clone(), None)
    } else {
        let qp = x.exponent().max(1) as usize + 2;
        let q = x.divide(&two_pi_lo, qp, RoundingMode::Down)?.floor();
        let r = x.sub(&q.mul(&two_pi_lo));
        (r, Some(q.exponent() + 4 - wp as Exponent))
    };

    // joint series; both terms share the step factor -r^2
    let r2neg = r.mul(&r).truncate(wp, RoundingMode::Down).neg();
    let thr = -((p + 4) as Exponent);

    let mut sin_acc = r.clone();
    let mut sin_term = r;
    let mut cos_acc = ONE.clone();
    let mut cos_term = ONE.clone();
    let mut n_sin: u64 = 1;
    let mut n_cos: u64 = 0;
    let mut sin_done = sin_term.is_zero();
    let mut cos_done = false;
    let mut niter: u64 = 0;

    while !(sin_done && cos_done) {
        if !sin_done {
            sin_term = sin_term.mul(&r2neg).truncate(wp, RoundingMode::Down).divide(
                &DigitNumber::from_u64((n_sin + 1) * (n_sin + 2)),
                wp,
                RoundingMode::Down,
            )?;
            n_sin += 2;
            if sin_term.is_zero() || sin_term.exponent() <= thr {
                sin_done = true;
            } else {
                sin_acc = sin_acc.add(&sin_term).truncate(wp, RoundingMode::Down);
            }
        }
        if !cos_done {
            cos_term = cos_term.mul(&r2neg).truncate(wp, RoundingMode::Down).divide(
                &DigitNumber::from_u64((n_cos + 1) * (n_cos + 2)),
                wp,
                RoundingMode::Down,
            )?;
            n_cos += 2;
            if cos_term.is_zero() || cos_term.exponent() <= thr {
                cos_done = true;
            } else {
                cos_acc = cos_acc.add(&cos_term).truncate(wp, RoundingMode::Down);
            }
        }
        niter += 1;
    }

    let mut eps = err_bound(6 * niter + 16, 6 - wp as Exponent).add(&err_bound(4, thr));
    if let Some(k) = red_err_exp {
        eps = eps.add(&base_pow(k));
    }

    Ok(match rm {
        RoundingMode::Down => (
            sin_acc.sub(&eps).truncate(p, rm),
            cos_acc.sub(&eps).truncate(p, rm),
        ),
        RoundingMode::Up => (
            sin_acc.add(&eps).truncate(p, rm),
            cos_acc.add(&eps).truncate(p, rm),
        ),
    })
}
