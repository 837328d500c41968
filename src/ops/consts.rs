//! Cache of directed enclosures of mathematical constants.

use crate::common::consts::C239;
use crate::common::consts::FIVE;
use crate::common::consts::ONE;
use crate::common::consts::THREE;
use crate::common::consts::TWO;
use crate::defs::Error;
use crate::defs::Exponent;
use crate::defs::RoundingMode;
use crate::num::DigitNumber;
use crate::ops::series::atan_inv_series;
use crate::ops::series::atanh_series;
use crate::ops::series::err_bound;

use core::cell::RefCell;

// Headroom added on top of a requested working precision, so nearby
// requests hit the cache.
const CACHE_SLACK: usize = 8;

/// Directed enclosures of ln(2) and pi, recomputed only when a higher
/// working precision is demanded than the cache holds.
#[derive(Debug)]
pub(crate) struct Consts {
    ln2: Option<(usize, DigitNumber, DigitNumber)>,
    pi: Option<(usize, DigitNumber, DigitNumber)>,
}

impl Consts {
    pub fn new() -> Self {
        Consts {
            ln2: None,
            pi: None,
        }
    }

    /// An enclosure `(lower, upper)` of ln(2), both bounds good to roughly
    /// `wp` digits.
    pub fn ln2_pair(&mut self, wp: usize) -> Result<(DigitNumber, DigitNumber), Error> {
        if let Some((w, lo, hi)) = &self.ln2 {
            if *w >= wp {
                return Ok((lo.clone(), hi.clone()));
            }
        }
        let w = wp + CACHE_SLACK;
        let (lo, hi) = compute_ln2(w)?;
        self.ln2 = Some((w, lo.clone(), hi.clone()));
        Ok((lo, hi))
    }

    /// An enclosure `(lower, upper)` of pi, both bounds good to roughly
    /// `wp` digits.
    pub fn pi_pair(&mut self, wp: usize) -> Result<(DigitNumber, DigitNumber), Error> {
        if let Some((w, lo, hi)) = &self.pi {
            if *w >= wp {
                return Ok((lo.clone(), hi.clone()));
            }
        }
        let w = wp + CACHE_SLACK;
        let (lo, hi) = compute_pi(w)?;
        self.pi = Some((w, lo.clone(), hi.clone()));
        Ok((lo, hi))
    }

    /// An enclosure of 2*pi.
    pub fn two_pi_pair(&mut self, wp: usize) -> Result<(DigitNumber, DigitNumber), Error> {
        let (lo, hi) = self.pi_pair(wp)?;
        Ok((lo.mul(&TWO), hi.mul(&TWO)))
    }
}

thread_local! {
    static CONSTS: RefCell<Consts> = RefCell::new(Consts::new());
}

/// Runs `f` with the thread-local constants cache.
pub(crate) fn with_consts<F, R>(f: F) -> R
where
    F: FnOnce(&mut Consts) -> R,
{
    CONSTS.with(|c| f(&mut c.borrow_mut()))
}

// ln(2) = 2 * atanh(1/3).
fn compute_ln2(wp: usize) -> Result<(DigitNumber, DigitNumber), Error> {
    let t = ONE.divide(&THREE, wp, RoundingMode::Down)?;
    let thr = 2 - wp as Exponent;
    let (s, niter) = atanh_series(&t, wp, thr)?;
    let val = s.mul(&TWO);
    let eps = err_bound(2 * niter as u64 + 16, thr);
    Ok((val.sub(&eps), val.add(&eps)))
}

// Machin's formula: pi = 16 * atan(1/5) - 4 * atan(1/239).
fn compute_pi(wp: usize) -> Result<(DigitNumber, DigitNumber), Error> {
    let thr = 2 - wp as Exponent;
    let (a5, n5) = atan_inv_series(&FIVE, wp, thr)?;
    let (a239, n239) = atan_inv_series(&C239, wp, thr)?;
    let val = a5
        .mul(&DigitNumber::from_u64(16))
        .sub(&a239.mul(&DigitNumber::from_u64(4)));
    let eps = err_bound(16 * (n5 as u64 + 8) + 4 * (n239 as u64 + 8), thr);
    Ok((val.sub(&eps), val.add(&eps)))
}
