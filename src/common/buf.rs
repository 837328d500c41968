//! Buffer for holding the digits of a number.

use crate::defs::Digit;
use core::ops::Deref;
use core::ops::DerefMut;

use smallvec::SmallVec;

/// Buffer for holding the digits of a number, most significant digit first.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct DigitBuf {
    inner: SmallVec<[Digit; 16]>,
}

impl DigitBuf {
    /// New empty buffer.
    #[inline]
    pub fn new() -> Self {
        DigitBuf {
            inner: SmallVec::new(),
        }
    }

    /// New buffer holding a copy of `digits`.
    #[inline]
    pub fn from_slice(digits: &[Digit]) -> Self {
        DigitBuf {
            inner: SmallVec::from_slice(digits),
        }
    }

    /// New buffer taking ownership of `digits`.
    #[inline]
    pub fn from_vec(digits: Vec<Digit>) -> Self {
        DigitBuf {
            inner: SmallVec::from_vec(digits),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[inline]
    pub fn push(&mut self, d: Digit) {
        self.inner.push(d);
    }

    /// Prepends a most significant digit.
    #[inline]
    pub fn push_front(&mut self, d: Digit) {
        self.inner.insert(0, d);
    }

    /// Keep only the `n` most significant digits.
    pub fn trunc_to(&mut self, n: usize) {
        self.inner.truncate(n);
    }

    /// Remove leading digits containing zeroes, returning how many were
    /// removed.
    pub fn trunc_leading_zeroes(&mut self) -> usize {
        let n = self.inner.iter().take_while(|&&d| d == 0).count();
        if n > 0 {
            self.inner.drain(..n);
        }
        n
    }

    /// Remove trailing digits containing zeroes.
    pub fn trunc_trailing_zeroes(&mut self) {
        let n = self.inner.iter().rev().take_while(|&&d| d == 0).count();
        if n > 0 {
            let l = self.inner.len();
            self.inner.truncate(l - n);
        }
    }
}

impl Default for DigitBuf {
    fn default() -> Self {
        DigitBuf::new()
    }
}

impl Deref for DigitBuf {
    type Target = [Digit];

    #[inline]
    fn deref(&self) -> &[Digit] {
        &self.inner
    }
}

impl DerefMut for DigitBuf {
    #[inline]
    fn deref_mut(&mut self) -> &mut [Digit] {
        &mut self.inner
    }
}
