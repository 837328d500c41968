//! Static constants.

use crate::num::DigitNumber;
use lazy_static::lazy_static;

lazy_static! {

    /// 1
    pub(crate) static ref ONE: DigitNumber = DigitNumber::from_u64(1);

    /// 2
    pub(crate) static ref TWO: DigitNumber = DigitNumber::from_u64(2);

    /// 3
    pub(crate) static ref THREE: DigitNumber = DigitNumber::from_u64(3);

    /// 5
    pub(crate) static ref FIVE: DigitNumber = DigitNumber::from_u64(5);

    /// 239, the second base point of the Machin formula.
    pub(crate) static ref C239: DigitNumber = DigitNumber::from_u64(239);
}
