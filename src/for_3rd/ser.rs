//! Serialization of DigitNumber.
//! Serialization to a string uses decimal notation.

use crate::num::DigitNumber;
use serde::{Serialize, Serializer};

impl Serialize for DigitNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::to_string;

    use crate::defs::Sign;
    use crate::num::DigitNumber;

    #[test]
    fn to_json() {
        assert_eq!(to_string(&DigitNumber::zero()).unwrap(), "\"0\"");
        assert_eq!(
            to_string(&DigitNumber::from_parts(&[3, 6, 1], 1, Sign::Neg)).unwrap(),
            "\"-3.61\""
        );
    }
}
