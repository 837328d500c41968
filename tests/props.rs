//! Property-based tests for the refinement invariants.

use proptest::prelude::*;

use creal::{DigitNumber, Real};

// Strategy for small non-zero integers
fn non_zero_int() -> impl Strategy<Value = i64> {
    prop_oneof![(-10000i64..=-1i64), (1i64..=10000i64)]
}

// Two-decimal fixed point value v / 100 as a Real and as a DigitNumber
fn centi(v: i64) -> (Real, DigitNumber) {
    let n = DigitNumber::from_i64(v);
    let d = DigitNumber::from_u64(100);
    let num = n.divide(&d, 20, creal::RoundingMode::Down).unwrap();
    let s = format!("{}", num);
    (s.parse().unwrap(), num)
}

proptest! {

    #[test]
    fn addition_commutes_exactly(a in -10000i64..10000, b in -10000i64..10000) {
        let (ra, _) = centi(a);
        let (rb, _) = centi(b);
        let mut ab = (&ra + &rb).precision_iter().unwrap();
        let mut ba = (&rb + &ra).precision_iter().unwrap();
        for _ in 0..4 {
            prop_assert_eq!(ab.interval(), ba.interval());
            ab.advance().unwrap();
            ba.advance().unwrap();
        }
    }

    #[test]
    fn multiplication_is_sound_and_nested(a in -10000i64..10000, b in -10000i64..10000) {
        let (ra, na) = centi(a);
        let (rb, nb) = centi(b);
        let exact = na.mul(&nb);

        let mut it = (&ra * &rb).precision_iter().unwrap();
        let mut prev = it.interval().clone();
        prop_assert!(prev.lower <= exact && exact <= prev.upper);
        for _ in 0..5 {
            it.advance().unwrap();
            let cur = it.interval().clone();
            prop_assert!(cur.lower <= exact && exact <= cur.upper);
            prop_assert!(prev.encloses(&cur));
            prev = cur;
        }
    }

    #[test]
    fn multiplication_sign_rule(a in non_zero_int(), b in non_zero_int()) {
        let (ra, _) = centi(a);
        let (rb, _) = centi(b);
        // refine until the product interval leaves zero behind
        let it = (&ra * &rb).enclosure(8).unwrap();
        let positive = (a > 0) == (b > 0);
        prop_assert_eq!(it.is_positive(), positive);
        prop_assert_eq!(it.is_negative(), !positive);
    }

    #[test]
    fn division_terminates_for_nonzero_divisors(a in -10000i64..10000, b in non_zero_int()) {
        let (ra, na) = centi(a);
        let (rb, nb) = centi(b);
        let q = (&ra / &rb).enclosure(6).unwrap();
        // q * b encloses a
        prop_assert!(q.lower.mul(&nb).min(q.upper.mul(&nb)) <= na);
        prop_assert!(q.lower.mul(&nb).max(q.upper.mul(&nb)) >= na);
    }

    #[test]
    fn subtraction_encloses_exact_difference(a in -10000i64..10000, b in -10000i64..10000) {
        let (ra, na) = centi(a);
        let (rb, nb) = centi(b);
        let exact = na.sub(&nb);
        let i = (&ra - &rb).enclosure(6).unwrap();
        prop_assert!(i.lower <= exact && exact <= i.upper);
    }
}
