//! Property tests for the numeric conversion helpers.

use dbaccount_core::conversion::{checked_cast, string_cast, try_checked_cast, try_string_cast};
use proptest::prelude::*;

proptest! {
    #[test]
    fn integers_parse_their_own_rendering(a in any::<i8>(), b in any::<i16>(), c in any::<i32>(), d in any::<i64>()) {
        prop_assert_eq!(string_cast::<i8>(&a.to_string()), a);
        prop_assert_eq!(string_cast::<i16>(&b.to_string()), b);
        prop_assert_eq!(string_cast::<i32>(&c.to_string()), c);
        prop_assert_eq!(string_cast::<i64>(&d.to_string()), d);
    }

    #[test]
    fn unsigned_parse_their_own_rendering(a in any::<u8>(), b in any::<u16>(), c in any::<u32>(), d in any::<u64>()) {
        prop_assert_eq!(string_cast::<u8>(&a.to_string()), a);
        prop_assert_eq!(string_cast::<u16>(&b.to_string()), b);
        prop_assert_eq!(string_cast::<u32>(&c.to_string()), c);
        prop_assert_eq!(string_cast::<u64>(&d.to_string()), d);
    }

    #[test]
    fn finite_doubles_parse_their_own_rendering(x in any::<f64>().prop_filter("finite", |x| x.is_finite())) {
        prop_assert_eq!(string_cast::<f64>(&x.to_string()), x);
    }

    #[test]
    fn finite_floats_parse_their_own_rendering(x in any::<f32>().prop_filter("finite", |x| x.is_finite())) {
        prop_assert_eq!(string_cast::<f32>(&x.to_string()), x);
        prop_assert_eq!(try_string_cast::<f32>(&x.to_string()), Some(x));
    }

    #[test]
    fn pointer_sized_parse_their_own_rendering(a in any::<isize>(), b in any::<usize>()) {
        prop_assert_eq!(string_cast::<isize>(&a.to_string()), a);
        prop_assert_eq!(string_cast::<usize>(&b.to_string()), b);
        prop_assert_eq!(try_string_cast::<usize>(&format!("-{}", b.max(1))), None);
    }

    #[test]
    fn pointer_sized_overflow_yields_zero(digit in 0_u8..10) {
        prop_assert_eq!(string_cast::<isize>(&format!("{}{}", isize::MAX, digit)), 0);
        prop_assert_eq!(string_cast::<isize>(&format!("{}{}", isize::MIN, digit)), 0);
        prop_assert_eq!(string_cast::<usize>(&format!("{}{}", usize::MAX, digit)), 0);
    }

    #[test]
    fn narrowing_out_of_range_yields_zero(x in any::<i32>()) {
        let narrowed = checked_cast::<i8, _>(x);
        if i8::try_from(x).is_ok() {
            prop_assert_eq!(i32::from(narrowed), x);
        } else {
            prop_assert_eq!(narrowed, 0);
            prop_assert_eq!(string_cast::<i8>(&x.to_string()), 0);
        }
    }

    #[test]
    fn checked_cast_agrees_with_try_from(x in any::<i64>()) {
        prop_assert_eq!(try_checked_cast::<u32, _>(x), u32::try_from(x).ok());
        prop_assert_eq!(checked_cast::<u16, _>(x), u16::try_from(x).unwrap_or(0));
    }

    #[test]
    fn trailing_garbage_is_rejected(x in any::<i32>(), suffix in "[a-zA-Z ]{1,4}") {
        let text = format!("{}{}", x, suffix);
        prop_assert_eq!(string_cast::<i32>(&text), 0);
        prop_assert_eq!(try_string_cast::<i64>(&text), None);
        prop_assert_eq!(string_cast::<f64>(&text), 0.0);
    }

    #[test]
    fn u64_overflow_yields_zero(x in any::<u64>(), digit in 0_u8..10) {
        let text = format!("{}{}", u64::MAX, digit);
        prop_assert_eq!(string_cast::<u64>(&text), 0);
        prop_assert_eq!(string_cast::<u64>(&x.to_string()), x);
    }
}
