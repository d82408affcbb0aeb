//! Range-checked numeric casts and locale-independent string parsing.
//!
//! Both helpers are total: values that do not fit, or text that does not
//! parse completely, degrade to a default instead of returning an error.
//!
//! | input                              | integer target | float target |
//! |------------------------------------|----------------|--------------|
//! | well-formed, in range              | value          | value        |
//! | well-formed, out of range          | `0`            | `NaN`        |
//! | trailing characters, empty, junk   | `0`            | `0.0`        |
//!
//! # Example
//! ```rust
//! use dbaccount_core::conversion::{checked_cast, string_cast};
//!
//! assert_eq!(checked_cast::<u8, _>(300_i32), 0);
//! assert_eq!(string_cast::<u16>("8080"), 8080);
//! assert_eq!(string_cast::<i32>("12abc"), 0);
//! assert!(string_cast::<f64>("1e999").is_nan());
//! ```

use num_traits::{Bounded, NumCast, ToPrimitive};
use std::str::FromStr;

/// Converts `value` into `T`, returning `T::default()` when it does not fit.
///
/// The value must lie within `T`'s lowest and highest value, so infinities
/// and fractional overshoot (`2147483647.5` into `i32`) yield the default.
/// In-range float-to-integer conversions truncate toward zero.
pub fn checked_cast<T, K>(value: K) -> T
where
    T: NumCast + Bounded + Default,
    K: ToPrimitive + Copy,
{
    try_checked_cast(value).unwrap_or_default()
}

/// Like [`checked_cast`] but reports out-of-range values as `None`.
pub fn try_checked_cast<T, K>(value: K) -> Option<T>
where
    T: NumCast + Bounded,
    K: ToPrimitive + Copy,
{
    if exceeds_bounds::<T, K>(&value) {
        return None;
    }
    T::from(value)
}

/// Compares through `f64`; rounding is monotonic, so a value inside the
/// bounds is never rejected here and exact integer range checks are left to
/// `NumCast`.
fn exceeds_bounds<T: Bounded + ToPrimitive, K: ToPrimitive>(value: &K) -> bool {
    let (Some(source), Some(lowest), Some(highest)) = (
        value.to_f64(),
        T::min_value().to_f64(),
        T::max_value().to_f64(),
    ) else {
        return false;
    };
    source > highest || source < lowest
}

/// Parses `text` as `T` with no partial-parse tolerance.
///
/// See the module documentation for the accepted syntax and the fallback
/// values.
pub fn string_cast<T: StringCast>(text: &str) -> T {
    T::string_cast(text)
}

/// Parses `text` as `T`, returning `None` where [`string_cast`] would fall
/// back to zero or `NaN`.
pub fn try_string_cast<T: StringCast>(text: &str) -> Option<T> {
    T::try_string_cast(text)
}

/// Numeric types that [`string_cast`] can produce.
pub trait StringCast: Sized {
    /// Strict parse; `None` on malformed, trailing or out-of-range input.
    fn try_string_cast(text: &str) -> Option<Self>;

    /// Parses `text`, falling back to zero or `NaN` as documented on
    /// [`string_cast`].
    fn string_cast(text: &str) -> Self;
}

/// Accepts `-?[0-9]+` for signed targets and `[0-9]+` for unsigned ones.
fn parse_integer<T: FromStr>(text: &str, signed: bool) -> Option<T> {
    let digits = if signed {
        text.strip_prefix('-').unwrap_or(text)
    } else {
        text
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    // Syntax is already checked, so an error here is an overflow
    text.parse().ok()
}

macro_rules! impl_string_cast_native {
    ($($ty:ty => $signed:expr),* $(,)?) => {
        $(
            impl StringCast for $ty {
                fn try_string_cast(text: &str) -> Option<Self> {
                    parse_integer::<$ty>(text, $signed)
                }

                fn string_cast(text: &str) -> Self {
                    Self::try_string_cast(text).unwrap_or_default()
                }
            }
        )*
    };
}

macro_rules! impl_string_cast_via {
    ($($ty:ty => $wide:ty, $signed:expr),* $(,)?) => {
        $(
            impl StringCast for $ty {
                fn try_string_cast(text: &str) -> Option<Self> {
                    parse_integer::<$wide>(text, $signed).and_then(try_checked_cast::<Self, $wide>)
                }

                fn string_cast(text: &str) -> Self {
                    Self::try_string_cast(text).unwrap_or_default()
                }
            }
        )*
    };
}

impl_string_cast_native! {
    i64 => true,
    u64 => false,
    isize => true,
    usize => false,
}

// Narrow types go through an `i32` parse and a range check, `u32` through `u64`.
impl_string_cast_via! {
    i8 => i32, true,
    i16 => i32, true,
    i32 => i32, true,
    u8 => i32, true,
    u16 => i32, true,
    u32 => u64, false,
}

/// Outcome of a strict floating-point parse.
#[derive(Debug, Clone, Copy, PartialEq)]
enum FloatParse<F> {
    Value(F),
    OutOfRange,
    Invalid,
}

fn is_special_float(body: &str) -> bool {
    ["inf", "infinity", "nan"]
        .iter()
        .any(|special| body.eq_ignore_ascii_case(special))
}

fn all_digits(part: &str) -> bool {
    part.bytes().all(|b| b.is_ascii_digit())
}

/// Validates decimal float syntax and reports whether any mantissa digit is
/// non-zero.
fn decimal_float_syntax(body: &str) -> Option<bool> {
    let (mantissa, exponent) = match body.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (body, None),
    };

    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !all_digits(whole) || !all_digits(fraction) {
        return None;
    }

    if let Some(exponent) = exponent {
        let exponent_digits = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
        if exponent_digits.is_empty() || !all_digits(exponent_digits) {
            return None;
        }
    }

    Some(whole.bytes().chain(fraction.bytes()).any(|b| b != b'0'))
}

fn parse_float<F>(text: &str) -> FloatParse<F>
where
    F: FromStr + num_traits::Float,
{
    let body = text.strip_prefix('-').unwrap_or(text);

    if is_special_float(body) {
        return text.parse().map_or(FloatParse::Invalid, FloatParse::Value);
    }

    let Some(nonzero_mantissa) = decimal_float_syntax(body) else {
        return FloatParse::Invalid;
    };

    match text.parse::<F>() {
        Ok(value) if value.is_infinite() => FloatParse::OutOfRange,
        Ok(value) if value.is_zero() && nonzero_mantissa => FloatParse::OutOfRange,
        Ok(value) => FloatParse::Value(value),
        Err(_) => FloatParse::Invalid,
    }
}

macro_rules! impl_string_cast_float {
    ($($ty:ty),*) => {
        $(
            impl StringCast for $ty {
                fn try_string_cast(text: &str) -> Option<Self> {
                    match parse_float::<$ty>(text) {
                        FloatParse::Value(value) => Some(value),
                        FloatParse::OutOfRange | FloatParse::Invalid => None,
                    }
                }

                fn string_cast(text: &str) -> Self {
                    match parse_float::<$ty>(text) {
                        FloatParse::Value(value) => value,
                        FloatParse::OutOfRange => <$ty>::NAN,
                        FloatParse::Invalid => 0.0,
                    }
                }
            }
        )*
    };
}

impl_string_cast_float!(f32, f64);
