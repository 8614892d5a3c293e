//! Numeric conversion helpers centralizing the defensive coercions applied to user input.

use num_traits::cast::cast;

/// Floor a f64 and clamp it to `0..=i64::MAX`, returning 0 for non-finite values.
///
/// Values beyond the `i64` range saturate.
#[must_use]
pub fn to_positive_int(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    let floored = value.floor();
    if floored <= 0.0 {
        return 0;
    }
    cast::<f64, i64>(floored).unwrap_or(i64::MAX)
}

/// Truncate a f64 toward zero, preserving sign, returning 0 for non-finite values.
#[must_use]
pub fn to_int(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    let truncated = value.trunc();
    cast::<f64, i64>(truncated).unwrap_or(if truncated < 0.0 { i64::MIN } else { i64::MAX })
}

/// Clamp an already-integral value to be non-negative.
#[must_use]
pub const fn non_negative(value: i64) -> i64 {
    if value < 0 { 0 } else { value }
}

/// Parse free-form numeric input the way a numeric form field would.
///
/// Blank input reads as zero and anything unparseable becomes NaN, which the
/// coercion helpers above then fold to 0.
#[must_use]
pub fn parse_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_int_floors_and_clamps() {
        assert_eq!(to_positive_int(12.9), 12);
        assert_eq!(to_positive_int(-3.5), 0);
        assert_eq!(to_positive_int(f64::NAN), 0);
        assert_eq!(to_positive_int(f64::INFINITY), 0);
        assert_eq!(to_positive_int(1e300), i64::MAX);
    }

    #[test]
    fn int_truncates_toward_zero() {
        assert_eq!(to_int(-7.8), -7);
        assert_eq!(to_int(7.8), 7);
        assert_eq!(to_int(f64::NEG_INFINITY), 0);
        assert_eq!(to_int(-1e300), i64::MIN);
    }

    #[test]
    fn non_negative_clamps_integers() {
        assert_eq!(non_negative(-4), 0);
        assert_eq!(non_negative(9), 9);
    }

    #[test]
    fn parse_number_matches_form_semantics() {
        assert!((parse_number(" 42 ") - 42.0).abs() < f64::EPSILON);
        assert!((parse_number("") - 0.0).abs() < f64::EPSILON);
        assert!(parse_number("abc").is_nan());
        assert_eq!(to_positive_int(parse_number("abc")), 0);
        assert_eq!(to_int(parse_number("-12.5")), -12);
    }
}
