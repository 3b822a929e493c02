/// Converts an integer to the nearest `f64`.
///
/// Integers beyond `2^53` lose precision, which matches how mixed arithmetic
/// promotes integers to floats.
///
/// ## Example
/// ```
/// use ecmalite::util::num::i64_to_f64;
///
/// assert_eq!(i64_to_f64(42), 42.0);
/// ```
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub const fn i64_to_f64(value: i64) -> f64 {
    value as f64
}

/// Truncates a float toward zero, saturating at the `i64` bounds.
///
/// `NaN` maps to `0`.
///
/// ## Example
/// ```
/// use ecmalite::util::num::f64_to_i64_truncated;
///
/// assert_eq!(f64_to_i64_truncated(-2.9), -2);
/// assert_eq!(f64_to_i64_truncated(f64::INFINITY), i64::MAX);
/// ```
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn f64_to_i64_truncated(value: f64) -> i64 {
    value.trunc() as i64
}

/// Converts an integer to an array index; negative values have none.
#[must_use]
pub fn i64_to_index(value: i64) -> Option<usize> {
    usize::try_from(value).ok()
}

/// Truncates a float to an array index.
///
/// Negative and non-finite values have no index.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn f64_to_index(value: f64) -> Option<usize> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(value.trunc() as usize)
}
