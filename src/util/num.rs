/// Largest unsigned integer exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_U64_INT: u64 = 9_007_199_254_740_991;

/// Safely converts an `i64` to `f64` if and only if it is exactly
/// representable.
///
/// ## Errors
/// Returns `Err(error)` if the value exceeds `MAX_SAFE_U64_INT` in absolute
/// value.
///
/// ## Example
/// ```
/// use peridot::util::num::{MAX_SAFE_U64_INT, i64_to_f64_checked};
///
/// let result = i64_to_f64_checked(42, "too big!");
/// assert_eq!(result.unwrap(), 42.0);
///
/// let big = MAX_SAFE_U64_INT as i64 + 1;
/// assert!(i64_to_f64_checked(big, "too big!").is_err());
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn i64_to_f64_checked<E>(value: i64, error: E) -> Result<f64, E> {
    if value.unsigned_abs() > MAX_SAFE_U64_INT {
        return Err(error);
    }
    Ok(value as f64)
}

/// Truncates an `f64` toward zero, returning `None` for non-finite or
/// out-of-range values.
///
/// ## Example
/// ```
/// use peridot::util::num::f64_to_i64_truncated;
///
/// assert_eq!(f64_to_i64_truncated(3.9), Some(3));
/// assert_eq!(f64_to_i64_truncated(-3.9), Some(-3));
/// assert_eq!(f64_to_i64_truncated(f64::NAN), None);
/// assert_eq!(f64_to_i64_truncated(1e20), None);
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
pub fn f64_to_i64_truncated(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    let truncated = value.trunc();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return None;
    }
    Some(truncated as i64)
}

/// Raises `base` to a non-negative `exponent`, returning `None` on overflow
/// or when `exponent` is negative.
///
/// ## Example
/// ```
/// use peridot::util::num::checked_int_pow;
///
/// assert_eq!(checked_int_pow(2, 9), Some(512));
/// assert_eq!(checked_int_pow(-3, 3), Some(-27));
/// assert_eq!(checked_int_pow(2, 64), None);
/// assert_eq!(checked_int_pow(2, -1), None);
/// ```
pub fn checked_int_pow(base: i64, exponent: i64) -> Option<i64> {
    let exponent = u32::try_from(exponent).ok()?;
    base.checked_pow(exponent)
}

/// Resolves a possibly negative index against a sequence of length `len`.
///
/// Negative indices count from the end.
///
/// ## Example
/// ```
/// use peridot::util::num::normalize_index;
///
/// assert_eq!(normalize_index(0, 3), Some(0));
/// assert_eq!(normalize_index(-1, 3), Some(2));
/// assert_eq!(normalize_index(3, 3), None);
/// assert_eq!(normalize_index(-4, 3), None);
/// ```
pub fn normalize_index(index: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let resolved = if index < 0 { index.checked_add(len)? } else { index };
    if (0..len).contains(&resolved) {
        usize::try_from(resolved).ok()
    } else {
        None
    }
}

/// Converts a length to an `i64`, saturating on (theoretical) overflow.
#[must_use]
pub fn len_to_i64(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}

/// Formats a float so that integral values keep a trailing `.0`.
///
/// ## Example
/// ```
/// use peridot::util::num::format_float;
///
/// assert_eq!(format_float(2.0), "2.0");
/// assert_eq!(format_float(0.25), "0.25");
/// assert_eq!(format_float(f64::INFINITY), "inf");
/// ```
#[must_use]
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
