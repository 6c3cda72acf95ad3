/// Numeric conversion helpers.
///
/// This module provides checked conversions between `i64`, `usize` and `f64`,
/// checked integer exponentiation, sequence index resolution and float
/// formatting. Every fallible helper returns `Option` or `Result` instead of
/// silently wrapping or losing precision.
pub mod num;
