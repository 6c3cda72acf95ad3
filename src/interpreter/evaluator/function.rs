/// Built-in function implementations.
///
/// `print`, `range`, `type`, and the raising functions `panic`, `throw` and
/// `assert`.
pub mod builtin;
/// Conversion builtins.
///
/// `str`, `int`, `float`, `bool`, `array` and `tuple`, which double as the
/// type tags of parameter and return declarations.
pub mod convert;

pub mod core;
