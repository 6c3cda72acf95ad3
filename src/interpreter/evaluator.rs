/// Binary operator evaluation.
///
/// Arithmetic, comparison and logical operators. Both operands are always
/// evaluated.
pub mod binary;

/// Array, tuple and dictionary literals.
pub mod collection;

/// `return`, `break`, `continue`, conditionals, `switch` and `handler`.
pub mod control;

/// Core evaluation logic.
///
/// Contains the interpreter, the dispatch over node kinds, the signals used
/// for non-local exits and the reserved prelude.
pub mod core;

/// Evaluation of `for` and `while` loops.
///
/// Manages the loop variable and absorbs `break()` and `continue()`.
pub mod for_loop;

/// Function literals, calls, and the built-in functions.
///
/// Handles argument binding, type checks on parameters and return values, and
/// the call depth limit.
pub mod function;

/// The `include` statement.
pub mod include;

/// Prefix operators.
pub mod unary;

/// Variable access, assignment and declaration.
pub mod variable;
