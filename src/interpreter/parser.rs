/// Binary operator parsing.
///
/// One function per precedence level, from `and`/`or` down to `^`, all built
/// on a shared left-associative chain helper.
pub mod binary;

/// Code blocks and block-bearing constructs.
///
/// Parses `{ ... }` bodies and everything that owns one: function and lambda
/// literals, `handler`, `if`/`elif`/`else`, `switch`, `for` and `while`.
pub mod block;

/// The token cursor and the program entry point.
///
/// # Responsibilities
/// - Tracks whether line breaks are significant in the current bracket
///   context.
/// - Implements the rule that a rule failing without consuming input is
///   reported as a more general "expected ..." error.
/// - Parses a whole program into a list of statements.
pub mod core;

/// Statements: `return`, `break`, `continue`, `include` and declarations.
pub mod statement;

/// Prefix signs, atoms and the postfix call/index/attribute chain.
pub mod unary;

/// Helpers shared by the parsing functions.
pub mod utils;
