//! # peridot
//!
//! peridot is a tree-walking interpreter for the Peri.dot scripting language.
//! It lexes, parses and evaluates scripts with kind-locked bindings, closures,
//! handler blocks, modules, and diagnostics that trace every error back
//! through the call stack and through the history of the offending value.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use std::path::Path;

use crate::interpreter::{config::Config, evaluator::core::Interpreter, value::core::Value};

/// Defines the structure of parsed code.
///
/// This module declares the [`ast::Node`] type and related definitions that
/// represent the syntactic structure of a program as a tree. The AST is built
/// by the parser and traversed by the evaluator.
///
/// # Responsibilities
/// - Defines node kinds for all language constructs.
/// - Attaches source spans to AST nodes for error reporting.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised during lexing, parsing, or
/// evaluating code, and renders them as the diagnostics shown to users.
///
/// # Responsibilities
/// - Defines error kinds for all failure modes (lexer, parser, evaluator).
/// - Attaches spans, call frames and value origins for context.
/// - Supports integration with standard error handling traits.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation, value
/// representations, scopes and modules to provide a complete runtime for
/// Peri.dot programs.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, and value
///   types.
/// - Provides entry points for parsing and evaluating user code.
/// - Resolves included modules.
pub mod interpreter;
/// Tracing subscriber setup and terminal colour detection for the binary.
pub mod logging;
/// General utilities for safe numeric conversion and helpers.
///
/// This module provides checked conversions between integer and
/// floating-point types and other general-purpose helpers used throughout the
/// interpreter.
pub mod util;

pub use error::Error;

/// Runs `source` with the default configuration.
///
/// `file` is only used to label positions in diagnostics. Returns the value
/// of every top-level statement.
///
/// # Errors
/// Returns the first syntax or runtime error.
///
/// # Examples
/// ```
/// use peridot::{interpreter::value::core::Value, run};
///
/// let values = run("<doc>", "var result = 2 + 2").unwrap();
/// assert_eq!(values[0], Value::int(4));
///
/// // 'x' is not defined
/// assert!(run("<doc>", "var y = x + 1").is_err());
/// ```
pub fn run(file: &str, source: &str) -> Result<Vec<Value>, Error> {
    Interpreter::new(Config::default()).run(file, source)
}

/// Reads and runs the script at `path` with `interpreter`.
///
/// # Errors
/// Returns [`Error::Io`] when the file can not be read, otherwise the first
/// syntax or runtime error.
pub fn run_file(interpreter: &mut Interpreter, path: &Path) -> Result<Vec<Value>, Error> {
    let source = std::fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_path_buf(),
                                                                             source })?;
    interpreter.run(&path.display().to_string(), &source)
}
