/// Interpreter settings.
///
/// Module search paths and the call depth limit, passed to
/// [`evaluator::core::Interpreter::new`].
pub mod config;
/// Symbol tables and call frames.
///
/// A [`context::SymbolTable`] is one level of lexical scope; a
/// [`context::Context`] is one frame of the dynamic call stack, kept so that
/// runtime errors can print a traceback.
pub mod context;
/// The evaluator module executes AST nodes and computes results.
///
/// The evaluator traverses the AST, evaluates expressions and statements,
/// manages bindings and call frames, and reports runtime errors together with
/// the frame they were raised in.
///
/// # Responsibilities
/// - Evaluates AST nodes, performing all supported operations.
/// - Handles variables, functions, modules and control flow.
/// - Propagates `return`, `break`, `continue` and errors as signals.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer reads the normalized source text and produces a stream of tokens,
/// each corresponding to a meaningful language element such as a number, an
/// identifier, an operator, a delimiter or a keyword.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with source spans.
/// - Handles numeric and string literals, escapes and comments.
/// - Reports lexical errors for invalid or malformed input.
pub mod lexer;
/// Module resolution and the native modules.
pub mod module;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser processes the token stream produced by the lexer and constructs
/// an AST that represents the syntactic structure of the program.
///
/// # Responsibilities
/// - Converts tokens into structured AST nodes.
/// - Validates the grammar, reporting errors at the offending token.
/// - Tracks where line breaks end statements and where they are ignored.
pub mod parser;
/// Source files, positions and spans.
pub mod position;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares every kind of value a program can produce, together
/// with the operator contract, indexing, attribute lookup and formatting.
/// Values also carry the history of where they travelled, which runtime
/// errors report as their origin.
pub mod value;
