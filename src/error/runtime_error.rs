use std::rc::Rc;

use crate::{
    error::report,
    interpreter::{context::Context, position::Span, value::core::Origin},
};

/// Every kind of error that can be raised while evaluating a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Wrong number of arguments, or an unknown named argument.
    Argument,
    /// A value does not have the requested attribute.
    Attribute,
    /// An assertion made with `assert` did not hold.
    Assertion,
    /// `break()` was used outside of a loop.
    Break,
    /// `continue()` was used outside of a loop.
    Continue,
    /// A name is not bound in any enclosing scope.
    Identifier,
    /// A module could not be found or loaded.
    Include,
    /// An index or key is out of range or missing.
    Index,
    /// A value that is not iterable was used in a `for` loop.
    Iteration,
    /// An operator is not supported between the given value kinds.
    Operation,
    /// A deliberately fatal error; handler blocks never catch it.
    Panic,
    /// A value does not match the pattern it is validated against.
    Pattern,
    /// A reserved binding was reassigned.
    Reserved,
    /// `return()` was used outside of a function.
    Return,
    /// An error raised by the program itself with `throw`.
    Thrown,
    /// A binding or argument has the wrong kind.
    Type,
    /// A value is out of the accepted domain, e.g. division by zero.
    Value,
}

impl ErrorKind {
    /// The name shown in diagnostics and exposed as `exception.kind`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Argument => "ArgumentError",
            Self::Attribute => "AttributeError",
            Self::Assertion => "AssertionError",
            Self::Break => "BreakError",
            Self::Continue => "ContinueError",
            Self::Identifier => "IdentifierError",
            Self::Include => "IncludeError",
            Self::Index => "IndexError",
            Self::Iteration => "IterationError",
            Self::Operation => "OperationError",
            Self::Panic => "PanicError",
            Self::Pattern => "PatternError",
            Self::Reserved => "ReservedError",
            Self::Return => "ReturnError",
            Self::Thrown => "ThrownError",
            Self::Type => "TypeError",
            Self::Value => "ValueError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
/// An error raised during evaluation.
///
/// Besides its kind and message, a runtime error remembers the call frame it
/// was raised in (for the traceback) and the provenance of the value that
/// caused it (for the origin chain).
pub struct RuntimeError {
    /// What went wrong.
    pub kind:    ErrorKind,
    /// Human readable description.
    pub message: String,
    /// The offending source span, if the error has one.
    pub span:    Option<Span>,
    /// The call frame active when the error was raised.
    pub context: Option<Rc<Context>>,
    /// Where the offending value travelled from, oldest hop first.
    pub origin:  Vec<Origin>,
}

impl RuntimeError {
    /// Creates an error with no context and no origin chain.
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Option<Span>) -> Self {
        Self { kind,
               message: message.into(),
               span,
               context: None,
               origin: Vec::new() }
    }

    /// Creates an error pointing at `span`.
    pub fn at(kind: ErrorKind, message: impl Into<String>, span: &Span) -> Self {
        Self::new(kind, message, Some(span.clone()))
    }

    /// Attaches the provenance of the value responsible for the error.
    #[must_use]
    pub fn with_origin(mut self, origin: &[Origin]) -> Self {
        if self.origin.is_empty() {
            self.origin = origin.to_vec();
        }
        self
    }

    /// Records the frame the error was raised in, unless one is already set.
    #[must_use]
    pub fn in_context(mut self, context: &Rc<Context>) -> Self {
        if self.context.is_none() {
            self.context = Some(Rc::clone(context));
        }
        self
    }

    /// Fills in a span for errors raised without one.
    #[must_use]
    pub fn or_span(mut self, span: &Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span.clone());
        }
        self
    }

    /// Panics are never caught by handler blocks.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self.kind, ErrorKind::Panic)
    }

    /// Renders the full diagnostic, optionally with ANSI colours.
    #[must_use]
    pub fn render(&self, colored: bool) -> String {
        report::render_runtime_error(self, colored)
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render(false))
    }
}

impl std::error::Error for RuntimeError {}
