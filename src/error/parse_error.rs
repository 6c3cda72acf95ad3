use crate::{error::report, interpreter::position::Span};

/// The two families of errors raised before evaluation starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Malformed program structure or an illegal character.
    Syntax,
    /// Malformed string literal: a bad escape, or a missing closing quote.
    Escape,
}

impl ParseErrorKind {
    /// The name shown in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Syntax => "SyntaxError",
            Self::Escape => "EscapeError",
        }
    }
}

#[derive(Debug, Clone)]
/// An error raised by the lexer or the parser.
///
/// Parse errors have no call context; they only point at the offending span.
pub struct ParseError {
    /// Which family the error belongs to.
    pub kind:    ParseErrorKind,
    /// Human readable description.
    pub message: String,
    /// The offending source span.
    pub span:    Span,
}

impl ParseError {
    /// Creates a `SyntaxError`.
    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self { kind: ParseErrorKind::Syntax,
               message: message.into(),
               span }
    }

    /// Creates an `EscapeError`.
    pub fn escape(message: impl Into<String>, span: Span) -> Self {
        Self { kind: ParseErrorKind::Escape,
               message: message.into(),
               span }
    }

    /// Renders the full diagnostic, optionally with ANSI colours.
    #[must_use]
    pub fn render(&self, colored: bool) -> String {
        report::render_parse_error(self, colored)
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render(false))
    }
}

impl std::error::Error for ParseError {}
