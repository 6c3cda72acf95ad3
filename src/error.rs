use std::{fmt, io, path::PathBuf};

/// Parsing errors.
///
/// Defines the errors that can occur during lexing and parsing of source
/// code: syntax mistakes, unexpected tokens, malformed literals, and any
/// other issue detected before evaluation.
pub mod parse_error;
/// Diagnostic rendering.
///
/// Formats parse and runtime errors as the banner-framed report printed by
/// the command line, with or without ANSI colours.
pub mod report;
/// Runtime errors.
///
/// Contains every error kind that can be raised during evaluation, such as
/// division by zero, kind mismatches, unknown names or failed includes.
pub mod runtime_error;

pub use parse_error::{ParseError, ParseErrorKind};
pub use runtime_error::{ErrorKind, RuntimeError};

/// Any failure of the lex, parse and evaluate pipeline.
#[derive(Debug)]
pub enum Error {
    /// The program could not be lexed or parsed.
    Parse(ParseError),
    /// Evaluation raised an error that nothing handled.
    Runtime(RuntimeError),
    /// The program file could not be read.
    Io {
        /// The file that was being read.
        path:   PathBuf,
        /// The underlying failure.
        source: io::Error,
    },
}

impl Error {
    /// Renders the full diagnostic, optionally with ANSI colours.
    #[must_use]
    pub fn render(&self, colored: bool) -> String {
        match self {
            Self::Parse(error) => error.render(colored),
            Self::Runtime(error) => error.render(colored),
            Self::Io { path, source } => format!("CmdArgumentError: Could not read {}: {source}", path.display()),
        }
    }
}

impl From<ParseError> for Error {
    fn from(error: ParseError) -> Self {
        Self::Parse(error)
    }
}

impl From<RuntimeError> for Error {
    fn from(error: RuntimeError) -> Self {
        Self::Runtime(error)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(error) => Some(error),
            Self::Runtime(error) => Some(error),
            Self::Io { source, .. } => Some(source),
        }
    }
}
