use std::{fmt, rc::Rc};

use logos::Logos;

use crate::{
    error::ParseError,
    interpreter::position::{SourceFile, Span},
};

/// Reasons the lexer can reject its input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LexErrorKind {
    /// No token starts with the character at this position.
    #[default]
    IllegalCharacter,
    /// A string literal ran into the end of the input.
    UnterminatedString(char),
    /// A string literal ran into the end of the line.
    NewlineInString(char),
    /// An unknown escape sequence inside a string literal.
    InvalidEscape {
        /// The escaped text following the backslash.
        escaped: String,
        /// Byte offset of the backslash, relative to the opening quote.
        offset:  usize,
    },
    /// An integer literal that does not fit into 64 bits.
    IntegerTooLarge,
}

/// Represents a lexical token in the source input.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\r\f]+")]
pub enum Token {
    /// Floating point literal tokens, such as `3.14`, `1_000.5`, `.5` or `1.`.
    #[regex(r"[0-9][0-9_]*\.[0-9_]*", parse_float)]
    #[regex(r"\.[0-9][0-9_]*", parse_float)]
    Float(f64),
    /// Integer literal tokens, such as `42` or `1_000`.
    #[regex(r"[0-9][0-9_]*", parse_integer)]
    Int(i64),
    /// String literal tokens, such as `"hi"` or `'there'`.
    #[token("\"", |lex| lex_string(lex, '"'))]
    #[token("'", |lex| lex_string(lex, '\''))]
    Str(String),
    /// Identifier tokens; variable or function names such as `x` or `square`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_owned())]
    Identifier(String),
    /// An identifier that matched the keyword table.
    Keyword(Keyword),
    /// `# Comments.` and `#= block comments =#`.
    #[token("#", skip_comment)]
    Comment,
    /// A line break; statements are separated by these.
    #[token("\n")]
    Eol,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `^`
    #[token("^")]
    Caret,
    /// `=`
    #[token("=")]
    Equals,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!`
    #[token("!")]
    Bang,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>`
    #[token(">")]
    Greater,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `->`
    #[token("->")]
    Arrow,
    /// `,`
    #[token(",")]
    Comma,
    /// `:`
    #[token(":")]
    Colon,
    /// `.`
    #[token(".")]
    Period,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// Terminates every token stream.
    Eof,
}

/// Reserved words of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Var,
    Func,
    Lambda,
    Handler,
    And,
    Or,
    Not,
    If,
    Elif,
    Else,
    Switch,
    As,
    When,
    For,
    In,
    While,
    Return,
    Break,
    Continue,
    Include,
}

impl Keyword {
    const ALL: [Self; 20] = [Self::Var,
                             Self::Func,
                             Self::Lambda,
                             Self::Handler,
                             Self::And,
                             Self::Or,
                             Self::Not,
                             Self::If,
                             Self::Elif,
                             Self::Else,
                             Self::Switch,
                             Self::As,
                             Self::When,
                             Self::For,
                             Self::In,
                             Self::While,
                             Self::Return,
                             Self::Break,
                             Self::Continue,
                             Self::Include];

    /// The source spelling of the keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Var => "var",
            Self::Func => "func",
            Self::Lambda => "lambda",
            Self::Handler => "handler",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::If => "if",
            Self::Elif => "elif",
            Self::Else => "else",
            Self::Switch => "switch",
            Self::As => "as",
            Self::When => "when",
            Self::For => "for",
            Self::In => "in",
            Self::While => "while",
            Self::Return => "return",
            Self::Break => "break",
            Self::Continue => "continue",
            Self::Include => "include",
        }
    }

    /// Looks up the keyword spelled exactly `ident`.
    #[must_use]
    pub fn from_ident(ident: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|keyword| keyword.as_str() == ident)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Identifier(name) => write!(f, "identifier '{name}'"),
            Self::Keyword(keyword) => write!(f, "keyword '{}'", keyword.as_str()),
            Self::Comment => f.write_str("comment"),
            Self::Eol => f.write_str("end of line"),
            Self::Eof => f.write_str("end of input"),
            other => write!(f, "'{}'", other.symbol()),
        }
    }
}

impl Token {
    fn symbol(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Caret => "^",
            Self::Equals => "=",
            Self::EqualEqual => "==",
            Self::Bang => "!",
            Self::BangEqual => "!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Arrow => "->",
            Self::Comma => ",",
            Self::Colon => ":",
            Self::Period => ".",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LBracket => "[",
            Self::RBracket => "]",
            _ => "",
        }
    }
}

/// A token together with the span it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    pub token: Token,
    pub span:  Span,
}

/// Strips leading and trailing whitespace from every line.
///
/// Runs before lexing, so indentation never matters and reported columns
/// count from the first non-blank character of a line.
///
/// ```
/// use peridot::interpreter::lexer::normalize;
///
/// assert_eq!(normalize("  var x = 1  \n\tx"), "var x = 1\nx");
/// ```
#[must_use]
pub fn normalize(text: &str) -> String {
    text.lines().map(str::trim).collect::<Vec<_>>().join("\n")
}

/// Converts a source file into a flat sequence of tokens.
///
/// Identifiers matching the keyword table are reclassified as
/// [`Token::Keyword`]. The returned sequence always ends with an
/// [`Token::Eol`] followed by a single [`Token::Eof`].
///
/// # Errors
/// Returns a `SyntaxError` for illegal characters and oversized integer
/// literals, and an `EscapeError` for malformed string literals.
///
/// # Examples
/// ```
/// use peridot::interpreter::{lexer::{Token, tokenize}, position::SourceFile};
///
/// let source = SourceFile::new("<doc>", "var x = 1.5");
/// let tokens: Vec<Token> = tokenize(&source).unwrap().into_iter().map(|l| l.token).collect();
/// assert_eq!(tokens.len(), 6);
/// assert_eq!(tokens[3], Token::Float(1.5));
/// assert_eq!(tokens[5], Token::Eof);
/// ```
pub fn tokenize(source: &Rc<SourceFile>) -> Result<Vec<Lexeme>, ParseError> {
    let mut lexer = Token::lexer(&source.text);
    let mut lexemes = Vec::new();

    // End offset of the last numeric literal, for splitting `1.2.3`.
    let mut number_end = None;

    while let Some(result) = lexer.next() {
        let range = lexer.span();
        let slice = lexer.slice();
        let after_number = number_end == Some(range.start);
        number_end = None;
        match result {
            Ok(Token::Float(_)) if after_number && slice.starts_with('.') => {
                let digits = slice[1..].replace('_', "");
                let value = digits.parse()
                                  .map_err(|_| lex_error(source, LexErrorKind::IntegerTooLarge, range.start + 1, range.end))?;
                lexemes.push(Lexeme { token: Token::Period,
                                      span:  source.span(range.start, range.start + 1), });
                lexemes.push(Lexeme { token: Token::Int(value),
                                      span:  source.span(range.start + 1, range.end), });
                number_end = Some(range.end);
            },
            Ok(token @ (Token::Int(_) | Token::Float(_))) => {
                lexemes.push(Lexeme { token,
                                      span: source.span(range.start, range.end) });
                number_end = Some(range.end);
            },
            Ok(Token::Identifier(name)) => {
                let token = Keyword::from_ident(&name).map_or(Token::Identifier(name), Token::Keyword);
                lexemes.push(Lexeme { token,
                                      span: source.span(range.start, range.end) });
            },
            Ok(token) => lexemes.push(Lexeme { token,
                                               span: source.span(range.start, range.end) }),
            Err(kind) => return Err(lex_error(source, kind, range.start, range.end)),
        }
    }

    let end = source.text.len();
    lexemes.push(Lexeme { token: Token::Eol,
                          span:  source.span(end, end), });
    lexemes.push(Lexeme { token: Token::Eof,
                          span:  source.span(end, end), });

    tracing::trace!(file = %source.name, count = lexemes.len(), "tokenized source");

    Ok(lexemes)
}

fn lex_error(source: &Rc<SourceFile>, kind: LexErrorKind, start: usize, end: usize) -> ParseError {
    match kind {
        LexErrorKind::IllegalCharacter => {
            let ch = source.text[start..].chars().next().unwrap_or(' ');
            ParseError::syntax(format!("Illegal character '{ch}' was found"),
                               source.span(start, start + ch.len_utf8()))
        },
        LexErrorKind::IntegerTooLarge => {
            ParseError::syntax("Integer literal is too large", source.span(start, end))
        },
        LexErrorKind::UnterminatedString(quote) => {
            ParseError::escape(format!("Invalid EOF, expected {quote}"), source.span(start, end))
        },
        LexErrorKind::NewlineInString(quote) => {
            ParseError::escape(format!("Invalid EOL, expected {quote}"), source.span(start, end))
        },
        LexErrorKind::InvalidEscape { escaped, offset } => {
            let at = start + offset;
            ParseError::escape(format!("'{escaped}' can not be escaped"),
                               source.span(at, at + 1 + escaped.len()))
        },
    }
}

fn parse_integer(lex: &logos::Lexer<Token>) -> Result<i64, LexErrorKind> {
    lex.slice()
       .replace('_', "")
       .parse()
       .map_err(|_| LexErrorKind::IntegerTooLarge)
}

fn parse_float(lex: &logos::Lexer<Token>) -> Option<f64> {
    lex.slice().replace('_', "").parse().ok()
}

/// Reads the rest of a string literal whose opening quote was just matched.
fn lex_string(lex: &mut logos::Lexer<Token>, quote: char) -> Result<String, LexErrorKind> {
    let rest = lex.remainder();
    let mut value = String::new();
    let mut chars = rest.char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        match ch {
            '\n' => {
                lex.bump(offset);
                return Err(LexErrorKind::NewlineInString(quote));
            },
            '\\' => {
                let Some((_, escaped)) = chars.next() else {
                    break;
                };
                match escaped {
                    '\\' => value.push('\\'),
                    'n' | '\n' => value.push('\n'),
                    't' => value.push('\t'),
                    '\'' => value.push('\''),
                    '"' => value.push('"'),
                    'x' => {
                        let digits: String =
                            rest[offset + 2..].chars().take(2).collect();
                        let code = u8::from_str_radix(&digits, 16).ok()
                                                                  .filter(|code| code.is_ascii())
                                                                  .filter(|_| digits.len() == 2);
                        let Some(code) = code else {
                            lex.bump((offset + 2 + digits.len()).min(rest.len()));
                            return Err(LexErrorKind::InvalidEscape { escaped: format!("x{digits}"),
                                                                     offset:  offset + 1, });
                        };
                        chars.next();
                        chars.next();
                        value.push(char::from(code));
                    },
                    other => {
                        lex.bump(offset + 1 + other.len_utf8());
                        return Err(LexErrorKind::InvalidEscape { escaped: other.to_string(),
                                                                 offset:  offset + 1, });
                    },
                }
            },
            c if c == quote => {
                lex.bump(offset + c.len_utf8());
                return Ok(value);
            },
            c => value.push(c),
        }
    }

    lex.bump(rest.len());
    Err(LexErrorKind::UnterminatedString(quote))
}

/// Skips a `#` line comment or a `#= ... =#` block comment.
///
/// An unterminated block comment runs to the end of the input.
fn skip_comment(lex: &mut logos::Lexer<Token>) -> logos::Skip {
    let rest = lex.remainder();
    let consumed = if let Some(body) = rest.strip_prefix('=') {
        body.find("=#").map_or(rest.len(), |end| end + 3)
    } else {
        rest.find('\n').unwrap_or(rest.len())
    };
    lex.bump(consumed);

    logos::Skip
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::parse_error::ParseErrorKind;

    fn kinds(text: &str) -> Vec<Token> {
        let source = SourceFile::new("test.peri", text);
        tokenize(&source).unwrap().into_iter().map(|lexeme| lexeme.token).collect()
    }

    fn failure(text: &str) -> ParseError {
        let source = SourceFile::new("test.peri", text);
        tokenize(&source).unwrap_err()
    }

    #[test]
    fn normalize_trims_each_line() {
        assert_eq!(normalize("  a\r\n    b  \n\n c"), "a\nb\n\nc");
    }

    #[test]
    fn stream_ends_with_eol_and_eof() {
        assert_eq!(kinds(""), vec![Token::Eol, Token::Eof]);
        assert_eq!(kinds("1"), vec![Token::Int(1), Token::Eol, Token::Eof]);
    }

    #[test]
    fn a_second_dot_terminates_a_number() {
        assert_eq!(kinds("1.2.3"),
                   vec![Token::Float(1.2), Token::Period, Token::Int(3), Token::Eol, Token::Eof]);
        assert_eq!(kinds("1.2..5")[..3], [Token::Float(1.2), Token::Period, Token::Float(0.5)]);
    }

    #[test]
    fn floats_may_omit_either_side_of_the_dot() {
        assert_eq!(kinds(".5")[0], Token::Float(0.5));
        assert_eq!(kinds("1.")[0], Token::Float(1.0));
        assert_eq!(kinds("var y = 1.\n")[3..5], [Token::Float(1.0), Token::Eol]);
        assert_eq!(kinds("x - .25")[2], Token::Float(0.25));
        assert_eq!(kinds("1_0.")[0], Token::Float(10.0));
    }

    #[test]
    fn underscores_separate_digits() {
        assert_eq!(kinds("1_000")[0], Token::Int(1000));
    }

    #[test]
    fn keywords_are_reclassified() {
        assert_eq!(kinds("var variable")[..2],
                   [Token::Keyword(Keyword::Var), Token::Identifier("variable".into())]);
    }

    #[test]
    fn double_character_operators() {
        assert_eq!(kinds("-> == != <= >= - = ! < >")[..10],
                   [Token::Arrow,
                    Token::EqualEqual,
                    Token::BangEqual,
                    Token::LessEqual,
                    Token::GreaterEqual,
                    Token::Minus,
                    Token::Equals,
                    Token::Bang,
                    Token::Less,
                    Token::Greater]);
    }

    #[test]
    fn string_escapes() {
        assert_eq!(kinds(r#""a\tb\n\"c\" \\ \x41""#)[0],
                   Token::Str("a\tb\n\"c\" \\ A".into()));
        assert_eq!(kinds(r"'it\'s'")[0], Token::Str("it's".into()));
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(kinds("1 # one\n2"),
                   vec![Token::Int(1), Token::Eol, Token::Int(2), Token::Eol, Token::Eof]);
        assert_eq!(kinds("1 #= a\nb =# 2"),
                   vec![Token::Int(1), Token::Int(2), Token::Eol, Token::Eof]);
        assert_eq!(kinds("1 #= never closed"), vec![Token::Int(1), Token::Eol, Token::Eof]);
    }

    #[test]
    fn unterminated_string_points_at_its_start() {
        let err = failure("var s = \"abc");

        assert_eq!(err.kind, ParseErrorKind::Escape);
        assert_eq!(err.span.start.column, 8);
        assert_eq!(err.span.start.line, 0);
    }

    #[test]
    fn invalid_escape_points_at_the_backslash() {
        let err = failure(r#""ab\q""#);

        assert_eq!(err.kind, ParseErrorKind::Escape);
        assert_eq!(err.span.start.column, 3);
        assert_eq!(err.span.end.column, 5);
    }

    #[test]
    fn illegal_characters_are_syntax_errors() {
        let err = failure("1 + $");

        assert_eq!(err.kind, ParseErrorKind::Syntax);
        assert_eq!(err.span.start.column, 4);
    }

    #[test]
    fn oversized_integers_are_rejected() {
        assert_eq!(failure("99999999999999999999").kind, ParseErrorKind::Syntax);
    }
}
