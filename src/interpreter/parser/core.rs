use crate::{
    ast::Node,
    error::ParseError,
    interpreter::{
        lexer::{Keyword, Lexeme, Token},
        parser::{binary::parse_logical, statement::parse_declaration},
        position::Span,
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Whether line breaks separate statements in the current bracket context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Newlines {
    /// Top level and code blocks: an EOL ends a statement.
    Significant,
    /// Inside `()`, `[]` and dictionary `{}`: EOLs are skipped.
    Ignored,
}

/// A cursor over the lexer's output.
///
/// The cursor never moves past the final [`Token::Eof`]. Whenever the
/// innermost bracket context ignores newlines, EOL tokens are skipped as soon
/// as the cursor lands on them, so grammar functions never see them.
pub struct TokenStream<'a> {
    lexemes: &'a [Lexeme],
    index:   usize,
    modes:   Vec<Newlines>,
}

impl<'a> TokenStream<'a> {
    /// Creates a cursor at the first token.
    ///
    /// `lexemes` must end with [`Token::Eof`], as produced by the lexer.
    #[must_use]
    pub fn new(lexemes: &'a [Lexeme]) -> Self {
        Self { lexemes,
               index: 0,
               modes: vec![Newlines::Significant] }
    }

    /// The lexeme under the cursor.
    #[must_use]
    pub fn current(&self) -> &'a Lexeme {
        let lexemes: &'a [Lexeme] = self.lexemes;
        &lexemes[self.index.min(lexemes.len().saturating_sub(1))]
    }

    /// The token under the cursor.
    #[must_use]
    pub fn peek(&self) -> &'a Token {
        &self.current().token
    }

    /// The span of the token under the cursor.
    #[must_use]
    pub fn span(&self) -> &'a Span {
        &self.current().span
    }

    /// How far the cursor has moved; used to tell whether a rule consumed
    /// anything before failing.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.index
    }

    /// Whether the token under the cursor is `token`.
    #[must_use]
    pub fn is(&self, token: &Token) -> bool {
        self.peek() == token
    }

    /// Whether the token under the cursor is the keyword `keyword`.
    #[must_use]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.peek(), Token::Keyword(k) if *k == keyword)
    }

    /// Moves past the current token and returns it.
    pub fn advance(&mut self) -> &'a Lexeme {
        let lexeme = self.current();
        if self.index + 1 < self.lexemes.len() {
            self.index += 1;
        }
        self.skip_ignored();
        lexeme
    }

    /// Steps back to the previous significant token.
    pub fn retreat(&mut self) {
        while self.index > 0 {
            self.index -= 1;
            if !(self.ignoring() && self.is(&Token::Eol)) {
                break;
            }
        }
    }

    /// Moves the cursor back to an earlier [`offset`](Self::offset).
    ///
    /// Used for lookahead across line breaks that turned out not to continue
    /// the current construct.
    pub const fn rewind(&mut self, offset: usize) {
        self.index = offset;
    }

    /// Skips any EOL tokens under the cursor.
    pub fn skip_newlines(&mut self) {
        while self.is(&Token::Eol) {
            self.advance();
        }
    }

    /// Consumes `token` or fails naming `what` was expected.
    pub fn expect(&mut self, token: &Token, what: &str) -> ParseResult<&'a Lexeme> {
        if self.is(token) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(what))
        }
    }

    /// Consumes the keyword `keyword` or fails.
    pub fn expect_keyword(&mut self, keyword: Keyword) -> ParseResult<&'a Lexeme> {
        if self.is_keyword(keyword) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&format!("'{}'", keyword.as_str())))
        }
    }

    /// Consumes the opening bracket `token` and enters a context with the
    /// given newline handling.
    pub fn open(&mut self, token: &Token, mode: Newlines) -> ParseResult<&'a Lexeme> {
        if !self.is(token) {
            return Err(self.unexpected(&token.to_string()));
        }
        self.modes.push(mode);
        Ok(self.advance())
    }

    /// Consumes the closing bracket `token` and leaves the current context.
    pub fn close(&mut self, token: &Token, what: &str) -> ParseResult<&'a Lexeme> {
        if !self.is(token) {
            return Err(self.unexpected(what));
        }
        if self.modes.len() > 1 {
            self.modes.pop();
        }
        Ok(self.advance())
    }

    /// Consumes an identifier and returns its name.
    pub fn expect_identifier(&mut self) -> ParseResult<(&'a str, &'a Span)> {
        match self.peek() {
            Token::Identifier(name) => {
                let span = self.span();
                self.advance();
                Ok((name.as_str(), span))
            },
            _ => Err(self.unexpected("identifier")),
        }
    }

    /// A `SyntaxError` at the current token.
    #[must_use]
    pub fn unexpected(&self, what: &str) -> ParseError {
        ParseError::syntax(format!("Expected {what}, found {}", self.peek()), self.span().clone())
    }

    /// Replaces a failure with a more general one when the failing rule
    /// consumed no tokens since `start`.
    ///
    /// A failure deep inside a construct that already made progress is more
    /// precise than anything the caller could say, so it is kept.
    pub fn or_expected<T>(&self, start: usize, result: ParseResult<T>, what: &str) -> ParseResult<T> {
        match result {
            Err(_) if self.index == start => Err(self.unexpected(what)),
            other => other,
        }
    }

    fn ignoring(&self) -> bool {
        self.modes.last() == Some(&Newlines::Ignored)
    }

    fn skip_ignored(&mut self) {
        if self.ignoring() {
            while self.is(&Token::Eol) && self.index + 1 < self.lexemes.len() {
                self.index += 1;
            }
        }
    }
}

/// Parses a whole program.
///
/// Statements are separated by one or more EOL tokens; blank lines are
/// skipped.
///
/// # Errors
/// The first `SyntaxError` encountered.
pub fn parse(lexemes: &[Lexeme]) -> ParseResult<Vec<Node>> {
    let mut tokens = TokenStream::new(lexemes);
    let mut statements = Vec::new();

    loop {
        tokens.skip_newlines();
        if tokens.is(&Token::Eof) {
            break;
        }
        statements.push(super::statement::parse_statement(&mut tokens)?);
        if !tokens.is(&Token::Eol) && !tokens.is(&Token::Eof) {
            return Err(tokens.unexpected("end of line"));
        }
    }

    tracing::trace!(count = statements.len(), "parsed program");

    Ok(statements)
}

/// Parses an expression.
///
/// Grammar: `expression := "var" declaration | logical`
pub fn parse_expression(tokens: &mut TokenStream) -> ParseResult<Node> {
    if tokens.is_keyword(Keyword::Var) {
        return parse_declaration(tokens);
    }

    let start = tokens.offset();
    let result = parse_logical(tokens);
    tokens.or_expected(start, result, "identifier, keyword, operator or value")
}
