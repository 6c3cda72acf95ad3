use crate::{
    ast::{Node, NodeKind},
    interpreter::{
        lexer::{Keyword, Token},
        parser::core::{Newlines, ParseResult, TokenStream, parse_expression},
    },
};

/// Parses a single statement.
///
/// A statement is one of:
/// - `return()` / `return(value)`,
/// - `break()` / `continue()`,
/// - `include(module)`,
/// - an expression.
///
/// The control keywords always take parentheses, even when empty.
pub fn parse_statement(tokens: &mut TokenStream) -> ParseResult<Node> {
    let keyword = match tokens.peek() {
        Token::Keyword(keyword @ (Keyword::Return | Keyword::Break | Keyword::Continue | Keyword::Include)) => *keyword,
        _ => return parse_expression(tokens),
    };

    let start = tokens.advance().span.clone();
    tokens.open(&Token::LParen, Newlines::Ignored)?;

    let kind = match keyword {
        Keyword::Return if tokens.is(&Token::RParen) => NodeKind::Return(None),
        Keyword::Return => NodeKind::Return(Some(Box::new(parse_expression(tokens)?))),
        Keyword::Include => NodeKind::Include(Box::new(parse_expression(tokens)?)),
        Keyword::Break => NodeKind::Break,
        _ => NodeKind::Continue,
    };

    let end = tokens.close(&Token::RParen, "')'")?;
    let span = start.to(&end.span);

    Ok(Node::new(kind, span))
}

/// Parses a variable declaration.
///
/// Grammar: `declaration := "var" identifier ("=" expression)?`
///
/// The bare form `var x` binds `Null`.
pub fn parse_declaration(tokens: &mut TokenStream) -> ParseResult<Node> {
    let start = tokens.expect_keyword(Keyword::Var)?.span.clone();
    let (name, name_span) = tokens.expect_identifier()?;

    if !tokens.is(&Token::Equals) {
        return Ok(Node::new(NodeKind::VarNull(name.to_owned()), start.to(name_span)));
    }

    tokens.advance();
    let value = parse_expression(tokens)?;
    let span = start.to(&value.span);

    Ok(Node::new(NodeKind::VarCreate { name:  name.to_owned(),
                                       value: Box::new(value), },
                 span))
}

#[cfg(test)]
mod tests {
    use crate::{
        ast::NodeKind,
        error::ParseError,
        interpreter::{lexer::tokenize, parser::core::parse, position::SourceFile},
    };

    fn parse_text(text: &str) -> Result<Vec<crate::ast::Node>, ParseError> {
        let source = SourceFile::new("t.peri", text);
        parse(&tokenize(&source).unwrap())
    }

    #[test]
    fn declarations() {
        let nodes = parse_text("var x = 1\nvar y").unwrap();
        assert!(matches!(nodes[0].kind, NodeKind::VarCreate { ref name, .. } if name == "x"));
        assert!(matches!(nodes[1].kind, NodeKind::VarNull(ref name) if name == "y"));
    }

    #[test]
    fn control_statements_require_parentheses() {
        let nodes = parse_text("return()\nbreak()\ncontinue()\nreturn(1)").unwrap();
        assert!(matches!(nodes[0].kind, NodeKind::Return(None)));
        assert!(matches!(nodes[1].kind, NodeKind::Break));
        assert!(matches!(nodes[2].kind, NodeKind::Continue));
        assert!(matches!(nodes[3].kind, NodeKind::Return(Some(_))));

        let error = parse_text("break").unwrap_err();
        assert!(error.message.contains("Expected '('"), "{}", error.message);
    }

    #[test]
    fn include_takes_an_expression() {
        let nodes = parse_text("include('math')").unwrap();
        assert!(matches!(nodes[0].kind, NodeKind::Include(_)));
        assert!(parse_text("include()").is_err());
    }

    #[test]
    fn two_statements_on_one_line_are_rejected() {
        let error = parse_text("var x = 1 var y = 2").unwrap_err();
        assert!(error.message.starts_with("Expected end of line"), "{}", error.message);
    }
}
