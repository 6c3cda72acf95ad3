use crate::{
    ast::{CallArguments, NamedArgument, Node, NodeKind, UnaryOperator},
    interpreter::{
        lexer::{Keyword, Token},
        parser::{
            block::{parse_for, parse_function, parse_handler, parse_if, parse_switch, parse_while},
            core::{Newlines, ParseResult, TokenStream, parse_expression},
            utils::parse_comma_separated,
        },
    },
};

/// Parses a prefix sign followed by a factor, or a postfix chain.
///
/// The node of a prefixed factor starts at the operator.
///
/// Grammar: `factor := ("+" | "-") factor | postfix`
pub fn parse_factor(tokens: &mut TokenStream) -> ParseResult<Node> {
    let op = match tokens.peek() {
        Token::Plus => UnaryOperator::Plus,
        Token::Minus => UnaryOperator::Negate,
        _ => return parse_postfix(tokens),
    };

    let start = tokens.advance().span.clone();
    let operand = parse_factor(tokens)?;
    let span = start.to(&operand.span);

    Ok(Node::new(NodeKind::Unary { op,
                                   operand: Box::new(operand) },
                 span))
}

/// Parses an atom followed by any number of calls, index operations and
/// attribute lookups.
///
/// Consecutive argument lists `f(a)(b)` are collected into a single call
/// node.
///
/// Grammar: `postfix := atom (call_args+ | "[" expression "]" | "." identifier)*`
fn parse_postfix(tokens: &mut TokenStream) -> ParseResult<Node> {
    let mut node = parse_atom(tokens)?;
    let mut chaining_calls = false;

    loop {
        match tokens.peek() {
            Token::LParen => {
                let arguments = parse_call_arguments(tokens)?;
                let span = node.span.to(&arguments.span);

                if chaining_calls && let NodeKind::Call { calls, .. } = &mut node.kind {
                    calls.push(arguments);
                    node.span = span;
                } else {
                    node = Node::new(NodeKind::Call { callee: Box::new(node),
                                                      calls:  vec![arguments], },
                                     span);
                }
                chaining_calls = true;
            },
            Token::LBracket => {
                tokens.open(&Token::LBracket, Newlines::Ignored)?;
                let index = parse_expression(tokens)?;
                let end = tokens.close(&Token::RBracket, "']'")?;
                let span = node.span.to(&end.span);

                node = Node::new(NodeKind::Index { target: Box::new(node),
                                                   index:  Box::new(index), },
                                 span);
                chaining_calls = false;
            },
            Token::Period => {
                tokens.advance();
                let (name, name_span) = tokens.expect_identifier()?;
                let span = node.span.to(name_span);

                node = Node::new(NodeKind::Attribute { target: Box::new(node),
                                                       name:   name.to_owned(), },
                                 span);
                chaining_calls = false;
            },
            _ => return Ok(node),
        }
    }
}

/// Parses one parenthesised argument list.
///
/// Named arguments `name = value` may be mixed freely with positional ones;
/// they are recognised by looking one token past the identifier.
///
/// Grammar: `call_args := "(" (argument ("," argument)*)? ")"`
fn parse_call_arguments(tokens: &mut TokenStream) -> ParseResult<CallArguments> {
    let start = tokens.open(&Token::LParen, Newlines::Ignored)?.span.clone();
    let mut positional = Vec::new();
    let mut named = Vec::new();

    parse_comma_separated(tokens,
                          |tokens| {
                              if let Token::Identifier(name) = tokens.peek() {
                                  let name_span = tokens.advance().span.clone();
                                  if tokens.is(&Token::Equals) {
                                      tokens.advance();
                                      let value = parse_expression(tokens)?;
                                      let span = name_span.to(&value.span);
                                      named.push(NamedArgument { name: name.clone(),
                                                                 value,
                                                                 span });
                                      return Ok(());
                                  }
                                  tokens.retreat();
                              }
                              positional.push(parse_expression(tokens)?);
                              Ok(())
                          },
                          &Token::RParen)?;

    let end = tokens.close(&Token::RParen, "',' or ')'")?;

    Ok(CallArguments { positional,
                       named,
                       span: start.to(&end.span) })
}

/// Parses the innermost expression forms.
///
/// Grammar:
/// ```text
/// atom := INT | FLOAT | STR
///       | identifier ("=" expression)?
///       | "(" ")" | "(" expression ")" | "(" expression ("," expression)* ","? ")"
///       | "[" (expression ("," expression)*)? "]"
///       | "{" (expression ":" expression ("," ...)*)? "}"
///       | function | handler | if | switch | for | while
/// ```
fn parse_atom(tokens: &mut TokenStream) -> ParseResult<Node> {
    let lexeme = tokens.current();
    let span = lexeme.span.clone();

    let kind = match &lexeme.token {
        Token::Int(value) => NodeKind::Int(*value),
        Token::Float(value) => NodeKind::Float(*value),
        Token::Str(value) => NodeKind::Str(value.clone()),
        Token::Identifier(name) => return parse_identifier(tokens, name),
        Token::LParen => return parse_group(tokens),
        Token::LBracket => return parse_array(tokens),
        Token::LBrace => return parse_dict(tokens),
        Token::Keyword(Keyword::Func | Keyword::Lambda) => return parse_function(tokens),
        Token::Keyword(Keyword::Handler) => return parse_handler(tokens),
        Token::Keyword(Keyword::If) => return parse_if(tokens),
        Token::Keyword(Keyword::Switch) => return parse_switch(tokens),
        Token::Keyword(Keyword::For) => return parse_for(tokens),
        Token::Keyword(Keyword::While) => return parse_while(tokens),
        _ => return Err(tokens.unexpected("value, identifier, '(', '[' or '{'")),
    };

    tokens.advance();
    Ok(Node::new(kind, span))
}

/// Parses a variable access or an assignment to an existing variable.
fn parse_identifier(tokens: &mut TokenStream, name: &str) -> ParseResult<Node> {
    let span = tokens.advance().span.clone();

    if !tokens.is(&Token::Equals) {
        return Ok(Node::new(NodeKind::VarAccess(name.to_owned()), span));
    }

    tokens.advance();
    let value = parse_expression(tokens)?;
    let span = span.to(&value.span);

    Ok(Node::new(NodeKind::VarAssign { name:  name.to_owned(),
                                       value: Box::new(value), },
                 span))
}

/// Parses a parenthesised expression or a tuple literal.
///
/// `()` is the empty tuple and a single element needs a trailing comma to
/// become a tuple.
fn parse_group(tokens: &mut TokenStream) -> ParseResult<Node> {
    let start = tokens.open(&Token::LParen, Newlines::Ignored)?.span.clone();
    let (mut items, saw_comma) = parse_comma_separated(tokens, parse_expression, &Token::RParen)?;
    let end = tokens.close(&Token::RParen, "',' or ')'")?;
    let span = start.to(&end.span);

    if items.len() == 1 && !saw_comma {
        let mut inner = items.remove(0);
        inner.span = span;
        return Ok(inner);
    }

    Ok(Node::new(NodeKind::Tuple(items), span))
}

/// Parses an array literal.
fn parse_array(tokens: &mut TokenStream) -> ParseResult<Node> {
    let start = tokens.open(&Token::LBracket, Newlines::Ignored)?.span.clone();
    let (items, _) = parse_comma_separated(tokens, parse_expression, &Token::RBracket)?;
    let end = tokens.close(&Token::RBracket, "',' or ']'")?;

    Ok(Node::new(NodeKind::Array(items), start.to(&end.span)))
}

/// Parses a dictionary literal of `key: value` entries.
fn parse_dict(tokens: &mut TokenStream) -> ParseResult<Node> {
    let start = tokens.open(&Token::LBrace, Newlines::Ignored)?.span.clone();
    let (entries, _) = parse_comma_separated(tokens,
                                             |tokens| {
                                                 let key = parse_expression(tokens)?;
                                                 tokens.expect(&Token::Colon, "':'")?;
                                                 let value = parse_expression(tokens)?;
                                                 Ok((key, value))
                                             },
                                             &Token::RBrace)?;
    let end = tokens.close(&Token::RBrace, "',' or '}'")?;

    Ok(Node::new(NodeKind::Dict(entries), start.to(&end.span)))
}

#[cfg(test)]
mod tests {
    use crate::{
        ast::{Node, NodeKind},
        interpreter::{lexer::tokenize, parser::core::parse, position::SourceFile},
    };

    fn parse_one(text: &str) -> Node {
        let source = SourceFile::new("t.peri", text);
        let lexemes = tokenize(&source).unwrap();
        parse(&lexemes).unwrap().remove(0)
    }

    #[test]
    fn chained_calls_share_one_node() {
        let node = parse_one("f(1)(2, 3)");
        let NodeKind::Call { calls, .. } = node.kind else {
            panic!("expected call, got {node:?}");
        };
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].positional.len(), 2);
    }

    #[test]
    fn named_arguments_mix_with_positional_ones() {
        let node = parse_one("print(1, end = \"\", 2)");
        let NodeKind::Call { calls, .. } = node.kind else {
            panic!("expected call");
        };
        assert_eq!(calls[0].positional.len(), 2);
        assert_eq!(calls[0].named[0].name, "end");
    }

    #[test]
    fn parentheses_make_tuples_only_with_commas() {
        assert!(matches!(parse_one("(1)").kind, NodeKind::Int(1)));
        assert!(matches!(parse_one("(1,)").kind, NodeKind::Tuple(ref v) if v.len() == 1));
        assert!(matches!(parse_one("()").kind, NodeKind::Tuple(ref v) if v.is_empty()));
    }

    #[test]
    fn brackets_ignore_newlines() {
        let node = parse_one("[1,\n 2,\n 3\n]");
        assert!(matches!(node.kind, NodeKind::Array(ref v) if v.len() == 3));
        assert!(matches!(parse_one("{\n\"a\": 1\n}").kind, NodeKind::Dict(ref v) if v.len() == 1));
    }

    #[test]
    fn postfix_index_and_attribute() {
        let node = parse_one("a.b[0]");
        let NodeKind::Index { target, .. } = node.kind else {
            panic!("expected index");
        };
        assert!(matches!(target.kind, NodeKind::Attribute { ref name, .. } if name == "b"));
    }

    #[test]
    fn assignment_span_covers_the_value() {
        let node = parse_one("x = 1 + 2");
        assert!(matches!(node.kind, NodeKind::VarAssign { .. }));
        assert_eq!(node.span.end.column, 9);
    }

    #[test]
    fn negative_literal_starts_at_the_sign() {
        let node = parse_one("-5");
        let NodeKind::Unary { operand, .. } = node.kind else {
            panic!("expected unary");
        };
        assert_eq!(node.span.start.column, 0);
        assert_eq!(operand.span.start.column, 1);
    }
}
