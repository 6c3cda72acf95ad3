use std::rc::Rc;

use crate::{
    ast::{Branch, FunctionDef, Node, NodeKind, OptionDef, ParameterDef},
    error::ParseError,
    interpreter::{
        lexer::{Keyword, Token},
        parser::{
            core::{Newlines, ParseResult, TokenStream, parse_expression},
            statement::parse_statement,
            utils::parse_comma_separated,
        },
        position::Span,
    },
};

/// Parses a code block delimited by braces.
///
/// A block holds zero or more statements, each terminated by an end of line
/// or by the closing brace. Blank lines are ignored.
///
/// Grammar: `block := "{" (statement EOL*)* "}"`
///
/// Returns the statements and the span of the closing brace.
pub fn parse_block(tokens: &mut TokenStream) -> ParseResult<(Vec<Node>, Span)> {
    tokens.skip_newlines();
    tokens.open(&Token::LBrace, Newlines::Significant)?;
    let mut statements = Vec::new();

    loop {
        tokens.skip_newlines();
        if tokens.is(&Token::RBrace) {
            break;
        }

        statements.push(parse_statement(tokens)?);

        if !tokens.is(&Token::Eol) && !tokens.is(&Token::RBrace) {
            return Err(tokens.unexpected("end of line or '}'"));
        }
    }

    let end = tokens.close(&Token::RBrace, "'}'")?;

    Ok((statements, end.span.clone()))
}

/// Parses `( expression )` as used by `if`, `elif`, `when` and `while`.
fn parse_condition(tokens: &mut TokenStream) -> ParseResult<Node> {
    tokens.open(&Token::LParen, Newlines::Ignored)?;
    let condition = parse_expression(tokens)?;
    tokens.close(&Token::RParen, "')'")?;

    Ok(condition)
}

/// Parses an optional `var` followed by the name a construct binds.
///
/// Returns the name and whether `var` was present.
fn parse_binding(tokens: &mut TokenStream) -> ParseResult<(String, bool)> {
    let overwrite = tokens.is_keyword(Keyword::Var);
    if overwrite {
        tokens.advance();
    }
    let (name, _) = tokens.expect_identifier()?;

    Ok((name.to_owned(), overwrite))
}

/// Parses a function or lambda literal.
///
/// Grammar:
/// ```text
/// function := "func" "(" params ")" ("->" expression)? block
///           | "lambda" "(" params ")" ("->" expression)? "{" expression "}"
/// params   := (param ("," param)*)?
/// param    := identifier (":" expression)? | identifier "=" expression
/// ```
///
/// Options (parameters with a default) must follow all plain parameters. A
/// lambda body is a single expression whose value is returned.
pub fn parse_function(tokens: &mut TokenStream) -> ParseResult<Node> {
    let is_lambda = tokens.is_keyword(Keyword::Lambda);
    let start = tokens.advance().span.clone();

    tokens.open(&Token::LParen, Newlines::Ignored)?;
    let mut params = Vec::new();
    let mut options: Vec<OptionDef> = Vec::new();

    parse_comma_separated(tokens,
                          |tokens| {
                              let (name, span) = tokens.expect_identifier()?;
                              let (name, span) = (name.to_owned(), span.clone());

                              if tokens.is(&Token::Equals) {
                                  tokens.advance();
                                  let default = parse_expression(tokens)?;
                                  let span = span.to(&default.span);
                                  options.push(OptionDef { name, default, span });
                                  return Ok(());
                              }

                              if !options.is_empty() {
                                  return Err(ParseError::syntax(format!("Parameter '{name}' must come before options"),
                                                                span));
                              }

                              let declared_type = if tokens.is(&Token::Colon) {
                                  tokens.advance();
                                  Some(parse_expression(tokens)?)
                              } else {
                                  None
                              };
                              params.push(ParameterDef { name, declared_type, span });
                              Ok(())
                          },
                          &Token::RParen)?;
    tokens.close(&Token::RParen, "',' or ')'")?;

    let restart = tokens.offset();
    tokens.skip_newlines();
    let return_type = if tokens.is(&Token::Arrow) {
        tokens.advance();
        tokens.skip_newlines();
        Some(parse_expression(tokens)?)
    } else {
        tokens.rewind(restart);
        None
    };

    let (body, end) = if is_lambda {
        tokens.skip_newlines();
        tokens.open(&Token::LBrace, Newlines::Ignored)?;
        let value = parse_expression(tokens)?;
        let end = tokens.close(&Token::RBrace, "'}'")?.span.clone();
        let span = value.span.clone();
        (vec![Node::new(NodeKind::Return(Some(Box::new(value))), span)], end)
    } else {
        parse_block(tokens)?
    };

    let definition = FunctionDef { params,
                                   options,
                                   return_type,
                                   body: Rc::from(body) };

    Ok(Node::new(NodeKind::Function(Rc::new(definition)), start.to(&end)))
}

/// Parses a `handler { ... }` block.
pub fn parse_handler(tokens: &mut TokenStream) -> ParseResult<Node> {
    let start = tokens.expect_keyword(Keyword::Handler)?.span.clone();
    let (body, end) = parse_block(tokens)?;

    Ok(Node::new(NodeKind::Handler(body), start.to(&end)))
}

/// Parses an `if` chain.
///
/// `elif` and `else` may start on the line after the previous closing brace.
///
/// Grammar: `if := "if" condition block ("elif" condition block)* ("else" block)?`
pub fn parse_if(tokens: &mut TokenStream) -> ParseResult<Node> {
    let start = tokens.expect_keyword(Keyword::If)?.span.clone();
    let condition = parse_condition(tokens)?;
    let (body, mut end) = parse_block(tokens)?;
    let mut branches = vec![Branch { condition, body }];
    let mut otherwise = None;

    loop {
        let restart = tokens.offset();
        tokens.skip_newlines();

        if tokens.is_keyword(Keyword::Elif) {
            tokens.advance();
            let condition = parse_condition(tokens)?;
            let (body, branch_end) = parse_block(tokens)?;
            branches.push(Branch { condition, body });
            end = branch_end;
        } else if tokens.is_keyword(Keyword::Else) {
            tokens.advance();
            let (body, branch_end) = parse_block(tokens)?;
            otherwise = Some(body);
            end = branch_end;
            break;
        } else {
            tokens.rewind(restart);
            break;
        }
    }

    Ok(Node::new(NodeKind::If { branches, otherwise }, start.to(&end)))
}

/// Parses a `switch` statement.
///
/// Grammar:
/// ```text
/// switch := "switch" "(" "var"? identifier "as" expression ")"
///           "{" ("when" condition block)* ("else" block)? "}"
/// ```
pub fn parse_switch(tokens: &mut TokenStream) -> ParseResult<Node> {
    let start = tokens.expect_keyword(Keyword::Switch)?.span.clone();

    tokens.open(&Token::LParen, Newlines::Ignored)?;
    let (name, overwrite) = parse_binding(tokens)?;
    tokens.expect_keyword(Keyword::As)?;
    let subject = parse_expression(tokens)?;
    tokens.close(&Token::RParen, "')'")?;

    tokens.skip_newlines();
    tokens.open(&Token::LBrace, Newlines::Ignored)?;
    let mut cases = Vec::new();
    let mut otherwise = None;

    while tokens.is_keyword(Keyword::When) {
        tokens.advance();
        let condition = parse_condition(tokens)?;
        let (body, _) = parse_block(tokens)?;
        cases.push(Branch { condition, body });
    }
    if tokens.is_keyword(Keyword::Else) {
        tokens.advance();
        let (body, _) = parse_block(tokens)?;
        otherwise = Some(body);
    }

    let end = tokens.close(&Token::RBrace, "'when', 'else' or '}'")?;

    Ok(Node::new(NodeKind::Switch { name,
                                    overwrite,
                                    subject: Box::new(subject),
                                    cases,
                                    otherwise },
                 start.to(&end.span)))
}

/// Parses a `for` loop.
///
/// Grammar: `for := "for" "(" "var"? identifier "in" expression ")" block`
pub fn parse_for(tokens: &mut TokenStream) -> ParseResult<Node> {
    let start = tokens.expect_keyword(Keyword::For)?.span.clone();

    tokens.open(&Token::LParen, Newlines::Ignored)?;
    let (name, overwrite) = parse_binding(tokens)?;
    tokens.expect_keyword(Keyword::In)?;
    let iterable = parse_expression(tokens)?;
    tokens.close(&Token::RParen, "')'")?;

    let (body, end) = parse_block(tokens)?;

    Ok(Node::new(NodeKind::For { name,
                                 overwrite,
                                 iterable: Box::new(iterable),
                                 body },
                 start.to(&end)))
}

/// Parses a `while` loop.
pub fn parse_while(tokens: &mut TokenStream) -> ParseResult<Node> {
    let start = tokens.expect_keyword(Keyword::While)?.span.clone();
    let condition = parse_condition(tokens)?;
    let (body, end) = parse_block(tokens)?;

    Ok(Node::new(NodeKind::While { condition: Box::new(condition),
                                   body },
                 start.to(&end)))
}

#[cfg(test)]
mod tests {
    use crate::{
        ast::{Node, NodeKind},
        error::ParseError,
        interpreter::{lexer::tokenize, parser::core::parse, position::SourceFile},
    };

    fn parse_text(text: &str) -> Result<Vec<Node>, ParseError> {
        let source = SourceFile::new("t.peri", text);
        parse(&tokenize(&source).unwrap())
    }

    #[test]
    fn empty_blocks_are_legal() {
        let nodes = parse_text("while (x) {}\nhandler {\n}").unwrap();
        assert!(matches!(nodes[0].kind, NodeKind::While { ref body, .. } if body.is_empty()));
        assert!(matches!(nodes[1].kind, NodeKind::Handler(ref body) if body.is_empty()));
    }

    #[test]
    fn else_may_start_on_the_next_line() {
        let nodes = parse_text("if (a) {\n1\n}\nelif (b) {\n2\n}\nelse {\n3\n}\nx").unwrap();
        assert_eq!(nodes.len(), 2);
        let NodeKind::If { branches, otherwise } = &nodes[0].kind else {
            panic!("expected if");
        };
        assert_eq!(branches.len(), 2);
        assert!(otherwise.is_some());
    }

    #[test]
    fn if_without_else_leaves_the_next_statement_alone() {
        let nodes = parse_text("if (a) { 1 }\nvar y = 2").unwrap();
        assert_eq!(nodes.len(), 2);
        assert!(matches!(nodes[1].kind, NodeKind::VarCreate { .. }));
    }

    #[test]
    fn functions_with_types_options_and_return_types() {
        let nodes = parse_text("func(a: int, b, sep = \" \") -> str {\nreturn(a)\n}").unwrap();
        let NodeKind::Function(def) = &nodes[0].kind else {
            panic!("expected function");
        };
        assert_eq!(def.params.len(), 2);
        assert!(def.params[0].declared_type.is_some());
        assert_eq!(def.options[0].name, "sep");
        assert!(def.return_type.is_some());
    }

    #[test]
    fn options_must_come_last() {
        let error = parse_text("func(a = 1, b) {}").unwrap_err();
        assert!(error.message.contains("must come before options"));
    }

    #[test]
    fn lambdas_return_their_expression() {
        let nodes = parse_text("lambda(x) { x * 2 }").unwrap();
        let NodeKind::Function(def) = &nodes[0].kind else {
            panic!("expected function");
        };
        assert!(matches!(def.body[0].kind, NodeKind::Return(Some(_))));
    }

    #[test]
    fn switch_with_cases_and_default() {
        let text = "switch (var n as 3) {\n  when (n == 1) {\n  1\n  }\n  when (n == 3) { 3 }\n  else { 0 }\n}";
        let nodes = parse_text(text).unwrap();
        let NodeKind::Switch { name, overwrite, cases, otherwise, .. } = &nodes[0].kind else {
            panic!("expected switch");
        };
        assert_eq!(name, "n");
        assert!(*overwrite);
        assert_eq!(cases.len(), 2);
        assert!(otherwise.is_some());
    }

    #[test]
    fn for_loops_bind_with_or_without_var() {
        let nodes = parse_text("for (i in [1, 2]) {}\nfor (var j in x) {}").unwrap();
        assert!(matches!(nodes[0].kind, NodeKind::For { overwrite: false, .. }));
        assert!(matches!(nodes[1].kind, NodeKind::For { overwrite: true, .. }));
    }

    #[test]
    fn statements_in_a_block_need_separate_lines() {
        let error = parse_text("handler { 1 2 }").unwrap_err();
        assert!(error.message.starts_with("Expected end of line or '}'"), "{}", error.message);
    }
}
