use crate::{
    ast::{BinaryOperator, Node, NodeKind, UnaryOperator},
    interpreter::{
        lexer::{Keyword, Token},
        parser::{
            core::{ParseResult, TokenStream},
            unary::parse_factor,
        },
    },
};

/// Maps the current token to one of `allowed` operators.
fn binary_operator(token: &Token) -> Option<BinaryOperator> {
    Some(match token {
        Token::Plus => BinaryOperator::Add,
        Token::Minus => BinaryOperator::Subtract,
        Token::Star => BinaryOperator::Multiply,
        Token::Slash => BinaryOperator::Divide,
        Token::Caret => BinaryOperator::Power,
        Token::EqualEqual => BinaryOperator::Equal,
        Token::BangEqual => BinaryOperator::NotEqual,
        Token::Less => BinaryOperator::Less,
        Token::LessEqual => BinaryOperator::LessEqual,
        Token::Greater => BinaryOperator::Greater,
        Token::GreaterEqual => BinaryOperator::GreaterEqual,
        Token::Keyword(Keyword::And) => BinaryOperator::And,
        Token::Keyword(Keyword::Or) => BinaryOperator::Or,
        _ => return None,
    })
}

/// Parses a left-associative chain of `operand (op operand)*`.
///
/// `right` parses every operand after the first; it defaults to `left` in
/// all callers except exponentiation.
fn parse_chain(tokens: &mut TokenStream,
               allowed: &[BinaryOperator],
               left: fn(&mut TokenStream) -> ParseResult<Node>,
               right: fn(&mut TokenStream) -> ParseResult<Node>)
               -> ParseResult<Node> {
    let mut node = left(tokens)?;

    while let Some(op) = binary_operator(tokens.peek())
          && allowed.contains(&op)
    {
        tokens.advance();
        let rhs = right(tokens)?;
        let span = node.span.to(&rhs.span);
        node = Node::new(NodeKind::Binary { left: Box::new(node),
                                            op,
                                            right: Box::new(rhs) },
                         span);
    }

    Ok(node)
}

/// Parses `and` / `or` chains.
///
/// Grammar: `logical := comparison (("and" | "or") comparison)*`
pub fn parse_logical(tokens: &mut TokenStream) -> ParseResult<Node> {
    parse_chain(tokens,
                &[BinaryOperator::And, BinaryOperator::Or],
                parse_comparison,
                parse_comparison)
}

/// Parses a `not`-prefixed comparison or a comparison chain.
///
/// Grammar: `comparison := "not" comparison | arith (cmp_op arith)*`
pub fn parse_comparison(tokens: &mut TokenStream) -> ParseResult<Node> {
    if tokens.is_keyword(Keyword::Not) {
        let start = tokens.advance().span.clone();
        let operand = parse_comparison(tokens)?;
        let span = start.to(&operand.span);
        return Ok(Node::new(NodeKind::Unary { op:      UnaryOperator::Not,
                                              operand: Box::new(operand), },
                            span));
    }

    let start = tokens.offset();
    let result = parse_chain(tokens,
                             &[BinaryOperator::Equal,
                               BinaryOperator::NotEqual,
                               BinaryOperator::Less,
                               BinaryOperator::LessEqual,
                               BinaryOperator::Greater,
                               BinaryOperator::GreaterEqual],
                             parse_arith,
                             parse_arith);
    tokens.or_expected(start, result, "value, identifier, '+', '-', '(', '[' or 'not'")
}

/// Parses additive expressions.
///
/// Grammar: `arith := term (("+" | "-") term)*`
pub fn parse_arith(tokens: &mut TokenStream) -> ParseResult<Node> {
    parse_chain(tokens,
                &[BinaryOperator::Add, BinaryOperator::Subtract],
                parse_term,
                parse_term)
}

/// Parses multiplicative expressions.
///
/// Grammar: `term := raised (("*" | "/") raised)*`
pub fn parse_term(tokens: &mut TokenStream) -> ParseResult<Node> {
    parse_chain(tokens,
                &[BinaryOperator::Multiply, BinaryOperator::Divide],
                parse_raised,
                parse_raised)
}

/// Parses exponentiation.
///
/// The right operand re-enters [`parse_term`], so `2 ^ 3 ^ 2` groups as
/// `2 ^ (3 ^ 2)` and `2 ^ 3 * 4` as `2 ^ (3 * 4)`.
///
/// Grammar: `raised := factor ("^" term)*`
pub fn parse_raised(tokens: &mut TokenStream) -> ParseResult<Node> {
    parse_chain(tokens, &[BinaryOperator::Power], parse_factor, parse_term)
}

#[cfg(test)]
mod tests {
    use crate::{
        ast::{BinaryOperator, Node, NodeKind},
        interpreter::{lexer::tokenize, parser::core::parse, position::SourceFile},
    };

    fn parse_one(text: &str) -> Node {
        let source = SourceFile::new("t.peri", text);
        let lexemes = tokenize(&source).unwrap();
        parse(&lexemes).unwrap().remove(0)
    }

    fn shape(node: &Node) -> String {
        match &node.kind {
            NodeKind::Int(i) => i.to_string(),
            NodeKind::VarAccess(name) => name.clone(),
            NodeKind::Binary { left, op, right } => {
                let symbol = match op {
                    BinaryOperator::Add => "+",
                    BinaryOperator::Subtract => "-",
                    BinaryOperator::Multiply => "*",
                    BinaryOperator::Divide => "/",
                    BinaryOperator::Power => "^",
                    BinaryOperator::Equal => "==",
                    BinaryOperator::And => "and",
                    BinaryOperator::Or => "or",
                    _ => "?",
                };
                format!("({} {symbol} {})", shape(left), shape(right))
            },
            NodeKind::Unary { operand, .. } => format!("(u {})", shape(operand)),
            other => format!("{other:?}"),
        }
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        assert_eq!(shape(&parse_one("1 + 2 * 3")), "(1 + (2 * 3))");
        assert_eq!(shape(&parse_one("1 - 2 - 3")), "((1 - 2) - 3)");
        assert_eq!(shape(&parse_one("8 / 4 / 2")), "((8 / 4) / 2)");
    }

    #[test]
    fn powers_are_right_associative() {
        assert_eq!(shape(&parse_one("2 ^ 3 ^ 2")), "(2 ^ (3 ^ 2))");
        assert_eq!(shape(&parse_one("2 * 3 ^ 2")), "(2 * (3 ^ 2))");
        assert_eq!(shape(&parse_one("2 ^ 3 * 4")), "(2 ^ (3 * 4))");
        assert_eq!(shape(&parse_one("x ^ 2 - 1")), "((x ^ 2) - 1)");
    }

    #[test]
    fn comparisons_and_logic() {
        assert_eq!(shape(&parse_one("a == 1 and b or c")), "(((a == 1) and b) or c)");
        assert_eq!(shape(&parse_one("not a == b")), "(u (a == b))");
    }

    #[test]
    fn unary_minus_binds_to_the_base() {
        assert_eq!(shape(&parse_one("-2 ^ 2")), "((u 2) ^ 2)");
    }

    #[test]
    fn spans_cover_both_operands() {
        let node = parse_one("10 + 20");
        assert_eq!(node.span.start.column, 0);
        assert_eq!(node.span.end.column, 7);
    }
}
