use crate::interpreter::{
    lexer::Token,
    parser::core::{ParseResult, TokenStream},
};

/// Parses a comma-separated list of items up to, but not including, the
/// closing token.
///
/// Shared by array, tuple and dictionary literals, call arguments and
/// parameter lists. A trailing comma is accepted and an immediately
/// encountered closing token yields an empty list. The caller consumes the
/// closing token, which keeps bracket bookkeeping in one place.
///
/// Returns the items and whether any comma was seen, which is what tells a
/// one-element tuple `(x,)` apart from a parenthesised expression `(x)`.
///
/// Grammar (simplified): `list := (item ("," item)* ","?)?`
pub(in crate::interpreter::parser) fn parse_comma_separated<T>(
    tokens: &mut TokenStream,
    mut parse_item: impl FnMut(&mut TokenStream) -> ParseResult<T>,
    closing: &Token)
    -> ParseResult<(Vec<T>, bool)> {
    let mut items = Vec::new();
    let mut saw_comma = false;

    while !tokens.is(closing) {
        items.push(parse_item(tokens)?);

        if tokens.is(&Token::Comma) {
            tokens.advance();
            saw_comma = true;
        } else if !tokens.is(closing) {
            return Err(tokens.unexpected(&format!("',' or {closing}")));
        }
    }

    Ok((items, saw_comma))
}
