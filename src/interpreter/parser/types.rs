use std::iter::Peekable;

use crate::{
    ast::TypeExpr,
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::ParseResult,
            utils::{expect, parse_comma_separated},
        },
    },
};

/// Parses a type annotation.
///
/// Grammar:
/// ```text
/// type := TYPENAME
///       | "(" (type ("," type)*)? ")" "->" type
/// ```
///
/// Function types nest, so `(Int) -> (Int) -> Int` is a function returning
/// a function.
///
/// # Errors
/// - `UnexpectedToken` if the stream does not start a type, or a
///   parenthesized type list is not followed by `->`.
/// - `UnexpectedEndOfInput` if the stream is exhausted.
pub fn parse_type<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<TypeExpr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    match tokens.next() {
        Some((Token::TypeName(name), _)) => Ok(TypeExpr::Named(name.clone())),
        Some((Token::LParen, _)) => {
            let params = parse_comma_separated(tokens, parse_type, &Token::RParen)?;
            expect(tokens, &Token::Arrow, "'->' in function type")?;
            let ret = parse_type(tokens)?;
            Ok(TypeExpr::Function { params,
                                    ret: Box::new(ret) })
        },
        Some((tok, line)) => {
            Err(ParseError::UnexpectedToken { token: format!("Expected type, found {tok:?}"),
                                              line:  *line, })
        },
        None => Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    }
}

/// Returns `true` if the next token can start a type annotation.
pub(in crate::interpreter::parser) fn starts_type<'a, I>(tokens: &mut Peekable<I>) -> bool
    where I: Iterator<Item = &'a (Token, usize)>
{
    matches!(tokens.peek(), Some((Token::TypeName(_) | Token::LParen, _)))
}
