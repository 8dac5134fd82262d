use std::iter::Peekable;

use crate::{
    ast::BinaryOperator,
    error::ParseError,
    interpreter::{lexer::Token, parser::core::ParseResult},
};

/// Parses a comma-separated list of items until a closing token.
///
/// This utility is shared by call arguments, parameter lists, type lists,
/// variant payloads and `derive(...)` clauses. It repeatedly calls
/// `parse_item` to parse one element, expecting either:
///
/// - a comma, to continue the list, or
/// - the specified closing token, to end it.
///
/// An immediately encountered closing token produces an empty list. A comma
/// directly before the closing token is accepted.
///
/// Grammar (simplified): `list := item ("," item)* ","?`
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first item or closing token.
/// - `parse_item`: Function used to parse each list element.
/// - `closing`: The token that terminates the list (e.g., `)`).
///
/// # Returns
/// A vector of parsed items.
///
/// # Errors
/// Returns a `ParseError` if:
/// - an item fails to parse,
/// - an unexpected token is encountered,
/// - the stream ends before the closing token.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    closing: &Token)
    -> Result<Vec<T>, ParseError>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut items = Vec::new();
    if let Some((tok, _)) = tokens.peek()
       && tok == closing
    {
        tokens.next();

        return Ok(items);
    }
    loop {
        items.push(parse_item(tokens)?);
        match tokens.peek() {
            Some((Token::Comma, _)) => {
                tokens.next();
                if let Some((tok, _)) = tokens.peek()
                   && tok == closing
                {
                    tokens.next();
                    break;
                }
            },
            Some((tok, _)) if tok == closing => {
                tokens.next();
                break;
            },
            Some((tok, line)) => {
                return Err(ParseError::UnexpectedToken { token: format!("Expected ',' or {closing:?}, found {tok:?}"),
                                                         line:  *line, });
            },
            None => return Err(ParseError::UnexpectedEndOfInput { line: 0 }),
        }
    }
    Ok(items)
}

/// Parses a plain identifier and returns its name.
///
/// The next token must be `Token::Identifier`.
///
/// # Errors
/// Returns a `ParseError` if:
/// - the next token is not an identifier,
/// - the input ends unexpectedly.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>)
                                                              -> ParseResult<String>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((Token::Identifier(s), _)) => Ok(s.clone()),
        Some((tok, line)) => {
            Err(ParseError::UnexpectedToken { token: format!("Expected identifier, found {tok:?}"),
                                              line:  *line, })
        },
        None => Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    }
}

/// Parses an uppercase type name and returns it.
///
/// # Errors
/// Returns a `ParseError` if the next token is not a type name or the input
/// ends.
pub(in crate::interpreter::parser) fn parse_type_name<'a, I>(tokens: &mut Peekable<I>)
                                                             -> ParseResult<String>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((Token::TypeName(s), _)) => Ok(s.clone()),
        Some((tok, line)) => {
            Err(ParseError::UnexpectedToken { token: format!("Expected type name, found {tok:?}"),
                                              line:  *line, })
        },
        None => Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    }
}

/// Consumes `expected` and returns its line.
///
/// # Errors
/// `UnexpectedToken` naming `what` if a different token is next, or
/// `UnexpectedEndOfInput`.
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                    expected: &Token,
                                                    what: &str)
                                                    -> ParseResult<usize>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((tok, line)) if tok == expected => Ok(*line),
        Some((tok, line)) => {
            Err(ParseError::UnexpectedToken { token: format!("Expected {what}, found {tok:?}"),
                                              line:  *line, })
        },
        None => Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    }
}

/// Consumes the next token if it equals `expected`.
///
/// Returns whether a token was consumed.
pub(in crate::interpreter::parser) fn eat<'a, I>(tokens: &mut Peekable<I>, expected: &Token) -> bool
    where I: Iterator<Item = &'a (Token, usize)>
{
    if let Some((tok, _)) = tokens.peek()
       && tok == expected
    {
        tokens.next();
        return true;
    }
    false
}

/// Skips any number of `,` and `;` separators.
pub(in crate::interpreter::parser) fn skip_separators<'a, I>(tokens: &mut Peekable<I>)
    where I: Iterator<Item = &'a (Token, usize)>
{
    while let Some((Token::Comma | Token::Semicolon, _)) = tokens.peek() {
        tokens.next();
    }
}

/// Returns `true` if the upcoming tokens form the target of an assignment:
/// `name =` or `name.field =`.
///
/// Looks ahead on a clone of the iterator; nothing is consumed.
pub(in crate::interpreter::parser) fn starts_assignment<'a, I>(tokens: &Peekable<I>) -> bool
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut lookahead = tokens.clone();
    if !matches!(lookahead.next(), Some((Token::Identifier(_), _))) {
        return false;
    }
    match lookahead.next() {
        Some((Token::Equals, _)) => true,
        Some((Token::Dot, _)) => {
            matches!(lookahead.next(), Some((Token::Identifier(_), _)))
            && matches!(lookahead.next(), Some((Token::Equals, _)))
        },
        _ => false,
    }
}

/// Returns `true` if the `{` at the front of the stream opens a map literal
/// rather than a block.
///
/// `{}` and `{ key: ...` (where `key` is an identifier or string) are maps.
pub(in crate::interpreter::parser) fn starts_map<'a, I>(tokens: &Peekable<I>) -> bool
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut lookahead = tokens.clone();
    if !matches!(lookahead.next(), Some((Token::LBrace, _))) {
        return false;
    }
    match lookahead.next() {
        Some((Token::RBrace, _)) => true,
        Some((Token::Identifier(_) | Token::Str(_), _)) => {
            matches!(lookahead.next(), Some((Token::Colon, _)))
        },
        _ => false,
    }
}

/// Maps a token to its corresponding binary operator, if any.
///
/// # Parameters
/// - `token`: Token to classify.
///
/// # Returns
/// `Some(BinaryOperator)` if the token represents a binary operator.
pub(in crate::interpreter::parser) const fn token_to_binary_operator(token: &Token)
                                                                     -> Option<BinaryOperator> {
    use BinaryOperator::{
        Add, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul, NotEqual, Sub,
    };
    match token {
        Token::Plus => Some(Add),
        Token::Minus => Some(Sub),
        Token::Star => Some(Mul),
        Token::Slash => Some(Div),
        Token::Percent => Some(Mod),
        Token::Less => Some(Less),
        Token::Greater => Some(Greater),
        Token::LessEqual => Some(LessEqual),
        Token::GreaterEqual => Some(GreaterEqual),
        Token::EqualEqual => Some(Equal),
        Token::BangEqual => Some(NotEqual),
        _ => None,
    }
}
