use std::iter::Peekable;

use crate::{
    ast::{Block, Expr},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseResult, parse_pipeline, parse_row},
            utils::{eat, expect, skip_separators},
        },
    },
};

/// Parses a block delimited by braces.
///
/// A block consists of zero or more expressions separated by optional `;`.
/// The closing `}` is optional: when the input ends first, the block is still
/// returned, with `closed` set to `false`, and the evaluator reports the
/// incomplete block when it reaches it.
///
/// Grammar: `block := "{" row "}"?`
///
/// # Parameters
/// - `tokens`: Token stream positioned at the opening brace.
///
/// # Returns
/// The parsed `Block`.
///
/// # Errors
/// `UnexpectedToken` if the stream is not positioned at `{`.
pub fn parse_block<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Block>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let line = expect(tokens, &Token::LBrace, "'{'")?;
    let items = parse_row(tokens)?;
    let closed = eat(tokens, &Token::RBrace);

    Ok(Block { items,
               closed,
               line })
}

/// Parses a block used in expression position.
pub fn parse_brace_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    Ok(Expr::Block(parse_block(tokens)?))
}

/// Parses a map literal of the form `{ key: expr, ... }`.
///
/// Keys are identifiers or string literals. Entries may be separated by `,`
/// or `;`. Like blocks, the closing `}` is optional.
///
/// Grammar: `map := "{" (key ":" pipeline ("," key ":" pipeline)*)? "}"?`
///
/// # Errors
/// Returns a `ParseError` if a key is not followed by `:` or an entry does
/// not start with a key.
pub fn parse_map_literal<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let line = expect(tokens, &Token::LBrace, "'{'")?;
    let mut entries = Vec::new();
    let mut closed = false;

    loop {
        skip_separators(tokens);
        let key = match tokens.next() {
            None => break,
            Some((Token::RBrace, _)) => {
                closed = true;
                break;
            },
            Some((Token::Identifier(key) | Token::Str(key), _)) => key.clone(),
            Some((tok, line)) => {
                return Err(ParseError::UnexpectedToken { token: format!("Expected map key, found {tok:?}"),
                                                         line:  *line, });
            },
        };
        expect(tokens, &Token::Colon, "':' after map key")?;
        entries.push((key, parse_pipeline(tokens)?));
    }

    Ok(Expr::Map { entries,
                   closed,
                   line })
}
