use std::iter::Peekable;

use crate::{
    ast::Expr,
    interpreter::{
        lexer::{OperatorCategory, Token},
        parser::{core::ParseResult, unary::parse_unary, utils::token_to_binary_operator},
    },
};

/// Parses a chain of comparisons.
///
/// The operands are collected into a single `Expr::Comparison` so the
/// evaluator can fold them left to right: each operator compares the result
/// of the previous comparison against the next operand.
///
/// The rule is: `comparison := addition (cmpOp addition)*`
///
/// # Parameters
/// - `tokens`: Token stream with line information.
///
/// # Returns
/// The bare addition-level expression when no comparison operator follows.
pub fn parse_comparison<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let first = parse_addition(tokens)?;
    let mut rest = Vec::new();

    while let Some((token, _)) = tokens.peek()
          && token.category() == Some(OperatorCategory::Comparison)
          && let Some(op) = token_to_binary_operator(token)
    {
        tokens.next();
        rest.push((op, parse_addition(tokens)?));
    }

    if rest.is_empty() {
        return Ok(first);
    }

    Ok(Expr::Comparison { line: first.line_number(),
                          first: Box::new(first),
                          rest })
}

/// Parses addition and subtraction expressions.
///
/// Handles left-associative binary operators: `+` and `-`.
///
/// The rule is: `addition := multiplication (("+" | "-") multiplication)*`
pub fn parse_addition<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_associative(tokens, OperatorCategory::Addition, parse_multiplication)
}

/// Parses multiplication-level expressions.
///
/// Handles left-associative operators: `*`, `/` and `%`.
///
/// The rule is: `multiplication := unary (("*" | "/" | "%") unary)*`
pub fn parse_multiplication<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_associative(tokens, OperatorCategory::Multiplication, parse_unary)
}

fn parse_left_associative<'a, I>(tokens: &mut Peekable<I>,
                                 category: OperatorCategory,
                                 parse_operand: fn(&mut Peekable<I>) -> ParseResult<Expr>)
                                 -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut left = parse_operand(tokens)?;
    loop {
        if let Some((token, line)) = tokens.peek()
           && token.category() == Some(category)
           && let Some(op) = token_to_binary_operator(token)
        {
            tokens.next();
            let right = parse_operand(tokens)?;
            left = Expr::Binary { left: Box::new(left),
                                  op,
                                  right: Box::new(right),
                                  line: *line };
            continue;
        }
        break;
    }
    Ok(left)
}
