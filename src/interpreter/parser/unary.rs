use std::iter::Peekable;

use crate::{
    ast::{Expr, LiteralValue, UnaryOperator},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseResult, parse_pipeline},
            utils::{parse_comma_separated, parse_identifier, parse_type_name},
        },
    },
};

/// Parses prefix operators: arithmetic negation `-` and logical NOT `!`.
///
/// Prefix operators nest, so `--x` and `!!b` are accepted.
///
/// The rule is: `unary := ("-" | "!") unary | atomic`
///
/// # Parameters
/// - `tokens`: Token stream.
///
/// # Returns
/// An `Expr::Unary` node or the atomic expression itself.
pub fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let op = match tokens.peek() {
        Some((Token::Minus, line)) => (UnaryOperator::Negate, *line),
        Some((Token::Bang, line)) => (UnaryOperator::Not, *line),
        _ => return parse_atomic(tokens),
    };
    tokens.next();

    let expr = parse_unary(tokens)?;
    Ok(Expr::Unary { op:   op.0,
                     expr: Box::new(expr),
                     line: op.1, })
}

/// Parses an atomic expression followed by any `.field` accessors.
///
/// Atomic expressions are:
/// - parenthesized pipelines `( ... )`,
/// - integer, double, boolean, character and string literals,
/// - function calls `name(args)(args)...`,
/// - variable references,
/// - enum variant construction `Enum::Variant` and `Enum::Variant(args)`.
///
/// # Errors
/// - `ExpectedClosingParen` if a parenthesized expression is unterminated.
/// - `UnexpectedToken` for a token that cannot start an expression.
/// - `UnexpectedEndOfInput` if the stream is exhausted.
pub fn parse_atomic<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut expr = match tokens.next() {
        Some((Token::LParen, line)) => {
            let inner = parse_pipeline(tokens)?;
            match tokens.next() {
                Some((Token::RParen, _)) => inner,
                Some(_) => return Err(ParseError::ExpectedClosingParen { line: *line }),
                None => return Err(ParseError::UnexpectedEndOfInput { line: *line }),
            }
        },
        Some((Token::Integer(n), line)) => Expr::Literal { value: LiteralValue::Integer(*n),
                                                           line:  *line, },
        Some((Token::Double(x), line)) => Expr::Literal { value: LiteralValue::Double(*x),
                                                          line:  *line, },
        Some((Token::Bool(b), line)) => Expr::Literal { value: LiteralValue::Bool(*b),
                                                        line:  *line, },
        Some((Token::Char(c), line)) => Expr::Literal { value: LiteralValue::Char(*c),
                                                        line:  *line, },
        Some((Token::Str(raw), line)) => Expr::Str { raw:  raw.clone(),
                                                     line: *line, },
        Some((Token::Identifier(name), line)) => parse_call_or_variable(tokens, name, *line)?,
        Some((Token::TypeName(name), line)) => parse_enum_variant(tokens, name, *line)?,
        Some((tok, line)) => {
            return Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                     line:  *line, });
        },
        None => return Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    };

    while let Some((Token::Dot, line)) = tokens.peek() {
        tokens.next();
        let field = parse_identifier(tokens)?;
        expr = Expr::FieldAccess { target: Box::new(expr),
                                   field,
                                   line: *line };
    }

    Ok(expr)
}

/// Parses either a call with one or more argument groups, or a plain
/// variable reference.
///
/// Each parenthesized group is applied in turn at evaluation time, which is
/// how curried calls such as `add(1)(2)` are written.
///
/// Grammar: `call := IDENT ("(" argList ")")+`
fn parse_call_or_variable<'a, I>(tokens: &mut Peekable<I>,
                                 name: &str,
                                 line: usize)
                                 -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut groups = Vec::new();
    while let Some((Token::LParen, _)) = tokens.peek() {
        tokens.next();
        groups.push(parse_comma_separated(tokens, parse_pipeline, &Token::RParen)?);
    }

    if groups.is_empty() {
        return Ok(Expr::Variable { name: name.to_string(),
                                   line });
    }

    Ok(Expr::Call { callee: name.to_string(),
                    groups,
                    line })
}

/// Parses `Enum::Variant` with an optional parenthesized argument list.
///
/// # Errors
/// `UnexpectedToken` if the type name is not followed by `::`.
fn parse_enum_variant<'a, I>(tokens: &mut Peekable<I>,
                             enum_name: &str,
                             line: usize)
                             -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    match tokens.next() {
        Some((Token::ColonColon, _)) => {},
        Some((tok, line)) => {
            return Err(ParseError::UnexpectedToken { token: format!("Expected '::' after {enum_name}, found {tok:?}"),
                                                     line:  *line, });
        },
        None => return Err(ParseError::UnexpectedEndOfInput { line }),
    }

    let variant = parse_type_name(tokens)?;
    let arguments = if let Some((Token::LParen, _)) = tokens.peek() {
        tokens.next();
        parse_comma_separated(tokens, parse_pipeline, &Token::RParen)?
    } else {
        Vec::new()
    };

    Ok(Expr::EnumVariant { enum_name: enum_name.to_string(),
                           variant,
                           arguments,
                           line })
}
