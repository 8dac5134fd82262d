use std::iter::Peekable;

use crate::{
    ast::{Expr, LiteralValue, MatchArm, Pattern},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            block::parse_block,
            core::{ParseResult, parse_expression, parse_pipeline},
            types::parse_type,
            utils::{
                eat, expect, parse_comma_separated, parse_identifier, parse_type_name,
                skip_separators,
            },
        },
    },
};

/// Parses a `let` binding.
///
/// Syntax:
/// ```text
///     let [mut] name [: Type] = pipeline
/// ```
///
/// # Parameters
/// - `tokens`: Token stream positioned after the `let` keyword.
/// - `line`: Line number of the `let` token.
///
/// # Errors
/// - `UnexpectedToken` if the name or `=` is missing.
/// - Propagates errors from the annotation and initializer.
pub fn parse_let<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mutable = eat(tokens, &Token::Mut);
    let name = parse_identifier(tokens)?;

    let annotation = if eat(tokens, &Token::Colon) {
        Some(parse_type(tokens)?)
    } else {
        None
    };

    expect(tokens, &Token::Equals, "'=' in let binding")?;
    let value = parse_pipeline(tokens)?;

    Ok(Expr::Let { name,
                   mutable,
                   annotation,
                   value: Box::new(value),
                   line })
}

/// Parses `name = value` or `name.field = value`.
///
/// The caller has already confirmed, by lookahead, that the tokens form an
/// assignment target.
pub fn parse_assignment<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let line = tokens.peek().map_or(0, |(_, l)| *l);
    let name = parse_identifier(tokens)?;

    let field = if eat(tokens, &Token::Dot) {
        Some(parse_identifier(tokens)?)
    } else {
        None
    };

    expect(tokens, &Token::Equals, "'='")?;
    let value = parse_pipeline(tokens)?;

    Ok(Expr::Assign { name,
                      field,
                      value: Box::new(value),
                      line })
}

/// Parses an `if` expression with any number of `else if` branches and an
/// optional `else`.
///
/// Syntax:
/// ```text
///     if <condition> { ... }
///     else if <condition> { ... }
///     else { ... }
/// ```
///
/// The branches are collected into one flat list so the evaluator can walk
/// them in order.
///
/// # Parameters
/// - `tokens`: Token stream positioned after the `if` keyword.
/// - `line`: Line number of the `if` token.
pub fn parse_if<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut branches = Vec::new();
    let mut else_block = None;

    let condition = parse_expression(tokens)?;
    branches.push((condition, parse_block(tokens)?));

    while eat(tokens, &Token::Else) {
        if eat(tokens, &Token::If) {
            let condition = parse_expression(tokens)?;
            branches.push((condition, parse_block(tokens)?));
        } else {
            else_block = Some(parse_block(tokens)?);
            break;
        }
    }

    Ok(Expr::If { branches,
                  else_block,
                  line })
}

/// Parses `while <condition> { ... }`.
pub fn parse_while<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let condition = parse_expression(tokens)?;
    let body = parse_block(tokens)?;

    Ok(Expr::While { condition: Box::new(condition),
                     body,
                     line })
}

/// Parses a three-clause `for` loop.
///
/// Syntax:
/// ```text
///     for <init>; <condition>; <step> { ... }
///     for { ... }
/// ```
///
/// Each clause may be left empty. A missing condition loops until the body
/// raises an error.
///
/// # Parameters
/// - `tokens`: Token stream positioned after the `for` keyword.
/// - `line`: Line number of the `for` token.
pub fn parse_for<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    if let Some((Token::LBrace, _)) = tokens.peek() {
        return Ok(Expr::For { init: None,
                              condition: None,
                              step: None,
                              body: parse_block(tokens)?,
                              line });
    }

    let init = optional_clause(tokens, &Token::Semicolon)?;
    expect(tokens, &Token::Semicolon, "';' after for initializer")?;
    let condition = optional_clause(tokens, &Token::Semicolon)?;
    expect(tokens, &Token::Semicolon, "';' after for condition")?;
    let step = optional_clause(tokens, &Token::LBrace)?;
    let body = parse_block(tokens)?;

    Ok(Expr::For { init,
                   condition,
                   step,
                   body,
                   line })
}

fn optional_clause<'a, I>(tokens: &mut Peekable<I>,
                          terminator: &Token)
                          -> ParseResult<Option<Box<Expr>>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    match tokens.peek() {
        Some((tok, _)) if tok == terminator => Ok(None),
        _ => Ok(Some(Box::new(parse_expression(tokens)?))),
    }
}

/// Parses a `match` expression.
///
/// Syntax:
/// ```text
///     match <expr> {
///         <pattern> => <expr>,
///         ...
///     }
/// ```
///
/// Arms may be separated by `,` or `;`. The closing `}` is optional, as for
/// blocks.
///
/// # Errors
/// - `UnexpectedToken` if the arm list does not start with `{` or an arm is
///   missing its `=>`.
/// - Propagates pattern and arm body errors.
pub fn parse_match<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let scrutinee = parse_expression(tokens)?;
    expect(tokens, &Token::LBrace, "'{' after match scrutinee")?;

    let mut arms = Vec::new();
    let mut closed = false;
    loop {
        skip_separators(tokens);
        match tokens.peek() {
            None => break,
            Some((Token::RBrace, _)) => {
                tokens.next();
                closed = true;
                break;
            },
            Some(_) => {
                let pattern = parse_pattern(tokens)?;
                expect(tokens, &Token::FatArrow, "'=>' after match pattern")?;
                let body = parse_pipeline(tokens)?;
                arms.push(MatchArm { pattern, body });
            },
        }
    }

    Ok(Expr::Match { scrutinee: Box::new(scrutinee),
                     arms,
                     closed,
                     line })
}

/// Parses a single `match` pattern.
///
/// Grammar:
/// ```text
/// pattern := "_" | IDENT | "-"? INT | "-"? DOUBLE | BOOL | CHAR | STRING
///          | TYPENAME "::" TYPENAME ("(" pattern ("," pattern)* ")")?
/// ```
pub fn parse_pattern<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Pattern>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    match tokens.next() {
        Some((Token::Identifier(name), _)) if name == "_" => Ok(Pattern::Wildcard),
        Some((Token::Identifier(name), _)) => Ok(Pattern::Binding(name.clone())),
        Some((Token::Integer(n), _)) => Ok(Pattern::Literal(LiteralValue::Integer(*n))),
        Some((Token::Double(x), _)) => Ok(Pattern::Literal(LiteralValue::Double(*x))),
        Some((Token::Bool(b), _)) => Ok(Pattern::Literal(LiteralValue::Bool(*b))),
        Some((Token::Char(c), _)) => Ok(Pattern::Literal(LiteralValue::Char(*c))),
        Some((Token::Str(raw), _)) => Ok(Pattern::Str(raw.clone())),
        Some((Token::Minus, line)) => match tokens.next() {
            Some((Token::Integer(n), _)) => Ok(Pattern::Literal(LiteralValue::Integer(-n))),
            Some((Token::Double(x), _)) => Ok(Pattern::Literal(LiteralValue::Double(-x))),
            _ => Err(ParseError::UnexpectedToken { token: "Expected number after '-' in pattern".to_string(),
                                                   line:  *line, }),
        },
        Some((Token::TypeName(enum_name), _)) => {
            expect(tokens, &Token::ColonColon, "'::' in variant pattern")?;
            let variant = parse_type_name(tokens)?;
            let fields = if eat(tokens, &Token::LParen) {
                parse_comma_separated(tokens, parse_pattern, &Token::RParen)?
            } else {
                Vec::new()
            };
            Ok(Pattern::Variant { enum_name: enum_name.clone(),
                                  variant,
                                  fields })
        },
        Some((tok, line)) => {
            Err(ParseError::UnexpectedToken { token: format!("Expected pattern, found {tok:?}"),
                                              line:  *line, })
        },
        None => Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    }
}

/// Parses `test "name" { ... }`. The name is optional.
pub fn parse_test<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let name = match tokens.peek() {
        Some((Token::Str(name), _)) => {
            tokens.next();
            name.clone()
        },
        _ => format!("test on line {line}"),
    };
    let body = parse_block(tokens)?;

    Ok(Expr::Test { name,
                    body: body.into(),
                    line })
}
