use std::iter::Peekable;

use tracing::trace;

use crate::{
    ast::Expr,
    error::ParseError,
    interpreter::{
        lexer::{Token, tokenize},
        parser::{
            binary::parse_comparison,
            block::{parse_brace_expression, parse_map_literal},
            declaration::{parse_enum, parse_fn, parse_struct, parse_trait},
            statement::{
                parse_assignment, parse_for, parse_if, parse_let, parse_match, parse_test,
                parse_while,
            },
            utils::{starts_assignment, starts_map},
        },
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses source text into a list of top-level expressions.
///
/// This is the parsing half of the two composable primitives the evaluator
/// is built on; string templates call it again on their inner text.
///
/// # Errors
/// - Any lexing error from [`tokenize`].
/// - `UnmatchedRCurly` if a `}` closes nothing.
/// - Any error from the grammar rules below.
///
/// # Example
/// ```
/// use moonpad::interpreter::parser::core::parse;
///
/// let exprs = parse("let x = 5; x + 10").unwrap();
/// assert_eq!(exprs.len(), 2);
///
/// assert!(parse("1 + 2 }").is_err());
/// ```
pub fn parse(source: &str) -> ParseResult<Vec<Expr>> {
    let tokens = tokenize(source)?;
    trace!(count = tokens.len(), "tokenized source");

    // Rules that run out of tokens have no line of their own to report.
    let last_line = tokens.last().map_or(1, |(_, line)| *line);
    let mut iter = tokens.iter().peekable();
    let items = parse_row(&mut iter).map_err(|e| match e {
                                        ParseError::UnexpectedEndOfInput { .. } => {
                                            ParseError::UnexpectedEndOfInput { line: last_line }
                                        },
                                        other => other,
                                    })?;

    if let Some((_, line)) = iter.peek() {
        return Err(ParseError::UnmatchedRCurly { line: *line });
    }

    Ok(items)
}

/// Returns the line of the innermost `{` in `source` that no `}` closes.
///
/// Braces inside string literals are part of the string token and are not
/// counted. Returns `None` when every brace is closed or the source does not
/// lex.
///
/// # Example
/// ```
/// use moonpad::interpreter::parser::core::open_brace_line;
///
/// assert_eq!(open_brace_line("fn f() {\n  if x {\n  }\n  g(1,"), Some(1));
/// assert_eq!(open_brace_line("{ \"{\" }"), None);
/// ```
#[must_use]
pub fn open_brace_line(source: &str) -> Option<usize> {
    let tokens = tokenize(source).ok()?;
    let mut open = Vec::new();
    for (token, line) in &tokens {
        match token {
            Token::LBrace => open.push(*line),
            Token::RBrace => {
                open.pop();
            },
            _ => {},
        }
    }
    open.pop()
}

/// Parses a sequence of expressions separated by optional `;`.
///
/// Stops without consuming anything at a `}` or at the end of input, so the
/// caller decides whether a closing brace was present.
///
/// Grammar: `row := (pipeline ";"?)*`
pub fn parse_row<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Vec<Expr>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut items = Vec::new();
    loop {
        match tokens.peek() {
            None | Some((Token::RBrace, _)) => break,
            Some((Token::Semicolon, _)) => {
                tokens.next();
            },
            Some(_) => items.push(parse_pipeline(tokens)?),
        }
    }
    Ok(items)
}

/// Parses an expression followed by any number of `|> expression` stages.
///
/// Grammar: `pipeline := expression ("|>" expression)*`
///
/// # Returns
/// The bare expression when there are no stages, otherwise an
/// `Expr::Pipeline`.
pub fn parse_pipeline<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let head = parse_expression(tokens)?;
    let mut stages = Vec::new();

    while let Some((Token::PipeForward, _)) = tokens.peek() {
        tokens.next();
        stages.push(parse_expression(tokens)?);
    }

    if stages.is_empty() {
        return Ok(head);
    }

    Ok(Expr::Pipeline { line: head.line_number(),
                        head: Box::new(head),
                        stages })
}

/// Parses a single expression.
///
/// Dispatches on the leading token: declaration and statement keywords go to
/// their own rules, `{` becomes a map literal or a block, `name =` and
/// `name.field =` become assignments, and everything else descends through
/// the operator precedence levels starting at comparison.
///
/// Grammar:
/// ```text
/// expression := fnDecl | structDecl | traitDecl | testDecl | letStmt
///             | enumDecl | ifStmt | whileStmt | forStmt | matchStmt
///             | mapLiteral | block | assignment | comparison
/// ```
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    if starts_map(tokens) {
        return parse_map_literal(tokens);
    }
    if starts_assignment(tokens) {
        return parse_assignment(tokens);
    }

    match tokens.peek() {
        Some((Token::Fn, line)) => {
            tokens.next();
            Ok(Expr::Function(parse_fn(tokens, *line)?))
        },
        Some((Token::Struct, line)) => {
            tokens.next();
            Ok(Expr::Struct(parse_struct(tokens, *line)?))
        },
        Some((Token::Enum, line)) => {
            tokens.next();
            Ok(Expr::Enum(parse_enum(tokens, *line)?))
        },
        Some((Token::Trait, line)) => {
            tokens.next();
            Ok(Expr::Trait(parse_trait(tokens, *line)?))
        },
        Some((Token::Test, line)) => {
            tokens.next();
            parse_test(tokens, *line)
        },
        Some((Token::Let, line)) => {
            tokens.next();
            parse_let(tokens, *line)
        },
        Some((Token::If, line)) => {
            tokens.next();
            parse_if(tokens, *line)
        },
        Some((Token::While, line)) => {
            tokens.next();
            parse_while(tokens, *line)
        },
        Some((Token::For, line)) => {
            tokens.next();
            parse_for(tokens, *line)
        },
        Some((Token::Match, line)) => {
            tokens.next();
            parse_match(tokens, *line)
        },
        Some((Token::LBrace, _)) => parse_brace_expression(tokens),
        Some(_) => parse_comparison(tokens),
        None => Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    }
}
