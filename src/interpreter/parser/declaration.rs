use std::iter::Peekable;

use crate::{
    ast::{
        EnumDecl, FnDecl, MemberDecl, MethodSig, ParamDecl, ReturnType, StructDecl, TraitDecl,
        TypeExpr, VariantDecl,
    },
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            block::parse_block,
            core::ParseResult,
            types::{parse_type, starts_type},
            utils::{
                eat, expect, parse_comma_separated, parse_identifier, parse_type_name,
                skip_separators,
            },
        },
    },
};

/// Parses a function declaration or anonymous function.
///
/// Syntax:
/// ```text
///     fn [name] [( param: Type, ... )] [-> Type] { body }
/// ```
///
/// An `->` that is not followed by a type is kept as
/// [`ReturnType::Missing`] so the evaluator can report it by name.
///
/// # Parameters
/// - `tokens`: Token stream positioned after the `fn` keyword.
/// - `line`: Line number of the `fn` token.
///
/// # Errors
/// - `UnexpectedToken` for malformed parameters.
/// - Propagates errors from parameter types, the return type and the body.
pub fn parse_fn<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<FnDecl>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let name = match tokens.peek() {
        Some((Token::Identifier(name), _)) => {
            tokens.next();
            Some(name.clone())
        },
        _ => None,
    };

    let params = if eat(tokens, &Token::LParen) {
        parse_comma_separated(tokens, parse_param, &Token::RParen)?
    } else {
        Vec::new()
    };

    let return_type = if eat(tokens, &Token::Arrow) {
        if starts_type(tokens) {
            ReturnType::Declared(parse_type(tokens)?)
        } else {
            ReturnType::Missing
        }
    } else {
        ReturnType::Implicit
    };

    let body = parse_block(tokens)?;

    Ok(FnDecl { name,
                params,
                return_type,
                body: body.into(),
                line })
}

/// Parses `name: Type`.
fn parse_param<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ParamDecl>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let name = parse_identifier(tokens)?;
    expect(tokens, &Token::Colon, "':' after parameter name")?;
    let ty = parse_type(tokens)?;
    Ok(ParamDecl { name, ty })
}

/// Parses the member list shared by `struct`, `enum` and `trait` bodies.
///
/// Members are parsed with `parse_member` until one of:
/// - `}`, which closes the body; a `derive(...)` may follow it,
/// - `derive(...)`, which ends the member list; a `}` may follow it,
/// - the end of input, which leaves the body open.
///
/// # Returns
/// The members, the derive list and whether the closing `}` was seen.
fn parse_declaration_body<'a, I, T>(tokens: &mut Peekable<I>,
                                    construct: &'static str,
                                    parse_member: impl Fn(&mut Peekable<I>) -> ParseResult<T>)
                                    -> ParseResult<(Vec<T>, Vec<String>, bool)>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    match tokens.next() {
        Some((Token::LBrace, _)) => {},
        Some((tok, line)) => {
            return Err(ParseError::InvalidDeclaration { construct,
                                                        details: format!("expected '{{', found {tok:?}"),
                                                        line: *line });
        },
        None => return Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    }

    let mut members = Vec::new();
    let mut derives = Vec::new();
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
            Some((Token::Derive, _)) => {
                derives = parse_derive(tokens)?;
                skip_separators(tokens);
                closed = eat(tokens, &Token::RBrace);
                return Ok((members, derives, closed));
            },
            Some(_) => members.push(parse_member(tokens)?),
        }
    }

    if closed && let Some((Token::Derive, _)) = tokens.peek() {
        derives = parse_derive(tokens)?;
    }

    Ok((members, derives, closed))
}

/// Parses `derive(TraitA, TraitB, ...)`.
fn parse_derive<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Vec<String>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    expect(tokens, &Token::Derive, "'derive'")?;
    expect(tokens, &Token::LParen, "'(' after derive")?;
    parse_comma_separated(tokens, parse_type_name, &Token::RParen)
}

/// Parses a `struct` declaration.
///
/// Syntax:
/// ```text
///     struct Name { [mut] member: Type, ... } [derive(Trait, ...)]
/// ```
///
/// # Parameters
/// - `tokens`: Token stream positioned after the `struct` keyword.
/// - `line`: Line number of the `struct` token.
pub fn parse_struct<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<StructDecl>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let name = declaration_name(tokens, "struct", line)?;
    let (members, derives, closed) = parse_declaration_body(tokens, "struct", parse_member)?;

    Ok(StructDecl { name,
                    members,
                    derives,
                    closed,
                    line })
}

fn parse_member<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<MemberDecl>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mutable = eat(tokens, &Token::Mut);
    let name = parse_identifier(tokens)?;
    expect(tokens, &Token::Colon, "':' after member name")?;
    let ty = parse_type(tokens)?;

    Ok(MemberDecl { name,
                    ty,
                    mutable })
}

/// Parses an `enum` declaration.
///
/// Syntax:
/// ```text
///     enum Name { Variant, Variant(Type, ...), ... } [derive(Trait, ...)]
/// ```
pub fn parse_enum<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<EnumDecl>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let name = declaration_name(tokens, "enum", line)?;
    let (variants, derives, closed) = parse_declaration_body(tokens, "enum", parse_variant)?;

    Ok(EnumDecl { name,
                  variants,
                  derives,
                  closed,
                  line })
}

fn parse_variant<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<VariantDecl>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let name = parse_type_name(tokens)?;
    let fields = if eat(tokens, &Token::LParen) {
        parse_comma_separated(tokens, parse_type, &Token::RParen)?
    } else {
        Vec::new()
    };
    Ok(VariantDecl { name, fields })
}

/// Parses a `trait` declaration.
///
/// Syntax:
/// ```text
///     trait Name [: Super + Other] { method(Type, ...) [-> Type], ... }
/// ```
///
/// A trailing `derive(...)` is accepted as another way to list super traits.
pub fn parse_trait<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<TraitDecl>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let name = declaration_name(tokens, "trait", line)?;

    let mut supertraits = Vec::new();
    if eat(tokens, &Token::Colon) {
        supertraits.push(parse_type_name(tokens)?);
        while eat(tokens, &Token::Plus) {
            supertraits.push(parse_type_name(tokens)?);
        }
    }

    let (methods, derives, closed) = parse_declaration_body(tokens, "trait", parse_method)?;
    supertraits.extend(derives);

    Ok(TraitDecl { name,
                   supertraits,
                   methods,
                   closed,
                   line })
}

fn parse_method<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<MethodSig>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let name = parse_identifier(tokens)?;
    expect(tokens, &Token::LParen, "'(' after method name")?;
    let params = parse_comma_separated(tokens, parse_type, &Token::RParen)?;
    let ret = if eat(tokens, &Token::Arrow) {
        parse_type(tokens)?
    } else {
        TypeExpr::Named("Unit".to_string())
    };

    Ok(MethodSig { name,
                   params,
                   ret })
}

fn declaration_name<'a, I>(tokens: &mut Peekable<I>,
                           construct: &'static str,
                           line: usize)
                           -> ParseResult<String>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((Token::TypeName(name), _)) => Ok(name.clone()),
        Some((tok, line)) => {
            Err(ParseError::InvalidDeclaration { construct,
                                                 details: format!("expected a capitalized name, found {tok:?}"),
                                                 line: *line })
        },
        None => Err(ParseError::UnexpectedEndOfInput { line }),
    }
}
