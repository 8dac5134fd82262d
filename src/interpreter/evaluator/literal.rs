use std::rc::Rc;

use tracing::trace;

use crate::{
    ast::Expr,
    error::{ParseError, RuntimeError},
    interpreter::{
        evaluator::core::{EvalResult, Session},
        parser::core::parse,
        value::{
            core::{Payload, Value},
            types::Type,
        },
    },
};

impl Session {
    /// Evaluates the raw text of a string literal.
    ///
    /// Escapes `\n`, `\t`, `\r`, `\"` and `\\` are resolved. Each template
    /// span `\{ ... }` is parsed and evaluated in the current session, and
    /// the rendered result replaces the span. Spans may contain braces as
    /// long as they balance. Any other backslash sequence is kept as written.
    ///
    /// # Errors
    /// - `UnterminatedTemplate` if a span has no closing `}`.
    /// - `InvalidTemplate` if a span's text fails to parse.
    /// - Any error raised while evaluating a span.
    pub(crate) fn eval_string(&mut self, raw: &str, line: usize) -> EvalResult<Value> {
        let mut out = String::with_capacity(raw.len());
        let mut chars = raw.char_indices();

        while let Some((_, c)) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }

            match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 't')) => out.push('\t'),
                Some((_, 'r')) => out.push('\r'),
                Some((_, '"')) => out.push('"'),
                Some((_, '\\')) => out.push('\\'),
                Some((open, '{')) => {
                    let start = open + 1;
                    let mut depth = 1usize;
                    let mut end = None;
                    for (index, ch) in chars.by_ref() {
                        match ch {
                            '{' => depth += 1,
                            '}' => {
                                depth -= 1;
                                if depth == 0 {
                                    end = Some(index);
                                    break;
                                }
                            },
                            _ => {},
                        }
                    }
                    let end = end.ok_or(RuntimeError::UnterminatedTemplate { line })?;
                    let value = self.eval_template(&raw[start..end], line)?;
                    out.push_str(&value.to_string());
                },
                Some((_, other)) => {
                    out.push('\\');
                    out.push(other);
                },
                None => out.push('\\'),
            }
        }

        Ok(Value::string(out))
    }

    /// Parses and evaluates the inside of one template span.
    fn eval_template(&mut self, source: &str, line: usize) -> EvalResult<Value> {
        trace!(source, "evaluating string template");
        let invalid = |e: ParseError| RuntimeError::InvalidTemplate { source: Box::new(e),
                                                                      line };
        let exprs = parse(source).map_err(invalid)?;
        if exprs.iter().any(|expr| expr.unclosed().is_some()) {
            return Err(invalid(ParseError::UnexpectedEndOfInput { line }));
        }
        self.evaluate(&exprs)
    }

    /// Evaluates a map literal into an untyped map value.
    ///
    /// Entries are evaluated in source order.
    pub(crate) fn eval_map(&mut self,
                           entries: &[(String, Expr)],
                           closed: bool,
                           line: usize)
                           -> EvalResult<Value> {
        if !closed {
            return Err(RuntimeError::MissingRCurly { construct: "map",
                                                     line });
        }

        let entries = entries.iter()
                             .map(|(key, expr)| Ok((key.clone(), self.eval_expr(expr)?)))
                             .collect::<EvalResult<Vec<_>>>()?;
        Ok(Value::map(entries))
    }

    /// Evaluates `target.field` on a map or struct instance.
    ///
    /// # Errors
    /// `UnknownField` if the value has no entry of that name.
    pub(crate) fn eval_field_access(&mut self,
                                    target: &Expr,
                                    field: &str,
                                    line: usize)
                                    -> EvalResult<Value> {
        let value = self.eval_expr(target)?;
        value.field(field)
             .cloned()
             .ok_or_else(|| RuntimeError::UnknownField { field: field.to_string(),
                                                         ty: value.ty.name(),
                                                         line })
    }

    /// Constructs an enum value: `Enum::Variant` or `Enum::Variant(args)`.
    ///
    /// # Errors
    /// - `UnknownType` if the enum is not declared.
    /// - `TypeMismatch` if the name is a type but not an enum.
    /// - `UnknownVariant` if the enum has no such variant.
    /// - `ArgumentCountMismatch` if the argument count differs from the
    ///   variant's associated types.
    /// - `TypeMismatch` for an argument of the wrong type.
    pub(crate) fn eval_enum_variant(&mut self,
                                    enum_name: &str,
                                    variant: &str,
                                    arguments: &[Expr],
                                    line: usize)
                                    -> EvalResult<Value> {
        let ty = self.types.resolve_name(enum_name, line)?;
        let Type::Enum(enum_type) = &ty else {
            return Err(RuntimeError::TypeMismatch { expected: "an enum".to_string(),
                                                    found: ty.name(),
                                                    line });
        };

        let declared = enum_type.variant(variant)
                                .ok_or_else(|| RuntimeError::UnknownVariant { enum_name:
                                                                                  enum_name.to_string(),
                                                                              variant:
                                                                                  variant.to_string(),
                                                                              line })?
                                .clone();

        if arguments.len() != declared.fields.len() {
            return Err(RuntimeError::ArgumentCountMismatch { name: format!("{enum_name}::{variant}"),
                                                             expected: declared.fields.len(),
                                                             found: arguments.len(),
                                                             line });
        }

        let fields = arguments.iter()
                              .zip(&declared.fields)
                              .map(|(arg, expected)| self.eval_expr(arg)?.conform(expected, line))
                              .collect::<EvalResult<Vec<_>>>()?;

        Ok(Value { ty:      ty.clone(),
                   payload: Payload::Variant { name:   variant.to_string(),
                                               fields: Rc::new(fields), }, })
    }
}
