use crate::{
    ast::{Block, Expr, MatchArm, Pattern},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Session, ensure_closed},
        value::core::{Payload, Value},
    },
};

impl Session {
    /// Evaluates an `if` / `else if` / `else` chain.
    ///
    /// Conditions are tested in order and must be `Bool`. The first branch
    /// whose condition holds is evaluated and its value returned. Without a
    /// matching branch or `else`, the result is `()`.
    ///
    /// Every branch block must be closed before any condition is evaluated.
    pub(crate) fn eval_if(&mut self,
                          branches: &[(Expr, Block)],
                          else_block: Option<&Block>,
                          line: usize)
                          -> EvalResult<Value> {
        for (_, block) in branches {
            ensure_closed(block, "if")?;
        }
        if let Some(block) = else_block {
            ensure_closed(block, "else")?;
        }

        for (condition, block) in branches {
            if self.eval_expr(condition)?.as_bool(line)? {
                return self.eval_block(block);
            }
        }

        match else_block {
            Some(block) => self.eval_block(block),
            None => Ok(Value::unit()),
        }
    }

    /// Evaluates a `while` loop.
    ///
    /// The condition and body are re-evaluated from the same tree on every
    /// iteration. The loop yields `()`.
    pub(crate) fn eval_while(&mut self, condition: &Expr, body: &Block) -> EvalResult<Value> {
        ensure_closed(body, "while")?;

        while self.eval_expr(condition)?.as_bool(condition.line_number())? {
            self.eval_block(body)?;
        }

        Ok(Value::unit())
    }

    /// Evaluates a three-clause `for` loop.
    ///
    /// `init` runs once, then the body runs while `condition` holds (forever
    /// if absent), with `step` evaluated after each iteration. The clauses
    /// run in the enclosing scope, so `for i = 0; ...` assigns `i` like any
    /// other assignment. The loop yields `()`.
    pub(crate) fn eval_for(&mut self,
                           init: Option<&Expr>,
                           condition: Option<&Expr>,
                           step: Option<&Expr>,
                           body: &Block)
                           -> EvalResult<Value> {
        ensure_closed(body, "for")?;

        if let Some(init) = init {
            self.eval_expr(init)?;
        }

        loop {
            if let Some(condition) = condition
               && !self.eval_expr(condition)?.as_bool(condition.line_number())?
            {
                break;
            }

            self.eval_block(body)?;

            if let Some(step) = step {
                self.eval_expr(step)?;
            }
        }

        Ok(Value::unit())
    }

    /// Evaluates a `match` expression.
    ///
    /// Arms are tried in order. Each attempt runs in a fresh frame so names
    /// bound by the pattern are visible only in that arm's body.
    ///
    /// # Errors
    /// - `MissingRCurly` if the arm list was not closed.
    /// - `NoMatchingArm` if no pattern accepts the scrutinee.
    pub(crate) fn eval_match(&mut self,
                             scrutinee: &Expr,
                             arms: &[MatchArm],
                             closed: bool,
                             line: usize)
                             -> EvalResult<Value> {
        if !closed {
            return Err(RuntimeError::MissingRCurly { construct: "match",
                                                     line });
        }

        let value = self.eval_expr(scrutinee)?;

        for arm in arms {
            self.push_scope();
            let result = match self.bind_pattern(&arm.pattern, &value, line) {
                Ok(true) => Some(self.eval_expr(&arm.body)),
                Ok(false) => None,
                Err(e) => Some(Err(e)),
            };
            self.pop_scope();

            if let Some(result) = result {
                return result;
            }
        }

        Err(RuntimeError::NoMatchingArm { value: value.to_string(),
                                          line })
    }

    /// Tests `value` against `pattern`, binding names in the innermost frame.
    ///
    /// Returns whether the pattern matched. Bindings made by a partially
    /// matching variant pattern are left in the frame; the caller discards
    /// the frame.
    fn bind_pattern(&mut self, pattern: &Pattern, value: &Value, line: usize) -> EvalResult<bool> {
        match pattern {
            Pattern::Wildcard => Ok(true),
            Pattern::Binding(name) => {
                self.scopes.define_local(name, value.clone(), false);
                Ok(true)
            },
            Pattern::Literal(literal) => Ok(Value::from(*literal) == *value),
            Pattern::Str(raw) => Ok(self.eval_string(raw, line)? == *value),
            Pattern::Variant { enum_name,
                               variant,
                               fields, } => {
                let expected = self.types.resolve_name(enum_name, line)?;
                if value.ty != expected {
                    return Ok(false);
                }
                let Payload::Variant { name, fields: values } = &value.payload else {
                    return Ok(false);
                };
                if name != variant || fields.len() != values.len() {
                    return Ok(false);
                }
                for (pattern, value) in fields.iter().zip(values.iter()) {
                    if !self.bind_pattern(pattern, value, line)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            },
        }
    }
}
