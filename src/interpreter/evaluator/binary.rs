use std::cmp::Ordering;

use ordered_float::OrderedFloat;

use crate::{
    ast::{BinaryOperator, Expr, UnaryOperator},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Session},
        value::core::{Payload, Value},
    },
};

impl Session {
    /// Evaluates an addition- or multiplication-level operation.
    ///
    /// Both operands are evaluated left to right and must carry the same type
    /// tag. The result keeps the left operand's type.
    pub(crate) fn eval_binary(&mut self,
                              left: &Expr,
                              op: BinaryOperator,
                              right: &Expr,
                              line: usize)
                              -> EvalResult<Value> {
        let left = self.eval_expr(left)?;
        let right = self.eval_expr(right)?;
        arithmetic(op, &left, &right, line)
    }

    /// Evaluates a comparison chain as a left-to-right fold.
    ///
    /// Each operator compares the running result against the next operand,
    /// and the boolean outcome becomes the new running result. So
    /// `1 < 2 == true` is `(1 < 2) == true`, and `1 < 2 < 3` compares `true`
    /// with `3` and fails with a type mismatch.
    pub(crate) fn eval_comparison(&mut self,
                                  first: &Expr,
                                  rest: &[(BinaryOperator, Expr)],
                                  line: usize)
                                  -> EvalResult<Value> {
        let mut acc = self.eval_expr(first)?;
        for (op, operand) in rest {
            let rhs = self.eval_expr(operand)?;
            acc = Value::bool(compare(*op, &acc, &rhs, line)?);
        }
        Ok(acc)
    }

    /// Evaluates a prefix operator.
    ///
    /// - `-` negates `Int` and `Double` operands.
    /// - `!` inverts `Bool` operands.
    pub(crate) fn eval_unary(&mut self,
                             op: UnaryOperator,
                             expr: &Expr,
                             line: usize)
                             -> EvalResult<Value> {
        let value = self.eval_expr(expr)?;
        let payload = match (op, &value.payload) {
            (UnaryOperator::Negate, Payload::Int(n)) => {
                Payload::Int(n.checked_neg().ok_or(RuntimeError::Overflow { line })?)
            },
            (UnaryOperator::Negate, Payload::Double(x)) => Payload::Double(-*x),
            (UnaryOperator::Not, Payload::Bool(b)) => Payload::Bool(!b),
            _ => {
                return Err(RuntimeError::UnsupportedOperator { op: op.to_string(),
                                                               ty: value.ty.name(),
                                                               line });
            },
        };
        Ok(Value { ty: value.ty,
                   payload })
    }
}

/// Applies an arithmetic operator to two values of the same type.
///
/// - `Int` arithmetic is checked: division or modulo by zero and overflow
///   are errors.
/// - `Double` arithmetic follows IEEE 754.
/// - `String + String` concatenates.
///
/// # Errors
/// - `TypeMismatch` if the operand types differ.
/// - `UnsupportedOperator` if the type has no such operator.
/// - `DivisionByZero` or `Overflow` for faulty `Int` arithmetic.
///
/// # Example
/// ```
/// use moonpad::{
///     ast::BinaryOperator,
///     interpreter::{evaluator::binary::arithmetic, value::core::Value},
/// };
///
/// let sum = arithmetic(BinaryOperator::Add, &Value::int(2), &Value::int(3), 1).unwrap();
/// assert_eq!(sum, Value::int(5));
///
/// assert!(arithmetic(BinaryOperator::Add, &Value::int(1), &Value::string("2"), 1).is_err());
/// ```
pub fn arithmetic(op: BinaryOperator, left: &Value, right: &Value, line: usize) -> EvalResult<Value> {
    if left.ty != right.ty {
        return Err(RuntimeError::TypeMismatch { expected: left.ty.name(),
                                                found: right.ty.name(),
                                                line });
    }

    let payload = match (&left.payload, &right.payload) {
        (Payload::Int(a), Payload::Int(b)) => Payload::Int(int_arithmetic(op, *a, *b, line)?),
        (Payload::Double(a), Payload::Double(b)) => {
            let (a, b) = (a.into_inner(), b.into_inner());
            let result = match op {
                BinaryOperator::Add => a + b,
                BinaryOperator::Sub => a - b,
                BinaryOperator::Mul => a * b,
                BinaryOperator::Div => a / b,
                BinaryOperator::Mod => a % b,
                _ => return Err(unsupported(op, left, line)),
            };
            Payload::Double(OrderedFloat(result))
        },
        (Payload::String(a), Payload::String(b)) if op == BinaryOperator::Add => {
            Payload::String(format!("{a}{b}"))
        },
        _ => return Err(unsupported(op, left, line)),
    };

    Ok(Value { ty: left.ty.clone(),
               payload })
}

fn int_arithmetic(op: BinaryOperator, a: i64, b: i64, line: usize) -> EvalResult<i64> {
    let result = match op {
        BinaryOperator::Add => a.checked_add(b),
        BinaryOperator::Sub => a.checked_sub(b),
        BinaryOperator::Mul => a.checked_mul(b),
        BinaryOperator::Div | BinaryOperator::Mod if b == 0 => {
            return Err(RuntimeError::DivisionByZero { line });
        },
        BinaryOperator::Div => a.checked_div(b),
        BinaryOperator::Mod => a.checked_rem(b),
        _ => {
            return Err(RuntimeError::UnsupportedOperator { op: op.to_string(),
                                                           ty: "Int".to_string(),
                                                           line });
        },
    };
    result.ok_or(RuntimeError::Overflow { line })
}

/// Compares two values of the same type.
///
/// `==` and `!=` work on every type. Ordering operators work on `Int`,
/// `Double`, `String`, `Char` and `Bool`.
///
/// # Errors
/// - `TypeMismatch` if the operand types differ.
/// - `UnsupportedOperator` for an ordering operator on an unordered type.
pub fn compare(op: BinaryOperator, left: &Value, right: &Value, line: usize) -> EvalResult<bool> {
    if left.ty != right.ty {
        return Err(RuntimeError::TypeMismatch { expected: left.ty.name(),
                                                found: right.ty.name(),
                                                line });
    }

    match op {
        BinaryOperator::Equal => return Ok(left.payload == right.payload),
        BinaryOperator::NotEqual => return Ok(left.payload != right.payload),
        _ => {},
    }

    let ordering = match (&left.payload, &right.payload) {
        (Payload::Int(a), Payload::Int(b)) => a.cmp(b),
        (Payload::Double(a), Payload::Double(b)) => a.cmp(b),
        (Payload::String(a), Payload::String(b)) => a.cmp(b),
        (Payload::Char(a), Payload::Char(b)) => a.cmp(b),
        (Payload::Bool(a), Payload::Bool(b)) => a.cmp(b),
        _ => return Err(unsupported(op, left, line)),
    };

    Ok(match op {
        BinaryOperator::Less => ordering == Ordering::Less,
        BinaryOperator::Greater => ordering == Ordering::Greater,
        BinaryOperator::LessEqual => ordering != Ordering::Greater,
        BinaryOperator::GreaterEqual => ordering != Ordering::Less,
        _ => return Err(unsupported(op, left, line)),
    })
}

fn unsupported(op: BinaryOperator, value: &Value, line: usize) -> RuntimeError {
    RuntimeError::UnsupportedOperator { op: op.to_string(),
                                        ty: value.ty.name(),
                                        line }
}
