use std::{fmt, rc::Rc};

use ordered_float::OrderedFloat;

use crate::{
    ast::LiteralValue,
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{function::Function, types::Type},
    },
};

/// The native data behind a [`Value`].
#[derive(Debug, Clone)]
pub enum Payload {
    /// No data.
    Unit,
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit float. Wrapped in `OrderedFloat` so payload equality is total
    /// and re-evaluating the same literal always compares equal.
    Double(OrderedFloat<f64>),
    /// Owned text.
    String(String),
    /// A single character.
    Char(char),
    /// A boolean.
    Bool(bool),
    /// A closure, native function or partial application.
    Function(Rc<Function>),
    /// Ordered `(key, value)` entries of a map literal.
    Map(Rc<Vec<(String, Value)>>),
    /// Ordered `(member, value)` fields of a struct instance.
    Struct(Rc<Vec<(String, Value)>>),
    /// An enum variant and its associated values.
    Variant {
        /// The variant name.
        name:   String,
        /// Associated values in declaration order.
        fields: Rc<Vec<Value>>,
    },
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Unit, Self::Unit) => true,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Double(a), Self::Double(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Map(a), Self::Map(b)) | (Self::Struct(a), Self::Struct(b)) => a == b,
            (Self::Variant { name: n1, fields: f1 }, Self::Variant { name: n2, fields: f2 }) => {
                n1 == n2 && f1 == f2
            },
            _ => false,
        }
    }
}

/// A runtime value: a type tag plus its payload.
///
/// The `ty` field is authoritative. A map re-tagged as a struct instance, for
/// example, is a struct from then on regardless of how it was built.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    /// The value's type.
    pub ty:      Type,
    /// The value's data.
    pub payload: Payload,
}

impl Value {
    /// The unit value `()`.
    #[must_use]
    pub const fn unit() -> Self {
        Self { ty:      Type::UNIT,
               payload: Payload::Unit, }
    }

    /// Creates an `Int` value.
    ///
    /// # Example
    /// ```
    /// use moonpad::interpreter::value::{core::Value, types::Type};
    ///
    /// let v = Value::int(42);
    /// assert_eq!(v.ty, Type::INT);
    /// assert_eq!(v.to_string(), "42");
    /// ```
    #[must_use]
    pub const fn int(n: i64) -> Self {
        Self { ty:      Type::INT,
               payload: Payload::Int(n), }
    }

    /// Creates a `Double` value.
    #[must_use]
    pub const fn double(x: f64) -> Self {
        Self { ty:      Type::DOUBLE,
               payload: Payload::Double(OrderedFloat(x)), }
    }

    /// Creates a `String` value.
    #[must_use]
    pub fn string(s: impl Into<String>) -> Self {
        Self { ty:      Type::STRING,
               payload: Payload::String(s.into()), }
    }

    /// Creates a `Bool` value.
    #[must_use]
    pub const fn bool(b: bool) -> Self {
        Self { ty:      Type::BOOL,
               payload: Payload::Bool(b), }
    }

    /// Creates a `Char` value.
    #[must_use]
    pub const fn char(c: char) -> Self {
        Self { ty:      Type::CHAR,
               payload: Payload::Char(c), }
    }

    /// Wraps a function, tagging it with its signature.
    #[must_use]
    pub fn function(func: Function) -> Self {
        Self { ty:      func.signature(),
               payload: Payload::Function(Rc::new(func)), }
    }

    /// Creates an untyped map value from ordered entries.
    #[must_use]
    pub fn map(entries: Vec<(String, Self)>) -> Self {
        Self { ty:      Type::Map,
               payload: Payload::Map(Rc::new(entries)), }
    }

    /// Returns `true` if the value is `()`.
    #[must_use]
    pub const fn is_unit(&self) -> bool {
        matches!(self.payload, Payload::Unit)
    }

    /// Returns the integer payload, if any.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self.payload {
            Payload::Int(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the boolean payload, or a type mismatch naming `Bool`.
    ///
    /// Used for conditions in `if`, `while`, `for` and `assert`.
    ///
    /// # Errors
    /// `RuntimeError::TypeMismatch` when the value is not a `Bool`.
    pub fn as_bool(&self, line: usize) -> EvalResult<bool> {
        match self.payload {
            Payload::Bool(b) => Ok(b),
            _ => Err(RuntimeError::TypeMismatch { expected: Type::BOOL.name(),
                                                  found: self.ty.name(),
                                                  line }),
        }
    }

    /// Returns the function payload, if any.
    #[must_use]
    pub fn as_function(&self) -> Option<Rc<Function>> {
        match &self.payload {
            Payload::Function(f) => Some(Rc::clone(f)),
            _ => None,
        }
    }

    /// Returns the ordered entries of a map or struct instance.
    #[must_use]
    pub fn entries(&self) -> Option<&[(String, Self)]> {
        match &self.payload {
            Payload::Map(entries) | Payload::Struct(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up a map entry or struct field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Self> {
        self.entries()?
            .iter()
            .find_map(|(key, value)| (key == name).then_some(value))
    }

    /// Checks this value against an expected type.
    ///
    /// A value conforms when its tag equals `expected` or `expected` is
    /// generic. A map whose entries pass [`crate::interpreter::value::types::StructType::matches_entries`]
    /// conforms to that struct type and is re-tagged as an instance of it.
    ///
    /// # Errors
    /// `RuntimeError::TypeMismatch` when the value does not conform.
    ///
    /// # Example
    /// ```
    /// use moonpad::interpreter::value::{core::Value, types::Type};
    ///
    /// assert!(Value::int(1).conform(&Type::INT, 1).is_ok());
    /// assert!(Value::int(1).conform(&Type::STRING, 1).is_err());
    /// ```
    pub fn conform(self, expected: &Type, line: usize) -> EvalResult<Self> {
        if expected.accepts(&self.ty) {
            return Ok(self);
        }

        if let Type::Struct(struct_type) = expected
           && let Payload::Map(entries) = &self.payload
           && struct_type.matches_entries(entries)
        {
            return Ok(Self { ty:      expected.clone(),
                             payload: Payload::Struct(Rc::clone(entries)), });
        }

        Err(RuntimeError::TypeMismatch { expected: expected.name(),
                                         found: self.ty.name(),
                                         line })
    }

    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Payload::String(s) => write!(f, "{s:?}"),
            Payload::Char(c) => write!(f, "{c:?}"),
            _ => write!(f, "{self}"),
        }
    }
}

fn fmt_entries(entries: &[(String, Value)], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{{")?;
    for (index, (key, value)) in entries.iter().enumerate() {
        if index > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{key}: ")?;
        value.fmt_nested(f)?;
    }
    write!(f, "}}")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Payload::Unit => write!(f, "()"),
            Payload::Int(n) => write!(f, "{n}"),
            Payload::Double(x) => write!(f, "{x}"),
            Payload::String(s) => write!(f, "{s}"),
            Payload::Char(c) => write!(f, "{c}"),
            Payload::Bool(b) => write!(f, "{b}"),
            Payload::Function(func) => write!(f, "[{}]", func.signature()),
            Payload::Map(entries) => fmt_entries(entries, f),
            Payload::Struct(entries) => {
                write!(f, "{} ", self.ty)?;
                fmt_entries(entries, f)
            },
            Payload::Variant { name, fields } => {
                write!(f, "{name}")?;
                if !fields.is_empty() {
                    write!(f, "(")?;
                    for (index, value) in fields.iter().enumerate() {
                        if index > 0 {
                            write!(f, ", ")?;
                        }
                        value.fmt_nested(f)?;
                    }
                    write!(f, ")")?;
                }
                Ok(())
            },
        }
    }
}

impl From<LiteralValue> for Value {
    fn from(lit: LiteralValue) -> Self {
        match lit {
            LiteralValue::Integer(n) => Self::int(n),
            LiteralValue::Double(x) => Self::double(x),
            LiteralValue::Bool(b) => Self::bool(b),
            LiteralValue::Char(c) => Self::char(c),
        }
    }
}
