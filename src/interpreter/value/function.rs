use std::{fmt, rc::Rc};

use crate::{
    ast::Block,
    interpreter::{
        evaluator::core::EvalResult,
        value::{core::Value, types::Type},
    },
};

/// Signature of a native function handler.
///
/// A native receives the already type-checked arguments and the line number
/// of the call for error reporting.
pub type NativeFn = dyn Fn(&[Value], usize) -> EvalResult<Value>;

/// A declared function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Parameter name, bound in the call frame.
    pub name: String,
    /// Declared type.
    pub ty:   Type,
}

impl Param {
    /// Creates a parameter.
    #[must_use]
    pub fn new(name: &str, ty: Type) -> Self {
        Self { name: name.to_string(),
               ty }
    }
}

/// What runs when a function is invoked.
#[derive(Clone)]
pub enum FunctionBody {
    /// A host-provided handler.
    Native(Rc<NativeFn>),
    /// A user-declared body block.
    User(Rc<Block>),
    /// A partial application.
    ///
    /// Invoking it with the remaining arguments calls `original` with those
    /// arguments followed by `supplied`.
    Partial {
        /// The function that was applied to too few arguments.
        original: Rc<Function>,
        /// The arguments supplied so far.
        supplied: Vec<Value>,
    },
}

impl fmt::Debug for FunctionBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native(_) => write!(f, "Native"),
            Self::User(_) => write!(f, "User"),
            Self::Partial { original, supplied } => {
                f.debug_struct("Partial")
                 .field("original", &original.name)
                 .field("supplied", supplied)
                 .finish()
            },
        }
    }
}

/// A callable value: parameter list, return type and body.
///
/// User functions carry no captured environment. Their bodies resolve free
/// names against the session's scope stack at call time.
#[derive(Debug, Clone)]
pub struct Function {
    /// The declared name, if any.
    pub name:        Option<String>,
    /// Parameters in order.
    pub params:      Vec<Param>,
    /// The declared return type.
    pub return_type: Type,
    /// What runs on invocation.
    pub body:        FunctionBody,
}

impl Function {
    /// Creates a native function.
    ///
    /// # Example
    /// ```
    /// use moonpad::interpreter::value::{
    ///     core::Value,
    ///     function::{Function, Param},
    ///     types::Type,
    /// };
    ///
    /// let double = Function::native("double",
    ///                               vec![Param::new("x", Type::INT)],
    ///                               Type::INT,
    ///                               |args, _| Ok(Value::int(args[0].as_int().unwrap_or(0) * 2)));
    ///
    /// assert_eq!(double.signature().to_string(), "(Int) -> Int");
    /// ```
    pub fn native(name: &str,
                  params: Vec<Param>,
                  return_type: Type,
                  handler: impl Fn(&[Value], usize) -> EvalResult<Value> + 'static)
                  -> Self {
        Self { name: Some(name.to_string()),
               params,
               return_type,
               body: FunctionBody::Native(Rc::new(handler)) }
    }

    /// Creates a partial application of `original`.
    ///
    /// The result takes the parameters of `original` that remain after
    /// `supplied.len()` of them are consumed, counted from the front, so it
    /// awaits the trailing parameters.
    #[must_use]
    pub fn partial(original: Rc<Self>, supplied: Vec<Value>) -> Self {
        let params = original.params[supplied.len().min(original.params.len())..].to_vec();
        Self { name: original.name.clone(),
               params,
               return_type: original.return_type.clone(),
               body: FunctionBody::Partial { original, supplied } }
    }

    /// Returns the function's type.
    #[must_use]
    pub fn signature(&self) -> Type {
        Type::function(self.params.iter().map(|p| p.ty.clone()).collect(),
                       self.return_type.clone())
    }

    /// Returns the name used in error messages.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous>")
    }
}
