use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Session},
        value::{
            core::Value,
            function::{Function, Param},
            types::Type,
        },
    },
};

/// Type alias for builtin function handlers.
///
/// A builtin receives the already type-checked arguments and the line number
/// of the call.
type BuiltinFn = fn(&[Value], usize) -> EvalResult<Value>;

/// Defines builtin functions by generating a lookup table and a name list.
///
/// Each entry provides:
/// - a string name,
/// - the parameter list as `name: Type` pairs,
/// - the return type,
/// - a function pointer implementing the builtin.
///
/// The macro produces:
/// - `BuiltinDef` (internal metadata),
/// - `BUILTIN_TABLE` (table walked by [`install`]),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                params: [$($param:literal: $ty:expr),* $(,)?],
                returns: $ret:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        struct BuiltinDef {
            name:    &'static str,
            params:  fn() -> Vec<Param>,
            returns: fn() -> Type,
            func:    BuiltinFn,
        }
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name:    $name,
                             params:  || vec![$(Param::new($param, $ty)),*],
                             returns: || $ret,
                             func:    $func },
            )*
        ];
        /// Names of the functions seeded into every new session.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "println"   => { params: ["value": Type::Generic("T".to_string())], returns: Type::UNIT,   func: println },
    "assert"    => { params: ["condition": Type::BOOL],                 returns: Type::UNIT,   func: assert },
    "to_string" => { params: ["value": Type::Generic("T".to_string())], returns: Type::STRING, func: to_string },
}

/// Installs every builtin into the session's global frame.
pub fn install(session: &mut Session) {
    for builtin in BUILTIN_TABLE {
        let func = builtin.func;
        session.add_function(builtin.name,
                             Function::native(builtin.name,
                                              (builtin.params)(),
                                              (builtin.returns)(),
                                              move |args, line| func(args, line)));
    }
}

/// Returns the only argument, or `ArgumentCountMismatch` if there is not
/// exactly one.
fn single<'a>(name: &str, args: &'a [Value], line: usize) -> EvalResult<&'a Value> {
    match args {
        [value] => Ok(value),
        _ => Err(RuntimeError::ArgumentCountMismatch { name: name.to_string(),
                                                       expected: 1,
                                                       found: args.len(),
                                                       line }),
    }
}

/// Prints a value to standard output using its `Display` form.
///
/// # Returns
/// `()`.
///
/// # Example
/// ```
/// use moonpad::interpreter::{evaluator::builtin::println, value::core::Value};
///
/// let result = println(&[Value::string("hello")], 1).unwrap();
/// assert!(result.is_unit());
/// ```
pub fn println(args: &[Value], line: usize) -> EvalResult<Value> {
    let value = single("println", args, line)?;
    println!("{value}");
    Ok(Value::unit())
}

/// Fails with `AssertionFailed` unless the argument is `true`.
///
/// # Errors
/// - `AssertionFailed` if the condition is `false`.
/// - `TypeMismatch` if the argument is not a `Bool`.
pub fn assert(args: &[Value], line: usize) -> EvalResult<Value> {
    if single("assert", args, line)?.as_bool(line)? {
        Ok(Value::unit())
    } else {
        Err(RuntimeError::AssertionFailed { line })
    }
}

/// Renders any value to a `String` the way the REPL would print it.
///
/// # Example
/// ```
/// use moonpad::interpreter::{evaluator::builtin::to_string, value::core::Value};
///
/// assert_eq!(to_string(&[Value::int(42)], 1).unwrap(), Value::string("42"));
/// ```
pub fn to_string(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::string(single("to_string", args, line)?.to_string()))
}
