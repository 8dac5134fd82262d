use thiserror::Error;

use crate::error::ParseError;

#[derive(Debug, Error)]
/// Represents all errors that can occur during evaluation.
pub enum RuntimeError {
    /// A block-carrying construct was parsed without its closing `}`.
    ///
    /// This is the only error the REPL recovers from, by asking for more
    /// input and re-submitting the accumulated text.
    #[error("Error on line {line}: Missing '}}' to close {construct}.")]
    MissingRCurly {
        /// The construct whose block is unterminated.
        construct: &'static str,
        /// The source line where the construct starts.
        line:      usize,
    },
    /// Two values (or a value and an annotation) have incompatible types.
    #[error("Error on line {line}: Type mismatch: expected {expected}, found {found}.")]
    TypeMismatch {
        /// The type that was required.
        expected: String,
        /// The type that was supplied.
        found:    String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A `derive(...)` clause or trait bound names an unregistered trait.
    #[error("Error on line {line}: Trait '{name}' not found.")]
    TraitNotFound {
        /// The trait name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A function declaration wrote `->` without a type after it.
    #[error("Error on line {line}: Missing return type for function '{name}'.")]
    MissingReturnType {
        /// The function name, or `<anonymous>`.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// The right-hand side of `|>` did not evaluate to a function.
    #[error("Error on line {line}: Unsupported expression after '|>': expected a function, found {found}.")]
    UnsupportedExpressionAfterPipeOperator {
        /// The type of the value that was found.
        found: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// An argument did not match the declared parameter type.
    #[error("Error on line {line}: Invalid argument '{param}' for '{function}': expected {expected}, found {found}.")]
    InvalidArgumentType {
        /// The called function, or `<anonymous>`.
        function: String,
        /// The parameter name.
        param:    String,
        /// The declared parameter type.
        expected: String,
        /// The type of the supplied argument.
        found:    String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// Tried to use an undefined variable or function.
    #[error("Error on line {line}: Variable '{name}' is not defined.")]
    UndefinedVariable {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A type annotation named an unknown type.
    #[error("Error on line {line}: Unknown type '{name}'.")]
    UnknownType {
        /// The type name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Assigned to a binding declared without `mut`.
    #[error("Error on line {line}: Cannot assign twice to immutable variable '{name}'.")]
    ImmutableAssignment {
        /// The name of the binding.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Assigned to a struct member declared without `mut`.
    #[error("Error on line {line}: Field '{field}' of {ty} is immutable.")]
    ImmutableField {
        /// The field name.
        field: String,
        /// The struct type name.
        ty:    String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// Supplied more arguments than a function (or variant) accepts.
    #[error("Error on line {line}: '{name}' expects {expected} argument(s), found {found}.")]
    ArgumentCountMismatch {
        /// The function or variant name.
        name:     String,
        /// The declared arity.
        expected: usize,
        /// The number of supplied arguments.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// Called a value that is not a function.
    #[error("Error on line {line}: Value of type {found} is not callable.")]
    NotCallable {
        /// The type of the value.
        found: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// Accessed a field that the value does not have.
    #[error("Error on line {line}: Type {ty} has no field '{field}'.")]
    UnknownField {
        /// The field name.
        field: String,
        /// The type of the accessed value.
        ty:    String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// Constructed an enum variant that does not exist.
    #[error("Error on line {line}: Enum {enum_name} has no variant '{variant}'.")]
    UnknownVariant {
        /// The enum type name.
        enum_name: String,
        /// The variant name.
        variant:   String,
        /// The source line where the error occurred.
        line:      usize,
    },
    /// An operator was applied to a type that does not support it.
    #[error("Error on line {line}: Cannot apply '{op}' to {ty}.")]
    UnsupportedOperator {
        /// The operator symbol.
        op:   String,
        /// The operand type.
        ty:   String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Attempted integer division by zero.
    #[error("Error on line {line}: Division by zero.")]
    DivisionByZero {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Integer arithmetic overflowed.
    #[error("Error on line {line}: Integer overflow while trying to compute result.")]
    Overflow {
        /// The source line where the error occurred.
        line: usize,
    },
    /// No `match` arm accepted the scrutinee.
    #[error("Error on line {line}: No match arm accepts {value}.")]
    NoMatchingArm {
        /// The rendered scrutinee.
        value: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// An `assert` call received `false`.
    #[error("Error on line {line}: Assertion failed.")]
    AssertionFailed {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A `\{` template span inside a string has no closing `}`.
    #[error("Error on line {line}: Unterminated string template.")]
    UnterminatedTemplate {
        /// The source line where the error occurred.
        line: usize,
    },
    /// The text inside a `\{ ... }` template span failed to parse.
    #[error("Error on line {line}: Invalid string template: {source}")]
    InvalidTemplate {
        /// The underlying parse failure.
        #[source]
        source: Box<ParseError>,
        /// The source line of the string literal.
        line:   usize,
    },
}
