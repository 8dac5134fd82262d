/// Parsing errors.
///
/// Defines all error types that can occur during lexing and parsing of source
/// code. Parse errors include syntax mistakes, unexpected tokens, unrecognized
/// characters, and malformed declarations.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation, including
/// the incomplete-block signal the REPL uses to request continuation input.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
use thiserror::Error;

/// The coarse classification a caller branches on.
///
/// Only [`ErrorKind::MissingRCurly`] is recoverable: the REPL keeps the
/// accumulated input and prompts for more. Every other kind discards it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A block was opened with `{` but input ended before its `}`.
    MissingRCurly,
    /// Operand, argument, annotation or assignment types are incompatible.
    TypeMismatch,
    /// A `derive` clause or trait bound names an unregistered trait.
    TraitNotFound,
    /// A function declaration wrote `->` without a type.
    MissingReturnType,
    /// The right-hand side of `|>` is not a function.
    UnsupportedExpressionAfterPipeOperator,
    /// An argument does not match its parameter type.
    InvalidArgumentType,
    /// Unknown names, wrong arity, immutable targets and similar lookups.
    Reference,
    /// Division by zero and integer overflow.
    Arithmetic,
    /// Lexing and parsing failures.
    Syntax,
    /// Failed assertions and non-exhaustive matches.
    Runtime,
}

/// The error returned by [`crate::interpreter::evaluator::core::Session::eval`].
#[derive(Debug, Error)]
pub enum EvalError {
    /// The source could not be tokenized or parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The syntax tree could not be evaluated.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl EvalError {
    /// Classifies the error.
    ///
    /// # Example
    /// ```
    /// use moonpad::{error::ErrorKind, interpreter::evaluator::core::Session};
    ///
    /// let mut session = Session::new();
    /// let err = session.eval("while true {").unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::MissingRCurly);
    /// ```
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse(_) => ErrorKind::Syntax,
            Self::Runtime(e) => e.kind(),
        }
    }

    /// Returns `true` when the input was an unterminated block.
    #[must_use]
    pub const fn is_incomplete(&self) -> bool {
        matches!(self.kind(), ErrorKind::MissingRCurly)
    }
}

impl RuntimeError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingRCurly { .. } => ErrorKind::MissingRCurly,
            Self::TypeMismatch { .. } | Self::UnsupportedOperator { .. } => ErrorKind::TypeMismatch,
            Self::TraitNotFound { .. } => ErrorKind::TraitNotFound,
            Self::MissingReturnType { .. } => ErrorKind::MissingReturnType,
            Self::UnsupportedExpressionAfterPipeOperator { .. } => {
                ErrorKind::UnsupportedExpressionAfterPipeOperator
            },
            Self::InvalidArgumentType { .. } => ErrorKind::InvalidArgumentType,
            Self::UndefinedVariable { .. }
            | Self::UnknownType { .. }
            | Self::ImmutableAssignment { .. }
            | Self::ImmutableField { .. }
            | Self::ArgumentCountMismatch { .. }
            | Self::NotCallable { .. }
            | Self::UnknownField { .. }
            | Self::UnknownVariant { .. } => ErrorKind::Reference,
            Self::DivisionByZero { .. } | Self::Overflow { .. } => ErrorKind::Arithmetic,
            Self::UnterminatedTemplate { .. } | Self::InvalidTemplate { .. } => ErrorKind::Syntax,
            Self::NoMatchingArm { .. } | Self::AssertionFailed { .. } => ErrorKind::Runtime,
        }
    }
}
