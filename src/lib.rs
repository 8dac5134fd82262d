//! # moonpad
//!
//! moonpad is an interpreter for a small, statically annotated, expression
//! oriented language in the style of MoonBit. It tokenizes, parses and
//! evaluates source text against a persistent session, with support for
//! curried functions, the pipe operator, structs, enums, traits, string
//! templates and REPL continuation of unclosed blocks.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use crate::{
    error::EvalError,
    interpreter::{
        evaluator::core::{Session, SessionConfig},
        value::core::Value,
    },
};

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` enum and related types that represent the
/// syntactic structure of source code as a tree. The tree is built by the
/// parser and walked by the evaluator.
///
/// # Responsibilities
/// - Defines expression, declaration, type annotation and pattern nodes.
/// - Attaches line numbers to nodes for error reporting.
/// - Records which block-carrying nodes were left unclosed.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised while lexing, parsing or
/// evaluating code, each carrying the line it was raised on, plus the coarse
/// `ErrorKind` callers branch on.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Attaches line numbers and detailed messages for context.
/// - Classifies errors so the REPL can recognise incomplete input.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation and value
/// representations to provide a complete runtime for source code evaluation.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, and value
///   types.
/// - Provides entry points for parsing and evaluating user code.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;

pub use interpreter::{lexer::tokenize, parser::core::parse};

/// Evaluates `source` in a fresh session and returns its final value.
///
/// The value is that of the last top-level expression, or `()` for empty
/// input. With `strict` set, assigning to an undefined name fails instead of
/// creating a global.
///
/// # Errors
/// Returns an error if parsing or evaluation fails, including when the source
/// ends inside an unclosed block.
///
/// # Examples
/// ```
/// use moonpad::{get_result, interpreter::value::core::Value};
///
/// let value = get_result("let x = 2 + 2\nx * 10", false).unwrap();
/// assert_eq!(value, Value::int(40));
///
/// // Unknown variable.
/// assert!(get_result("let y = x + 1", false).is_err());
///
/// // Strict mode rejects implicit globals.
/// assert!(get_result("z = 1", false).is_ok());
/// assert!(get_result("z = 1", true).is_err());
/// ```
pub fn get_result(source: &str, strict: bool) -> Result<Value, EvalError> {
    let mut session = Session::with_config(SessionConfig { strict_mode: strict });
    session.eval(source)
}
