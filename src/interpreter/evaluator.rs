/// Core evaluation logic and session management.
///
/// Contains `Session`, the public `eval` entry point, test registration and
/// the expression dispatcher.
pub mod core;

/// Lexical frames.
///
/// The scope stack, variable lookup, `let` and assignment.
pub mod scope;

/// The type registry.
///
/// Scoped name-to-type levels, seeded with the built-in marker traits.
pub mod registry;

/// Binary and unary operator evaluation.
///
/// Arithmetic, the comparison fold, and prefix operators.
pub mod binary;

/// Control flow.
///
/// `if`, `while`, `for` and `match`.
pub mod control;

/// Function evaluation.
///
/// Declarations, curried calls, partial application and the pipe operator.
pub mod function;

/// Type declarations.
///
/// `struct`, `enum`, `trait` and `test` blocks.
pub mod declaration;

/// Literal evaluation.
///
/// String escapes and templates, map literals, field access and enum
/// construction.
pub mod literal;

/// Built-in functions seeded into every session.
pub mod builtin;
