/// Core parsing entry points.
///
/// Contains `parse`, the row and pipeline rules, and the expression
/// dispatcher that selects a grammar rule from the leading token.
pub mod core;

/// Prefix operators and atomic expressions.
///
/// Handles negation, logical NOT, literals, parenthesized expressions,
/// variables, curried calls, field access and enum variant construction.
pub mod unary;

/// Binary operator parsing.
///
/// Implements the comparison, addition and multiplication precedence levels.
pub mod binary;

/// Block and map literal parsing.
///
/// Both start with `{`; the closing `}` is optional in both.
pub mod block;

/// Statement parsing.
///
/// `let`, assignment, `if`, `while`, `for`, `match` and `test`.
pub mod statement;

/// Declaration parsing.
///
/// `fn`, `struct`, `enum` and `trait`, including `derive(...)` clauses.
pub mod declaration;

/// Type annotation parsing.
pub mod types;

/// Utility functions for the parser.
///
/// Provides list parsing, token expectations and lookahead helpers used by
/// the grammar rules.
pub mod utils;
