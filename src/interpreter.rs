/// The evaluator module executes syntax trees against a session.
///
/// The evaluator walks the tree produced by the parser, keeps the scope stack
/// and type registry, applies functions, and reports runtime errors.
///
/// # Responsibilities
/// - Evaluates every expression kind, including declarations and loops.
/// - Maintains bindings and registered types across `eval` calls.
/// - Detects unclosed blocks so the REPL can ask for more input.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer reads the raw source text and produces a stream of tokens, each
/// paired with the line it was found on. This is the first stage of
/// interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with line numbers.
/// - Handles numeric, string, char and boolean literals, keywords,
///   identifiers, type names and operators.
/// - Reports lexical errors for invalid or malformed input.
pub mod lexer;
/// The parser module builds the syntax tree from tokens.
///
/// The parser is a recursive-descent parser over the token stream. Closing
/// braces are optional at end of input; the resulting nodes are marked as
/// unclosed instead of failing, so incomplete input can be detected later.
///
/// # Responsibilities
/// - Converts tokens into `Expr` nodes.
/// - Validates grammar, reporting errors with line info.
pub mod parser;
/// The value module defines the runtime data types for evaluation.
///
/// Every value carries an explicit type tag next to its payload. The tag, not
/// the payload's shape, decides compatibility.
///
/// # Responsibilities
/// - Defines `Value`, `Payload`, `Type` and `Function`.
/// - Implements type compatibility and struct conformance.
/// - Renders values for the REPL.
pub mod value;
