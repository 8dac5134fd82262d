use thiserror::Error;

#[derive(Debug, Error)]
/// Represents all errors that can occur during lexing or parsing.
pub enum ParseError {
    /// Found an unexpected token while parsing.
    #[error("Error on line {line}: Unexpected token: {token}.")]
    UnexpectedToken {
        /// The token encountered (or a description of what was expected).
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// Reached the end of input unexpectedly.
    #[error("Error on line {line}: Unexpected end of input.")]
    UnexpectedEndOfInput {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A closing parenthesis `)` was expected but not found.
    #[error("Error on line {line}: Expected closing parenthesis ')' but none found.")]
    ExpectedClosingParen {
        /// The source line where the error occurred.
        line: usize,
    },
    /// The lexer could not match any token at this position.
    #[error("Error on line {line}: Unrecognized input '{text}'.")]
    UnrecognizedInput {
        /// The offending slice of source text.
        text: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A `}` appeared at the top level without an opening `{`.
    #[error("Error on line {line}: Found '}}' without a matching '{{'.")]
    UnmatchedRCurly {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A declaration (`struct`, `enum`, `trait`, `fn`) is malformed.
    #[error("Error on line {line}: Invalid {construct} declaration: {details}.")]
    InvalidDeclaration {
        /// The kind of declaration being parsed.
        construct: &'static str,
        /// What went wrong.
        details:   String,
        /// The source line where the error occurred.
        line:      usize,
    },
    /// A literal value was too large to be represented safely.
    #[error("Error on line {line}: Literal is too large.")]
    LiteralTooLarge {
        /// The source line where the error occurred.
        line: usize,
    },
}
