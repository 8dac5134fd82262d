use logos::Logos;

use crate::error::ParseError;

/// Represents a lexical token in the source input.
///
/// Whitespace, newlines and `//` comments are skipped and never reach the
/// parser. Multi-character operators (`>=`, `<=`, `==`, `!=`, `->`, `|>`,
/// `::`, `=>`) always win over their single-character prefixes because the
/// lexer takes the longest match at every position.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
pub enum Token {
    /// Double literal tokens, such as `3.14` or `2.0e-3`.
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", parse_float)]
    Double(f64),
    /// Integer literal tokens, such as `42`.
    #[regex(r"[0-9]+", parse_integer)]
    Integer(i64),
    /// String literal tokens. The payload is the raw text between the quotes;
    /// escapes and `\{ ... }` templates are resolved during evaluation.
    #[regex(r#""([^"\\\n]|\\.)*""#, parse_string)]
    Str(String),
    /// Character literal tokens, such as `'a'` or `'\n'`.
    #[regex(r"'([^'\\\n]|\\.)'", parse_char)]
    Char(char),
    /// Boolean literal tokens.
    #[token("true", |_| true)]
    #[token("false", |_| false)]
    Bool(bool),
    /// `let`
    #[token("let")]
    Let,
    /// `mut`
    #[token("mut")]
    Mut,
    /// `fn`
    #[token("fn")]
    Fn,
    /// `struct`
    #[token("struct")]
    Struct,
    /// `enum`
    #[token("enum")]
    Enum,
    /// `trait`
    #[token("trait")]
    Trait,
    /// `test`
    #[token("test")]
    Test,
    /// `derive`
    #[token("derive")]
    Derive,
    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `while`
    #[token("while")]
    While,
    /// `for`
    #[token("for")]
    For,
    /// `match`
    #[token("match")]
    Match,
    /// Lowercase identifiers: value and function names such as `x` or `add`.
    #[regex(r"[a-z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// Uppercase identifiers: type names such as `Int` or `Point`.
    #[regex(r"[A-Z][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    TypeName(String),
    /// `// Comments.`
    #[regex(r"//[^\n]*", logos::skip)]
    Comment,
    /// `->`
    #[token("->")]
    Arrow,
    /// `=>`
    #[token("=>")]
    FatArrow,
    /// `|>`
    #[token("|>")]
    PipeForward,
    /// `::`
    #[token("::")]
    ColonColon,
    /// `:`
    #[token(":")]
    Colon,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>`
    #[token(">")]
    Greater,
    /// `<`
    #[token("<")]
    Less,
    /// `=`
    #[token("=")]
    Equals,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `!`
    #[token("!")]
    Bang,
    /// `.`
    #[token(".")]
    Dot,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `,`
    #[token(",")]
    Comma,
    /// `;`
    #[token(";")]
    Semicolon,
    /// Newlines only advance the line counter.
    #[token("\n", |lex| {
        lex.extras.line += 1;
        logos::Skip
    })]
    NewLine,
    /// Spaces, tabs and feeds.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,
}

/// The umbrella classification of binary operator tokens.
///
/// The parser consumes "any addition operator" or "any comparison operator"
/// at each precedence level; the concrete member decides the semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorCategory {
    /// `+` and `-`.
    Addition,
    /// `*`, `/` and `%`.
    Multiplication,
    /// `>`, `<`, `==`, `!=`, `>=` and `<=`.
    Comparison,
}

impl Token {
    /// Returns the operator category of this token, if it is a binary
    /// operator.
    ///
    /// # Example
    /// ```
    /// use moonpad::interpreter::lexer::{OperatorCategory, Token};
    ///
    /// assert_eq!(Token::GreaterEqual.category(), Some(OperatorCategory::Comparison));
    /// assert_eq!(Token::Minus.category(), Some(OperatorCategory::Addition));
    /// assert_eq!(Token::Arrow.category(), None);
    /// ```
    #[must_use]
    pub const fn category(&self) -> Option<OperatorCategory> {
        match self {
            Self::Plus | Self::Minus => Some(OperatorCategory::Addition),
            Self::Star | Self::Slash | Self::Percent => Some(OperatorCategory::Multiplication),
            Self::Greater
            | Self::Less
            | Self::EqualEqual
            | Self::BangEqual
            | Self::GreaterEqual
            | Self::LessEqual => Some(OperatorCategory::Comparison),
            _ => None,
        }
    }
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number for error reporting.
#[derive(Default)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line: usize,
}

/// Converts source text into `(token, line)` pairs.
///
/// # Errors
/// - `ParseError::LiteralTooLarge` for an integer literal outside `i64`.
/// - `ParseError::UnrecognizedInput` at the first character sequence no
///   token pattern matches.
///
/// # Example
/// ```
/// use moonpad::interpreter::lexer::{Token, tokenize};
///
/// let tokens = tokenize("x >= 1").unwrap();
/// let kinds: Vec<_> = tokens.into_iter().map(|(tok, _)| tok).collect();
///
/// assert_eq!(kinds,
///            vec![Token::Identifier("x".into()), Token::GreaterEqual, Token::Integer(1)]);
/// ```
pub fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer_with_extras(source, LexerExtras { line: 1 });

    while let Some(token) = lexer.next() {
        if let Ok(tok) = token {
            tokens.push((tok, lexer.extras.line));
        } else if lexer.slice().chars().all(|c| c.is_ascii_digit()) {
            return Err(ParseError::LiteralTooLarge { line: lexer.extras.line });
        } else {
            return Err(ParseError::UnrecognizedInput { text: lexer.slice().to_string(),
                                                       line: lexer.extras.line, });
        }
    }

    Ok(tokens)
}

fn parse_float(lex: &mut logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

fn parse_integer(lex: &mut logos::Lexer<Token>) -> Option<i64> {
    lex.slice().parse().ok()
}

fn parse_string(lex: &mut logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    slice[1..slice.len() - 1].to_string()
}

/// Parses a character literal, resolving the single supported escape.
fn parse_char(lex: &mut logos::Lexer<Token>) -> Option<char> {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];
    let mut chars = inner.chars();
    match chars.next()? {
        '\\' => match chars.next()? {
            'n' => Some('\n'),
            't' => Some('\t'),
            'r' => Some('\r'),
            '0' => Some('\0'),
            other => Some(other),
        },
        c => Some(c),
    }
}
