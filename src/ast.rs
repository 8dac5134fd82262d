use std::rc::Rc;

/// Represents a literal value in the language.
///
/// String literals are kept separately as [`Expr::Str`] because their raw
/// text still needs escape processing and template substitution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralValue {
    /// A 64-bit signed integer literal.
    Integer(i64),
    /// A 64-bit floating-point literal.
    Double(f64),
    /// A boolean literal value: `true` or `false`.
    Bool(bool),
    /// A character literal such as `'a'`.
    Char(char),
}

/// A brace-delimited sequence of expressions.
///
/// `closed` records whether the closing `}` was actually consumed. The parser
/// accepts a block that runs into the end of input; the evaluator refuses to
/// run it and reports the incomplete block instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Expressions in source order.
    pub items:  Vec<Expr>,
    /// Whether the closing `}` was present.
    pub closed: bool,
    /// Line number of the opening `{`.
    pub line:   usize,
}

/// A type annotation as written in source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// A type name such as `Int` or `Point`.
    Named(String),
    /// A function type such as `(Int, Int) -> Int`.
    Function {
        /// Parameter types.
        params: Vec<Self>,
        /// Return type.
        ret:    Box<Self>,
    },
}

/// The return-type clause of a function declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnType {
    /// No `->` was written; the function returns `Unit`.
    Implicit,
    /// `-> Type`.
    Declared(TypeExpr),
    /// `->` was written but no type followed it.
    Missing,
}

/// A declared function parameter: `name: Type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDecl {
    /// Parameter name.
    pub name: String,
    /// Declared parameter type.
    pub ty:   TypeExpr,
}

/// A function declaration, named or anonymous.
#[derive(Debug, Clone, PartialEq)]
pub struct FnDecl {
    /// The name the function is bound to, if any.
    pub name:        Option<String>,
    /// Parameters in declaration order.
    pub params:      Vec<ParamDecl>,
    /// The declared return type.
    pub return_type: ReturnType,
    /// The function body, shared with every closure built from it.
    pub body:        Rc<Block>,
    /// Line number in the source code.
    pub line:        usize,
}

/// A struct member: `[mut] name: Type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDecl {
    /// Member name.
    pub name:    String,
    /// Declared member type.
    pub ty:      TypeExpr,
    /// Whether the member was declared `mut`.
    pub mutable: bool,
}

/// A `struct` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDecl {
    /// The struct name.
    pub name:    String,
    /// Members in declaration order.
    pub members: Vec<MemberDecl>,
    /// Trait names listed in `derive(...)`.
    pub derives: Vec<String>,
    /// Whether the closing `}` was present.
    pub closed:  bool,
    /// Line number in the source code.
    pub line:    usize,
}

/// An enum variant: `Name` or `Name(Type, ...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDecl {
    /// Variant name.
    pub name:   String,
    /// Associated types in order.
    pub fields: Vec<TypeExpr>,
}

/// An `enum` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDecl {
    /// The enum name.
    pub name:     String,
    /// Variants in declaration order.
    pub variants: Vec<VariantDecl>,
    /// Trait names listed in `derive(...)`.
    pub derives:  Vec<String>,
    /// Whether the closing `}` was present.
    pub closed:   bool,
    /// Line number in the source code.
    pub line:     usize,
}

/// A trait member signature: `name(Type, ...) -> Type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSig {
    /// Method name.
    pub name:   String,
    /// Parameter types.
    pub params: Vec<TypeExpr>,
    /// Return type; `Unit` when omitted.
    pub ret:    TypeExpr,
}

/// A `trait` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitDecl {
    /// The trait name.
    pub name:       String,
    /// Extended traits, from `: A + B` or a trailing `derive(...)`.
    pub supertraits: Vec<String>,
    /// Member signatures in declaration order.
    pub methods:    Vec<MethodSig>,
    /// Whether the closing `}` was present.
    pub closed:     bool,
    /// Line number in the source code.
    pub line:       usize,
}

/// A pattern in a `match` arm.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// `_`
    Wildcard,
    /// A lowercase name that binds the matched value.
    Binding(String),
    /// A numeric, boolean or character literal.
    Literal(LiteralValue),
    /// A string literal (raw text, escapes unresolved).
    Str(String),
    /// `Enum::Variant` or `Enum::Variant(p, ...)`.
    Variant {
        /// The enum type name.
        enum_name: String,
        /// The variant name.
        variant:   String,
        /// Sub-patterns for the associated values.
        fields:    Vec<Self>,
    },
}

/// A single `pattern => expression` arm.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchArm {
    /// The pattern tested against the scrutinee.
    pub pattern: Pattern,
    /// The expression evaluated when the pattern matches.
    pub body:    Expr,
}

/// An abstract syntax tree node.
///
/// One variant per grammar rule the evaluator dispatches on. Every node owns
/// its children, except function and test bodies, which are reference counted
/// so closures can outlive the tree they were parsed from.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric, boolean or character literal.
    Literal {
        /// The constant value.
        value: LiteralValue,
        /// Line number in the source code.
        line:  usize,
    },
    /// A string literal, possibly containing `\{ ... }` templates.
    Str {
        /// The raw text between the quotes.
        raw:  String,
        /// Line number in the source code.
        line: usize,
    },
    /// Reference to a variable by name.
    Variable {
        /// Name of the variable.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// Field access: `a.b`.
    FieldAccess {
        /// The value whose field is read.
        target: Box<Self>,
        /// The field name.
        field:  String,
        /// Line number in the source code.
        line:   usize,
    },
    /// A prefix operator applied to an operand.
    Unary {
        /// The operator.
        op:   UnaryOperator,
        /// The operand.
        expr: Box<Self>,
        /// Line number in the source code.
        line: usize,
    },
    /// An addition- or multiplication-level binary operation.
    Binary {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A chain of comparisons, evaluated as a left-to-right fold.
    Comparison {
        /// The leftmost operand.
        first: Box<Self>,
        /// Each following operator and operand.
        rest:  Vec<(BinaryOperator, Self)>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A call with one or more parenthesized argument groups: `f(a)(b)`.
    Call {
        /// Name of the called function.
        callee: String,
        /// Argument groups, applied in order.
        groups: Vec<Vec<Self>>,
        /// Line number in the source code.
        line:   usize,
    },
    /// `head |> stage |> stage ...`
    Pipeline {
        /// The initial value.
        head:   Box<Self>,
        /// Expressions that must evaluate to functions.
        stages: Vec<Self>,
        /// Line number in the source code.
        line:   usize,
    },
    /// `let [mut] name [: Type] = value`
    Let {
        /// The bound name.
        name:       String,
        /// Whether `mut` was written.
        mutable:    bool,
        /// The optional type annotation.
        annotation: Option<TypeExpr>,
        /// The initializer.
        value:      Box<Self>,
        /// Line number in the source code.
        line:       usize,
    },
    /// `name = value` or `name.field = value`.
    Assign {
        /// The assigned binding.
        name:  String,
        /// The field being assigned, for `name.field = value`.
        field: Option<String>,
        /// The new value.
        value: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// `if c { } else if c { } else { }`
    If {
        /// The `if` branch followed by every `else if` branch, in order.
        branches:   Vec<(Self, Block)>,
        /// The trailing `else` block.
        else_block: Option<Block>,
        /// Line number in the source code.
        line:       usize,
    },
    /// `while condition { body }`
    While {
        /// Re-evaluated before every iteration.
        condition: Box<Self>,
        /// The loop body.
        body:      Block,
        /// Line number in the source code.
        line:      usize,
    },
    /// `for init; condition; step { body }`
    For {
        /// Evaluated once before the loop.
        init:      Option<Box<Self>>,
        /// Re-evaluated before every iteration; absent means forever.
        condition: Option<Box<Self>>,
        /// Evaluated after every iteration.
        step:      Option<Box<Self>>,
        /// The loop body.
        body:      Block,
        /// Line number in the source code.
        line:      usize,
    },
    /// `match scrutinee { pattern => expr, ... }`
    Match {
        /// The matched value.
        scrutinee: Box<Self>,
        /// Arms in source order.
        arms:      Vec<MatchArm>,
        /// Whether the closing `}` was present.
        closed:    bool,
        /// Line number in the source code.
        line:      usize,
    },
    /// A brace block used as an expression.
    Block(Block),
    /// A function declaration or anonymous function.
    Function(FnDecl),
    /// A struct declaration.
    Struct(StructDecl),
    /// An enum declaration.
    Enum(EnumDecl),
    /// A trait declaration.
    Trait(TraitDecl),
    /// `test "name" { body }`
    Test {
        /// The test name.
        name: String,
        /// The test body.
        body: Rc<Block>,
        /// Line number in the source code.
        line: usize,
    },
    /// `{ key: value, ... }`
    Map {
        /// Entries in source order.
        entries: Vec<(String, Self)>,
        /// Whether the closing `}` was present.
        closed:  bool,
        /// Line number in the source code.
        line:    usize,
    },
    /// `Enum::Variant` or `Enum::Variant(args...)`.
    EnumVariant {
        /// The enum type name.
        enum_name: String,
        /// The variant name.
        variant:   String,
        /// Constructor arguments.
        arguments: Vec<Self>,
        /// Line number in the source code.
        line:      usize,
    },
}

impl Expr {
    /// Gets the line number from `self`.
    /// ## Example
    /// ```
    /// use moonpad::ast::Expr;
    ///
    /// let expr = Expr::Variable { name: "x".to_string(),
    ///                             line: 5, };
    ///
    /// assert_eq!(expr.line_number(), 5);
    /// ```
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::Literal { line, .. }
            | Self::Str { line, .. }
            | Self::Variable { line, .. }
            | Self::FieldAccess { line, .. }
            | Self::Unary { line, .. }
            | Self::Binary { line, .. }
            | Self::Comparison { line, .. }
            | Self::Call { line, .. }
            | Self::Pipeline { line, .. }
            | Self::Let { line, .. }
            | Self::Assign { line, .. }
            | Self::If { line, .. }
            | Self::While { line, .. }
            | Self::For { line, .. }
            | Self::Match { line, .. }
            | Self::Test { line, .. }
            | Self::Map { line, .. }
            | Self::EnumVariant { line, .. } => *line,
            Self::Block(Block { line, .. }) => *line,
            Self::Function(FnDecl { line, .. }) => *line,
            Self::Struct(StructDecl { line, .. }) => *line,
            Self::Enum(EnumDecl { line, .. }) => *line,
            Self::Trait(TraitDecl { line, .. }) => *line,
        }
    }

    /// Finds a brace-delimited construct whose closing `}` was never
    /// consumed, searching this node and all of its children.
    ///
    /// Returns the construct name and the line it starts on. An unclosed
    /// construct can only appear where the input ended, so at most one chain
    /// of nested constructs is open.
    ///
    /// # Example
    /// ```
    /// use moonpad::interpreter::parser::core::parse;
    ///
    /// let exprs = parse("while x < 3 { x = x + 1").unwrap();
    /// assert_eq!(exprs[0].unclosed(), Some(("while", 1)));
    ///
    /// let exprs = parse("while x < 3 { x = x + 1 }").unwrap();
    /// assert_eq!(exprs[0].unclosed(), None);
    /// ```
    #[must_use]
    pub fn unclosed(&self) -> Option<(&'static str, usize)> {
        match self {
            Self::Literal { .. } | Self::Str { .. } | Self::Variable { .. } => None,
            Self::FieldAccess { target, .. } => target.unclosed(),
            Self::Unary { expr, .. } => expr.unclosed(),
            Self::Binary { left, right, .. } => left.unclosed().or_else(|| right.unclosed()),
            Self::Comparison { first, rest, .. } => {
                first.unclosed()
                     .or_else(|| rest.iter().find_map(|(_, e)| e.unclosed()))
            },
            Self::Call { groups, .. } => groups.iter().flatten().find_map(Self::unclosed),
            Self::Pipeline { head, stages, .. } => {
                head.unclosed().or_else(|| stages.iter().find_map(Self::unclosed))
            },
            Self::Let { value, .. } | Self::Assign { value, .. } => value.unclosed(),
            Self::If { branches,
                       else_block,
                       .. } => {
                branches.iter()
                        .find_map(|(condition, block)| {
                            condition.unclosed().or_else(|| block.unclosed("if"))
                        })
                        .or_else(|| else_block.as_ref().and_then(|b| b.unclosed("else")))
            },
            Self::While { condition, body, .. } => {
                condition.unclosed().or_else(|| body.unclosed("while"))
            },
            Self::For { init,
                        condition,
                        step,
                        body,
                        .. } => {
                [init, condition, step].into_iter()
                                       .flatten()
                                       .find_map(|e| e.unclosed())
                                       .or_else(|| body.unclosed("for"))
            },
            Self::Match { scrutinee,
                          arms,
                          closed,
                          line, } => {
                scrutinee.unclosed()
                         .or_else(|| arms.iter().find_map(|arm| arm.body.unclosed()))
                         .or_else(|| (!closed).then_some(("match", *line)))
            },
            Self::Block(block) => block.unclosed("block"),
            Self::Function(decl) => decl.body.unclosed("function"),
            Self::Struct(StructDecl { closed, line, .. })
            | Self::Enum(EnumDecl { closed, line, .. })
            | Self::Trait(TraitDecl { closed, line, .. }) => {
                (!closed).then_some((self.construct_name(), *line))
            },
            Self::Test { body, .. } => body.unclosed("test"),
            Self::Map { entries,
                        closed,
                        line, } => {
                entries.iter()
                       .find_map(|(_, e)| e.unclosed())
                       .or_else(|| (!closed).then_some(("map", *line)))
            },
            Self::EnumVariant { arguments, .. } => arguments.iter().find_map(Self::unclosed),
        }
    }

    const fn construct_name(&self) -> &'static str {
        match self {
            Self::Struct(_) => "struct",
            Self::Enum(_) => "enum",
            Self::Trait(_) => "trait",
            _ => "expression",
        }
    }
}

impl Block {
    /// Finds the first unclosed construct in this block, reporting the block
    /// itself as `construct` when its own `}` is missing.
    #[must_use]
    pub fn unclosed(&self, construct: &'static str) -> Option<(&'static str, usize)> {
        self.items
            .iter()
            .find_map(Expr::unclosed)
            .or_else(|| (!self.closed).then_some((construct, self.line)))
    }
}

/// Represents a binary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Modulo (`%`)
    Mod,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
}

/// Represents a prefix operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Arithmetic negation (e.g. `-x`).
    Negate,
    /// Logical NOT (e.g. `!x`).
    Not,
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use BinaryOperator::{
            Add, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul, NotEqual, Sub,
        };
        let operator = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            Equal => "==",
            NotEqual => "!=",
        };
        write!(f, "{operator}")
    }
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Negate => write!(f, "-"),
            Self::Not => write!(f, "!"),
        }
    }
}
