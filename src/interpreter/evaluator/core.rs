use std::rc::Rc;

use tracing::{debug, warn};

use crate::{
    ast::{Block, Expr},
    error::{EvalError, ParseError, RuntimeError},
    interpreter::{
        evaluator::{builtin, registry::TypeRegistry, scope::ScopeStack},
        parser::core::{open_brace_line, parse},
        value::{core::Value, function::Function},
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Session-wide settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// When set, assigning to an undefined name is an error instead of
    /// creating a mutable global.
    pub strict_mode: bool,
}

/// A `test "name" { ... }` block registered in the session.
#[derive(Debug, Clone)]
pub struct TestCase {
    /// The test name.
    pub name: String,
    /// The body run by [`Session::run_tests`].
    pub body: Rc<Block>,
    /// Line of the `test` keyword.
    pub line: usize,
}

/// The result of running one registered test.
#[derive(Debug)]
pub struct TestOutcome {
    /// The test name.
    pub name:   String,
    /// `Ok` if the body ran to completion.
    pub result: EvalResult<()>,
}

impl TestOutcome {
    /// Returns `true` if the test passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

/// Stores the interpreter state for one REPL or editor instance.
///
/// The scope stack and type registry persist across [`Session::eval`] calls,
/// which is what lets one call define `x` and the next read it.
///
/// ## Usage
///
/// ```
/// use moonpad::interpreter::{evaluator::core::Session, value::core::Value};
///
/// let mut session = Session::new();
/// session.eval("let x = 5").unwrap();
///
/// assert_eq!(session.eval("x + 10").unwrap(), Value::int(15));
/// ```
#[derive(Debug)]
pub struct Session {
    pub(crate) scopes: ScopeStack,
    pub(crate) types:  TypeRegistry,
    pub(crate) config: SessionConfig,
    tests:             Vec<TestCase>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates a non-strict session with the built-in functions installed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    /// Creates a session with the given configuration and the built-in
    /// functions installed.
    #[must_use]
    pub fn with_config(config: SessionConfig) -> Self {
        let mut session = Self { scopes: ScopeStack::new(),
                                 types: TypeRegistry::new(),
                                 config,
                                 tests: Vec::new() };
        builtin::install(&mut session);
        session
    }

    /// Returns the session configuration.
    #[must_use]
    pub const fn config(&self) -> SessionConfig {
        self.config
    }

    /// Tokenizes, parses and evaluates `source` against the session state.
    ///
    /// The result is the value of the last top-level expression, or `()` for
    /// empty input. If the input ends inside an unclosed `{ ... }`, nothing
    /// is evaluated and the error's kind is
    /// [`crate::error::ErrorKind::MissingRCurly`], so the caller can ask for
    /// more input and resubmit the whole text.
    ///
    /// Global bindings and types committed before a failure are kept. Frames
    /// entered by the failed evaluation are discarded.
    ///
    /// # Errors
    /// Any `ParseError` or `RuntimeError`, wrapped in `EvalError`.
    pub fn eval(&mut self, source: &str) -> Result<Value, EvalError> {
        let exprs = parse(source).map_err(|e| incomplete_or(e, source))?;
        debug!(len = source.len(), exprs = exprs.len(), "evaluating source");

        if let Some((construct, line)) = exprs.iter().find_map(Expr::unclosed) {
            return Err(RuntimeError::MissingRCurly { construct, line }.into());
        }

        self.evaluate(&exprs).map_err(|e| {
                                 warn!(error = %e, "evaluation failed");
                                 self.scopes.truncate_to_global();
                                 self.types.truncate_to_global();
                                 EvalError::from(e)
                             })
    }

    /// Evaluates already-parsed expressions in order and returns the last
    /// value.
    ///
    /// This is the evaluation half of the composable pair used by
    /// [`Session::eval`] and by string templates.
    ///
    /// # Errors
    /// The first `RuntimeError` raised by any expression.
    pub fn evaluate(&mut self, exprs: &[Expr]) -> EvalResult<Value> {
        self.eval_row(exprs)
    }

    /// Installs a function in the global frame as an immutable binding.
    ///
    /// Used to seed built-ins before any user input is evaluated.
    pub fn add_function(&mut self, name: &str, function: Function) {
        self.scopes.define_global(name, Value::function(function), false);
    }

    /// Returns the value bound to `name`, searching from the innermost frame
    /// outwards.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.scopes.lookup(name).map(|binding| &binding.value)
    }

    /// Returns the names bound in the global frame, in definition order.
    pub fn global_names(&self) -> impl Iterator<Item = &str> {
        self.scopes.global().names()
    }

    /// Returns the registered tests.
    #[must_use]
    pub fn tests(&self) -> &[TestCase] {
        &self.tests
    }

    pub(crate) fn register_test(&mut self, test: TestCase) {
        debug!(name = %test.name, "registering test");
        self.tests.push(test);
    }

    /// Runs every registered test body in registration order.
    ///
    /// A failing test does not stop the run; its error is reported in the
    /// outcome.
    ///
    /// # Example
    /// ```
    /// use moonpad::interpreter::evaluator::core::Session;
    ///
    /// let mut session = Session::new();
    /// session.eval(r#"test "math" { assert(1 + 1 == 2) }"#).unwrap();
    /// session.eval(r#"test "broken" { assert(1 == 2) }"#).unwrap();
    ///
    /// let outcomes = session.run_tests();
    /// assert!(outcomes[0].passed());
    /// assert!(!outcomes[1].passed());
    /// ```
    pub fn run_tests(&mut self) -> Vec<TestOutcome> {
        let tests = self.tests.clone();
        tests.into_iter()
             .map(|test| {
                 let result = self.eval_block(&test.body).map(|_| ());
                 if result.is_err() {
                     self.scopes.truncate_to_global();
                     self.types.truncate_to_global();
                 }
                 TestOutcome { name: test.name,
                               result }
             })
             .collect()
    }

    /// Evaluates expressions in order, returning the last value or `()`.
    pub(crate) fn eval_row(&mut self, items: &[Expr]) -> EvalResult<Value> {
        let mut last = Value::unit();
        for item in items {
            last = self.eval_expr(item)?;
        }
        Ok(last)
    }

    /// Evaluates a block in a fresh frame.
    ///
    /// The frame is popped whether or not the body succeeds.
    pub(crate) fn eval_block(&mut self, block: &Block) -> EvalResult<Value> {
        self.push_scope();
        let result = self.eval_row(&block.items);
        self.pop_scope();
        result
    }

    pub(crate) fn push_scope(&mut self) {
        self.scopes.push();
        self.types.push();
    }

    pub(crate) fn pop_scope(&mut self) {
        self.scopes.pop();
        self.types.pop();
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the dispatcher every other evaluation routine goes through.
    /// Statements such as declarations and loops evaluate to `()`.
    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(Value::from(*value)),
            Expr::Str { raw, line } => self.eval_string(raw, *line),
            Expr::Variable { name, line } => self.eval_variable(name, *line),
            Expr::FieldAccess { target, field, line } => {
                self.eval_field_access(target, field, *line)
            },
            Expr::Unary { op, expr, line } => self.eval_unary(*op, expr, *line),
            Expr::Binary { left,
                           op,
                           right,
                           line, } => self.eval_binary(left, *op, right, *line),
            Expr::Comparison { first, rest, line } => self.eval_comparison(first, rest, *line),
            Expr::Call { callee, groups, line } => self.eval_call(callee, groups, *line),
            Expr::Pipeline { head, stages, line } => self.eval_pipeline(head, stages, *line),
            Expr::Let { name,
                        mutable,
                        annotation,
                        value,
                        line, } => self.eval_let(name, *mutable, annotation.as_ref(), value, *line),
            Expr::Assign { name,
                           field,
                           value,
                           line, } => self.eval_assign(name, field.as_deref(), value, *line),
            Expr::If { branches,
                       else_block,
                       line, } => self.eval_if(branches, else_block.as_ref(), *line),
            Expr::While { condition, body, .. } => self.eval_while(condition, body),
            Expr::For { init,
                        condition,
                        step,
                        body,
                        .. } => self.eval_for(init.as_deref(),
                                              condition.as_deref(),
                                              step.as_deref(),
                                              body),
            Expr::Match { scrutinee,
                          arms,
                          closed,
                          line, } => self.eval_match(scrutinee, arms, *closed, *line),
            Expr::Block(block) => {
                ensure_closed(block, "block")?;
                self.eval_block(block)
            },
            Expr::Function(decl) => self.eval_fn_decl(decl),
            Expr::Struct(decl) => self.eval_struct_decl(decl),
            Expr::Enum(decl) => self.eval_enum_decl(decl),
            Expr::Trait(decl) => self.eval_trait_decl(decl),
            Expr::Test { name, body, line } => self.eval_test_decl(name, body, *line),
            Expr::Map { entries,
                        closed,
                        line, } => self.eval_map(entries, *closed, *line),
            Expr::EnumVariant { enum_name,
                                variant,
                                arguments,
                                line, } => {
                self.eval_enum_variant(enum_name, variant, arguments, *line)
            },
        }
    }
}

/// Fails with `MissingRCurly` if the block's closing `}` was never parsed.
pub(crate) fn ensure_closed(block: &Block, construct: &'static str) -> EvalResult<()> {
    if block.closed {
        Ok(())
    } else {
        Err(RuntimeError::MissingRCurly { construct,
                                          line: block.line })
    }
}

/// Reports input that ran out inside an open `{` as incomplete rather than
/// as a syntax error.
fn incomplete_or(error: ParseError, source: &str) -> EvalError {
    if matches!(error, ParseError::UnexpectedEndOfInput { .. })
       && let Some(line) = open_brace_line(source)
    {
        return RuntimeError::MissingRCurly { construct: "block",
                                             line }.into();
    }
    error.into()
}
