use std::rc::Rc;

use tracing::{debug, trace};

use crate::{
    ast::{Block, Expr, FnDecl, ReturnType},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Session, ensure_closed},
        value::{
            core::Value,
            function::{Function, FunctionBody, Param},
            types::Type,
        },
    },
};

impl Session {
    /// Evaluates a `fn` declaration.
    ///
    /// Parameter and return types are resolved now, against the type
    /// registry as it stands. A named function is bound in the global frame
    /// as an immutable binding and the declaration yields `()`. An anonymous
    /// function yields the function value itself.
    ///
    /// # Errors
    /// - `MissingRCurly` if the body was not closed.
    /// - `MissingReturnType` if `->` was written without a type.
    /// - `UnknownType` for an unresolvable parameter or return type.
    pub(crate) fn eval_fn_decl(&mut self, decl: &FnDecl) -> EvalResult<Value> {
        ensure_closed(&decl.body, "function")?;

        let return_type = match &decl.return_type {
            ReturnType::Implicit => Type::UNIT,
            ReturnType::Declared(annotation) => self.types.resolve(annotation, decl.line)?,
            ReturnType::Missing => {
                return Err(RuntimeError::MissingReturnType { name: decl.name
                                                                       .clone()
                                                                       .unwrap_or_else(|| "<anonymous>".to_string()),
                                                             line: decl.line, });
            },
        };

        let params = decl.params
                         .iter()
                         .map(|param| {
                             Ok(Param::new(&param.name, self.types.resolve(&param.ty, decl.line)?))
                         })
                         .collect::<EvalResult<Vec<_>>>()?;

        let function = Function { name: decl.name.clone(),
                                  params,
                                  return_type,
                                  body: FunctionBody::User(Rc::clone(&decl.body)) };

        match &decl.name {
            Some(name) => {
                debug!(name, signature = %function.signature(), "declaring function");
                self.scopes.define_global(name, Value::function(function), false);
                Ok(Value::unit())
            },
            None => Ok(Value::function(function)),
        }
    }

    /// Evaluates a call with one or more argument groups.
    ///
    /// The callee is looked up by name, then each group is applied in turn to
    /// the current callee value; the result of one application is the callee
    /// of the next. So `add(1)(2)` applies `(1)` to `add` and `(2)` to the
    /// partial application that produced.
    pub(crate) fn eval_call(&mut self,
                            callee: &str,
                            groups: &[Vec<Expr>],
                            line: usize)
                            -> EvalResult<Value> {
        let mut current = self.eval_variable(callee, line)?;

        for group in groups {
            let args = group.iter()
                            .map(|arg| self.eval_expr(arg))
                            .collect::<EvalResult<Vec<_>>>()?;
            current = self.apply(&current, args, line)?;
        }

        Ok(current)
    }

    /// Evaluates `head |> stage |> ...`.
    ///
    /// Each stage must evaluate to a function, which is applied to the
    /// running value.
    ///
    /// # Errors
    /// `UnsupportedExpressionAfterPipeOperator` if a stage is not a function.
    pub(crate) fn eval_pipeline(&mut self,
                                head: &Expr,
                                stages: &[Expr],
                                line: usize)
                                -> EvalResult<Value> {
        let mut running = self.eval_expr(head)?;

        for stage in stages {
            let target = self.eval_expr(stage)?;
            let Some(function) = target.as_function() else {
                return Err(RuntimeError::UnsupportedExpressionAfterPipeOperator { found: target.ty.name(),
                                                                                  line });
            };
            running = self.invoke(&function, vec![running], line)?;
        }

        Ok(running)
    }

    /// Applies `args` to a value that must be a function.
    ///
    /// # Errors
    /// `NotCallable` if `callee` is not a function, plus anything
    /// [`Session::invoke`] raises.
    pub fn apply(&mut self, callee: &Value, args: Vec<Value>, line: usize) -> EvalResult<Value> {
        let function = callee.as_function()
                             .ok_or_else(|| RuntimeError::NotCallable { found: callee.ty.name(),
                                                                        line })?;
        self.invoke(&function, args, line)
    }

    /// Invokes a function with exactly, or fewer than, its declared number of
    /// arguments.
    ///
    /// - With fewer arguments the body does not run. The result is a partial
    ///   application awaiting the remaining, trailing, parameters. When it is
    ///   later invoked, the original function receives the new arguments
    ///   followed by the ones supplied now.
    /// - With exactly enough arguments, each is checked against its parameter
    ///   type and the body runs.
    ///
    /// # Errors
    /// - `ArgumentCountMismatch` for too many arguments.
    /// - `InvalidArgumentType` for an argument of the wrong type.
    /// - Anything the body raises.
    pub fn invoke(&mut self,
                  function: &Rc<Function>,
                  args: Vec<Value>,
                  line: usize)
                  -> EvalResult<Value> {
        let arity = function.params.len();
        trace!(name = function.display_name(), arity, supplied = args.len(), "invoking function");

        if args.len() > arity {
            return Err(RuntimeError::ArgumentCountMismatch { name: function.display_name()
                                                                          .to_string(),
                                                             expected: arity,
                                                             found: args.len(),
                                                             line });
        }
        if args.len() < arity {
            return Ok(Value::function(Function::partial(Rc::clone(function), args)));
        }

        let args = check_arguments(function, args, line)?;

        match &function.body {
            FunctionBody::Native(handler) => (**handler)(&args, line),
            FunctionBody::User(body) => self.call_user_function(function, body, args),
            FunctionBody::Partial { original, supplied } => {
                let mut all = args;
                all.extend(supplied.iter().cloned());
                self.invoke(original, all, line)
            },
        }
    }

    /// Runs a user function body in a new frame holding the parameters.
    ///
    /// The frame is popped whether or not the body succeeds.
    fn call_user_function(&mut self,
                          function: &Function,
                          body: &Block,
                          args: Vec<Value>)
                          -> EvalResult<Value> {
        self.push_scope();
        for (param, arg) in function.params.iter().zip(args) {
            self.scopes.define_local(&param.name, arg, false);
        }
        let result = self.eval_row(&body.items);
        self.pop_scope();
        result
    }
}

/// Checks each argument against its parameter, converting maps to struct
/// instances where the parameter is a struct type.
fn check_arguments(function: &Function, args: Vec<Value>, line: usize) -> EvalResult<Vec<Value>> {
    function.params
            .iter()
            .zip(args)
            .map(|(param, arg)| {
                let found = arg.ty.name();
                arg.conform(&param.ty, line)
                   .map_err(|_| RuntimeError::InvalidArgumentType { function: function.display_name()
                                                                              .to_string(),
                                                                    param: param.name.clone(),
                                                                    expected: param.ty.name(),
                                                                    found,
                                                                    line })
            })
            .collect()
}
