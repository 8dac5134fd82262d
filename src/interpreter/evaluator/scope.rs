use std::{collections::HashMap, rc::Rc};

use tracing::debug;

use crate::{
    ast::{Expr, TypeExpr},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Session},
        value::{
            core::{Payload, Value},
            types::Type,
        },
    },
};

/// A named value and whether it may be reassigned.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// The bound value.
    pub value:   Value,
    /// Set from `let mut`; assignment to an immutable binding fails.
    pub mutable: bool,
}

/// One lexical scope.
///
/// Lookup is by name; `names` preserves definition order for listing.
#[derive(Debug, Default)]
pub struct Frame {
    bindings: HashMap<String, Binding>,
    order:    Vec<String>,
}

impl Frame {
    /// Returns the binding for `name` in this frame.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    /// Returns the binding for `name` in this frame, mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Binding> {
        self.bindings.get_mut(name)
    }

    /// Inserts or replaces a binding.
    ///
    /// Replacing keeps the name's original position in [`Frame::names`].
    pub fn insert(&mut self, name: &str, binding: Binding) {
        if self.bindings.insert(name.to_string(), binding).is_none() {
            self.order.push(name.to_string());
        }
    }

    /// Iterates over the bound names in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

/// The stack of frames visible to the evaluator, innermost last.
///
/// Frame 0 is the global frame. It is created with the stack and is never
/// popped.
#[derive(Debug)]
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    /// Creates a stack holding only the global frame.
    #[must_use]
    pub fn new() -> Self {
        Self { frames: vec![Frame::default()] }
    }

    /// Enters a new innermost frame.
    pub fn push(&mut self) {
        self.frames.push(Frame::default());
    }

    /// Leaves the innermost frame. The global frame is never removed.
    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Drops every frame except the global one.
    pub fn truncate_to_global(&mut self) {
        self.frames.truncate(1);
    }

    /// Returns the global frame.
    #[must_use]
    pub fn global(&self) -> &Frame {
        &self.frames[0]
    }

    /// Finds `name`, searching from the innermost frame outwards.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    /// Finds `name` mutably, searching from the innermost frame outwards.
    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Binding> {
        self.frames.iter_mut().rev().find_map(|frame| frame.get_mut(name))
    }

    /// Binds `name` in the global frame, replacing any previous binding and
    /// its mutability.
    pub fn define_global(&mut self, name: &str, value: Value, mutable: bool) {
        self.frames[0].insert(name, Binding { value, mutable });
    }

    /// Binds `name` in the innermost frame.
    pub fn define_local(&mut self, name: &str, value: Value, mutable: bool) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name, Binding { value, mutable });
        }
    }
}

impl Session {
    /// Resolves a variable, searching from the innermost frame outwards.
    pub(crate) fn eval_variable(&self, name: &str, line: usize) -> EvalResult<Value> {
        self.scopes
            .lookup(name)
            .map(|binding| binding.value.clone())
            .ok_or_else(|| RuntimeError::UndefinedVariable { name: name.to_string(),
                                                             line })
    }

    /// Evaluates `let [mut] name [: Type] = value`.
    ///
    /// The binding always lands in the global frame, even inside blocks and
    /// function bodies, and replaces any earlier binding of the same name.
    /// An annotation is checked with [`Value::conform`], so a map bound to a
    /// struct annotation becomes an instance of that struct.
    ///
    /// # Returns
    /// The bound value.
    pub(crate) fn eval_let(&mut self,
                           name: &str,
                           mutable: bool,
                           annotation: Option<&TypeExpr>,
                           value: &Expr,
                           line: usize)
                           -> EvalResult<Value> {
        let value = self.eval_expr(value)?;
        let value = match annotation {
            Some(annotation) => {
                let expected = self.types.resolve(annotation, line)?;
                value.conform(&expected, line)?
            },
            None => value,
        };

        debug!(name, mutable, ty = %value.ty, "defining global binding");
        self.scopes.define_global(name, value.clone(), mutable);
        Ok(value)
    }

    /// Evaluates `name = value` and `name.field = value`.
    pub(crate) fn eval_assign(&mut self,
                              name: &str,
                              field: Option<&str>,
                              value: &Expr,
                              line: usize)
                              -> EvalResult<Value> {
        let value = self.eval_expr(value)?;
        match field {
            Some(field) => self.assign_field(name, field, value, line),
            None => self.assign_variable(name, value, line),
        }
    }

    /// Updates the nearest binding of `name`.
    ///
    /// The binding must be mutable and the new value must conform to the
    /// type of the value it replaces. An unknown name is created as a mutable
    /// global unless the session runs in strict mode.
    fn assign_variable(&mut self, name: &str, value: Value, line: usize) -> EvalResult<Value> {
        if let Some(binding) = self.scopes.lookup_mut(name) {
            if !binding.mutable {
                return Err(RuntimeError::ImmutableAssignment { name: name.to_string(),
                                                               line });
            }
            let value = value.conform(&binding.value.ty, line)?;
            binding.value = value.clone();
            return Ok(value);
        }

        if self.config.strict_mode {
            return Err(RuntimeError::UndefinedVariable { name: name.to_string(),
                                                         line });
        }

        debug!(name, "assignment created a global binding");
        self.scopes.define_global(name, value.clone(), true);
        Ok(value)
    }

    /// Updates one field of a map or struct instance in place.
    ///
    /// Struct fields must be declared `mut`; maps must be held by a mutable
    /// binding. The new value must conform to the field's current type.
    fn assign_field(&mut self,
                    name: &str,
                    field: &str,
                    value: Value,
                    line: usize)
                    -> EvalResult<Value> {
        let binding =
            self.scopes
                .lookup_mut(name)
                .ok_or_else(|| RuntimeError::UndefinedVariable { name: name.to_string(),
                                                                 line })?;

        let ty = binding.value.ty.clone();
        let unknown_field = || RuntimeError::UnknownField { field: field.to_string(),
                                                            ty: ty.name(),
                                                            line };

        let (entries, is_struct) = match &binding.value.payload {
            Payload::Struct(entries) => (Rc::clone(entries), true),
            Payload::Map(entries) => (Rc::clone(entries), false),
            _ => return Err(unknown_field()),
        };

        if is_struct {
            if let Type::Struct(struct_type) = &ty
               && let Some(member) = struct_type.member(field)
               && !member.mutable
            {
                return Err(RuntimeError::ImmutableField { field: field.to_string(),
                                                          ty: ty.name(),
                                                          line });
            }
        } else if !binding.mutable {
            return Err(RuntimeError::ImmutableAssignment { name: name.to_string(),
                                                           line });
        }

        let index = entries.iter()
                           .position(|(key, _)| key == field)
                           .ok_or_else(unknown_field)?;
        let value = value.conform(&entries[index].1.ty, line)?;

        let mut updated = entries.as_ref().clone();
        updated[index].1 = value.clone();
        binding.value.payload = if is_struct {
            Payload::Struct(Rc::new(updated))
        } else {
            Payload::Map(Rc::new(updated))
        };

        Ok(value)
    }
}
