use std::{collections::HashMap, rc::Rc};

use tracing::debug;

use crate::{
    ast::TypeExpr,
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::types::{Primitive, TraitType, Type},
    },
};

/// Traits every session can `derive` without declaring them.
pub const BUILTIN_TRAITS: &[&str] = &["Show", "Eq", "Compare", "Hash", "Default", "Debug"];

/// The scoped store of named types.
///
/// Level 0 is global and holds every declared struct, enum and trait, plus
/// the built-in traits. Inner levels are pushed and popped together with
/// scope frames. Primitive names are resolved from a fixed table before the
/// levels are consulted, so they cannot be shadowed.
#[derive(Debug)]
pub struct TypeRegistry {
    levels: Vec<HashMap<String, Type>>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates a registry whose global level holds the built-in traits.
    ///
    /// # Example
    /// ```
    /// use moonpad::interpreter::evaluator::registry::TypeRegistry;
    ///
    /// let registry = TypeRegistry::new();
    /// assert!(registry.resolve_trait("Show", 1).is_ok());
    /// assert!(registry.resolve_trait("Printable", 1).is_err());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        let global = BUILTIN_TRAITS.iter()
                                   .map(|name| {
                                       ((*name).to_string(),
                                        Type::Trait(Rc::new(TraitType::marker(name))))
                                   })
                                   .collect();
        Self { levels: vec![global] }
    }

    /// Registers `ty` under `name` in the global level, replacing any earlier
    /// type of that name.
    pub fn register(&mut self, name: &str, ty: Type) {
        debug!(name, "registering type");
        self.levels[0].insert(name.to_string(), ty);
    }

    /// Finds a declared type, searching from the innermost level outwards.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Type> {
        self.levels.iter().rev().find_map(|level| level.get(name))
    }

    /// Enters a new innermost level.
    pub fn push(&mut self) {
        self.levels.push(HashMap::new());
    }

    /// Leaves the innermost level. The global level is never removed.
    pub fn pop(&mut self) {
        if self.levels.len() > 1 {
            self.levels.pop();
        }
    }

    /// Drops every level except the global one.
    pub fn truncate_to_global(&mut self) {
        self.levels.truncate(1);
    }

    /// Resolves a type name: primitives first, then declared types.
    ///
    /// # Errors
    /// `RuntimeError::UnknownType` if nothing is registered under `name`.
    pub fn resolve_name(&self, name: &str, line: usize) -> EvalResult<Type> {
        if let Some(primitive) = Primitive::from_name(name) {
            return Ok(Type::Primitive(primitive));
        }

        self.lookup(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownType { name: name.to_string(),
                                                       line })
    }

    /// Resolves a written type annotation.
    ///
    /// # Errors
    /// `RuntimeError::UnknownType` for any unresolvable name in the
    /// annotation.
    pub fn resolve(&self, annotation: &TypeExpr, line: usize) -> EvalResult<Type> {
        match annotation {
            TypeExpr::Named(name) => self.resolve_name(name, line),
            TypeExpr::Function { params, ret } => {
                let params = params.iter()
                                   .map(|param| self.resolve(param, line))
                                   .collect::<EvalResult<Vec<_>>>()?;
                Ok(Type::function(params, self.resolve(ret, line)?))
            },
        }
    }

    /// Resolves a trait named in a `derive(...)` clause or a super trait
    /// list.
    ///
    /// # Errors
    /// `RuntimeError::TraitNotFound` if `name` is unregistered or names a
    /// type that is not a trait.
    pub fn resolve_trait(&self, name: &str, line: usize) -> EvalResult<Rc<TraitType>> {
        match self.lookup(name) {
            Some(Type::Trait(trait_type)) => Ok(Rc::clone(trait_type)),
            _ => Err(RuntimeError::TraitNotFound { name: name.to_string(),
                                                   line }),
        }
    }
}
