use std::rc::Rc;

use crate::{
    ast::{Block, EnumDecl, StructDecl, TraitDecl},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Session, TestCase, ensure_closed},
        value::{
            core::Value,
            types::{EnumType, Member, MethodSignature, StructType, TraitType, Type, Variant},
        },
    },
};

impl Session {
    /// Evaluates a `struct` declaration and registers the struct type.
    ///
    /// Member types and derived traits are resolved at declaration time.
    ///
    /// # Errors
    /// - `MissingRCurly` if the body was not closed.
    /// - `UnknownType` for an unresolvable member type.
    /// - `TraitNotFound` for an unregistered derived trait.
    pub(crate) fn eval_struct_decl(&mut self, decl: &StructDecl) -> EvalResult<Value> {
        ensure_declaration_closed(decl.closed, "struct", decl.line)?;

        let members = decl.members
                          .iter()
                          .map(|member| {
                              Ok(Member { name:    member.name.clone(),
                                          ty:      self.types.resolve(&member.ty, decl.line)?,
                                          mutable: member.mutable, })
                          })
                          .collect::<EvalResult<Vec<_>>>()?;
        let derives = self.resolve_traits(&decl.derives, decl.line)?;

        let struct_type = StructType { name: decl.name.clone(),
                                       members,
                                       derives };
        self.types.register(&decl.name, Type::Struct(Rc::new(struct_type)));
        Ok(Value::unit())
    }

    /// Evaluates an `enum` declaration and registers the enum type.
    ///
    /// # Errors
    /// - `MissingRCurly` if the body was not closed.
    /// - `UnknownType` for an unresolvable associated type.
    /// - `TraitNotFound` for an unregistered derived trait.
    pub(crate) fn eval_enum_decl(&mut self, decl: &EnumDecl) -> EvalResult<Value> {
        ensure_declaration_closed(decl.closed, "enum", decl.line)?;

        let variants = decl.variants
                           .iter()
                           .map(|variant| {
                               let fields = variant.fields
                                                   .iter()
                                                   .map(|ty| self.types.resolve(ty, decl.line))
                                                   .collect::<EvalResult<Vec<_>>>()?;
                               Ok(Variant { name: variant.name.clone(),
                                            fields })
                           })
                           .collect::<EvalResult<Vec<_>>>()?;
        let derives = self.resolve_traits(&decl.derives, decl.line)?;

        let enum_type = EnumType { name: decl.name.clone(),
                                   variants,
                                   derives };
        self.types.register(&decl.name, Type::Enum(Rc::new(enum_type)));
        Ok(Value::unit())
    }

    /// Evaluates a `trait` declaration and registers the trait type.
    ///
    /// Inside member signatures, `Self` stands for the implementing type.
    ///
    /// # Errors
    /// - `MissingRCurly` if the body was not closed.
    /// - `UnknownType` for an unresolvable signature type.
    /// - `TraitNotFound` for an unregistered super trait.
    pub(crate) fn eval_trait_decl(&mut self, decl: &TraitDecl) -> EvalResult<Value> {
        ensure_declaration_closed(decl.closed, "trait", decl.line)?;

        let methods = decl.methods
                          .iter()
                          .map(|method| {
                              let params = method.params
                                                 .iter()
                                                 .map(|ty| self.types.resolve(ty, decl.line))
                                                 .collect::<EvalResult<Vec<_>>>()?;
                              Ok(MethodSignature { name: method.name.clone(),
                                                   params,
                                                   ret: self.types.resolve(&method.ret, decl.line)? })
                          })
                          .collect::<EvalResult<Vec<_>>>()?;
        let supertraits = self.resolve_traits(&decl.supertraits, decl.line)?;

        let trait_type = TraitType { name: decl.name.clone(),
                                     methods,
                                     supertraits };
        self.types.register(&decl.name, Type::Trait(Rc::new(trait_type)));
        Ok(Value::unit())
    }

    /// Registers a `test` block to be run by [`Session::run_tests`].
    pub(crate) fn eval_test_decl(&mut self,
                                 name: &str,
                                 body: &Rc<Block>,
                                 line: usize)
                                 -> EvalResult<Value> {
        ensure_closed(body, "test")?;
        self.register_test(TestCase { name: name.to_string(),
                                      body: Rc::clone(body),
                                      line });
        Ok(Value::unit())
    }

    /// Resolves every trait named in a `derive(...)` clause or super trait
    /// list, innermost registry level first.
    fn resolve_traits(&self, names: &[String], line: usize) -> EvalResult<Vec<Rc<TraitType>>> {
        names.iter()
             .map(|name| self.types.resolve_trait(name, line))
             .collect()
    }
}

fn ensure_declaration_closed(closed: bool,
                             construct: &'static str,
                             line: usize)
                             -> EvalResult<()> {
    if closed {
        Ok(())
    } else {
        Err(RuntimeError::MissingRCurly { construct, line })
    }
}
