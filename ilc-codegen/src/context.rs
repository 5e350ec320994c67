//! Per-function generation state
//!
//! A `FunctionContext` owns the frame layout of one function: its local
//! variable table, the local scope chain used while laying the frame out, the
//! running stack offset, and the stack of enclosing loop exit labels.

use crate::errors::CodegenError;
use ilc_common::{LocalId, ScopeChain, SourceLocation, Type};

/// A parameter or `let` binding with a home slot in the frame
#[derive(Debug, Clone, PartialEq)]
pub struct LocalVariable {
    pub name: String,
    pub ty: Type,
    /// Offset from `%rbp`; always negative
    pub offset: i32,
    /// `name#n`, unique within the function
    pub unique_id: String,
}

#[derive(Debug, Clone)]
pub struct FunctionContext {
    pub name: String,
    pub return_type: Type,
    pub parameter_types: Vec<Type>,
    locals: Vec<LocalVariable>,
    scopes: ScopeChain<LocalId>,
    stack_offset: u32,
    loop_stack: Vec<String>,
}

impl FunctionContext {
    pub fn new(name: &str, return_type: Type, parameter_types: Vec<Type>) -> Self {
        Self {
            name: name.to_string(),
            return_type,
            parameter_types,
            locals: Vec::new(),
            scopes: ScopeChain::new(),
            stack_offset: 0,
            loop_stack: Vec::new(),
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push_scope();
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop_scope();
    }

    /// Give `name` the next 8-byte frame slot in the innermost scope
    pub fn register_local(
        &mut self,
        name: &str,
        ty: Type,
        location: &SourceLocation,
    ) -> Result<LocalId, CodegenError> {
        let id = LocalId(self.locals.len() as u32);
        if self.scopes.declare(name, id).is_err() {
            return Err(CodegenError::RedefinedLocal {
                name: name.to_string(),
                location: location.clone(),
            });
        }

        self.stack_offset += Type::SLOT_SIZE;
        let local = LocalVariable {
            name: name.to_string(),
            ty,
            offset: -(self.stack_offset as i32),
            unique_id: format!("{}#{}", name, id.index()),
        };
        log::trace!("{}: {} at {}(%rbp)", self.name, local.unique_id, local.offset);

        self.locals.push(local);
        Ok(id)
    }

    /// Find the innermost visible local called `name`
    pub fn resolve(&self, name: &str, location: &SourceLocation) -> Result<LocalId, CodegenError> {
        self.scopes
            .lookup(name)
            .copied()
            .ok_or_else(|| CodegenError::UnresolvedLocal {
                name: name.to_string(),
                location: location.clone(),
            })
    }

    pub fn local(&self, id: LocalId) -> Option<&LocalVariable> {
        self.locals.get(id.index())
    }

    pub fn locals(&self) -> &[LocalVariable] {
        &self.locals
    }

    /// Bytes reserved below `%rbp` for parameters and locals
    pub fn frame_size(&self) -> u32 {
        self.stack_offset
    }

    pub fn push_loop(&mut self, end_label: String) {
        self.loop_stack.push(end_label);
    }

    pub fn pop_loop(&mut self) {
        self.loop_stack.pop();
    }

    /// Exit label of the innermost enclosing loop
    pub fn current_loop(&self) -> Option<&str> {
        self.loop_stack.last().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> FunctionContext {
        let mut ctx = FunctionContext::new("f", Type::Integer, vec![Type::Integer]);
        ctx.push_scope();
        ctx
    }

    #[test]
    fn test_slots_are_allocated_downward() {
        let mut ctx = context();
        let loc = SourceLocation::dummy();
        let a = ctx.register_local("a", Type::Integer, &loc).unwrap();
        let b = ctx.register_local("b", Type::Unit, &loc).unwrap();

        assert_eq!(ctx.local(a).map(|l| l.offset), Some(-8));
        assert_eq!(ctx.local(b).map(|l| l.offset), Some(-16));
        assert_eq!(ctx.local(b).map(|l| l.unique_id.as_str()), Some("b#1"));
        assert_eq!(ctx.frame_size(), 16);
    }

    #[test]
    fn test_redefinition_in_same_scope() {
        let mut ctx = context();
        let loc = SourceLocation::new("t.il", 2, 3);
        ctx.register_local("a", Type::Integer, &loc).unwrap();

        let err = ctx.register_local("a", Type::Integer, &loc).unwrap_err();
        assert_eq!(err.to_string(), "Redefinition of variable 'a' at t.il:2:3");
    }

    #[test]
    fn test_shadowing_gets_a_new_slot() {
        let mut ctx = context();
        let loc = SourceLocation::dummy();
        let outer = ctx.register_local("a", Type::Integer, &loc).unwrap();

        ctx.push_scope();
        let inner = ctx.register_local("a", Type::Boolean, &loc).unwrap();
        assert_eq!(ctx.resolve("a", &loc), Ok(inner));
        ctx.pop_scope();

        assert_eq!(ctx.resolve("a", &loc), Ok(outer));
        assert!(matches!(
            ctx.resolve("b", &loc),
            Err(CodegenError::UnresolvedLocal { .. })
        ));
    }

    #[test]
    fn test_loop_stack() {
        let mut ctx = context();
        assert_eq!(ctx.current_loop(), None);

        ctx.push_loop(".loop_label_1".to_string());
        ctx.push_loop(".loop_label_3".to_string());
        assert_eq!(ctx.current_loop(), Some(".loop_label_3"));

        ctx.pop_loop();
        assert_eq!(ctx.current_loop(), Some(".loop_label_1"));
    }
}
