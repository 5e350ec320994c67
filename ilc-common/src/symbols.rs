//! Declaration handles and lexical scope chains
//!
//! `ScopeChain` is the scope model shared by the name resolver (mapping names
//! to `DeclId`s) and the code generator's local-variable table (mapping names
//! to frame slots).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Index of a declaration in a program's flat declaration table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeclId(pub u32);

impl DeclId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a local variable in one function's frame layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocalId(pub u32);

impl LocalId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A stack of lexical scopes, innermost last.
///
/// A name may be declared once per scope; inner scopes may shadow outer ones.
#[derive(Debug, Clone)]
pub struct ScopeChain<T> {
    scopes: Vec<HashMap<String, T>>,
}

impl<T> Default for ScopeChain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ScopeChain<T> {
    /// Create a chain with no open scopes
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    /// Enter a new scope
    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Exit the innermost scope, returning whether one was open
    pub fn pop_scope(&mut self) -> bool {
        self.scopes.pop().is_some()
    }

    /// Declare `name` in the innermost scope.
    ///
    /// Fails with the existing entry if the innermost scope already holds
    /// `name`. Declaring with no open scope opens one first.
    pub fn declare(&mut self, name: &str, value: T) -> Result<(), &T> {
        if self.scopes.is_empty() {
            self.push_scope();
        }
        let last = self.scopes.len() - 1;
        if self.scopes[last].contains_key(name) {
            return Err(&self.scopes[last][name]);
        }
        self.scopes[last].insert(name.to_string(), value);
        Ok(())
    }

    /// Look up a name from the innermost scope outward
    pub fn lookup(&self, name: &str) -> Option<&T> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }
}
