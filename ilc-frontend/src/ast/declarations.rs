//! Top-level declarations and the flat declaration table
//!
//! Name resolution appends one `Declaration` per declaring site (function,
//! external, parameter, `let`) and stores its `DeclId` on the site's
//! identifier. Every later reference to the name carries the same `DeclId`.

use super::expressions::{Expression, Identifier, TypeAnnotation};
use ilc_common::{DeclId, SourceLocation, Type};
use serde::{Deserialize, Serialize};

/// A function parameter: `type name`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: Identifier,
    pub annotation: TypeAnnotation,
}

/// A function with a body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    pub name: Identifier,
    pub return_type: TypeAnnotation,
    pub parameters: Vec<Parameter>,
    pub body: Expression,
    pub location: SourceLocation,
}

/// A prototype-only `extrn` declaration, resolved by the linker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalDeclaration {
    pub name: Identifier,
    pub return_type: TypeAnnotation,
    pub parameters: Vec<Parameter>,
    pub is_variadic: bool,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclarationKind {
    Function,
    External,
    Parameter,
    Local,
}

/// Parameter types of a callable declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub parameters: Vec<Type>,
    pub is_variadic: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclarationKind,
    /// Declared type; the return type for callables
    pub ty: Type,
    pub location: SourceLocation,
    pub signature: Option<Signature>,
}

impl Declaration {
    pub fn is_callable(&self) -> bool {
        matches!(self.kind, DeclarationKind::Function | DeclarationKind::External)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeclarationTable {
    entries: Vec<Declaration>,
}

impl DeclarationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, declaration: Declaration) -> DeclId {
        let id = DeclId(self.entries.len() as u32);
        self.entries.push(declaration);
        id
    }

    pub fn get(&self, id: DeclId) -> Option<&Declaration> {
        self.entries.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (DeclId, &Declaration)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, d)| (DeclId(i as u32), d))
    }
}

/// A whole compilation unit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub functions: Vec<FunctionDeclaration>,
    pub externals: Vec<ExternalDeclaration>,
    pub declarations: DeclarationTable,
}

impl Program {
    /// The declaration a binding points at, if it is resolved
    pub fn declaration(&self, binding: Option<DeclId>) -> Option<&Declaration> {
        binding.and_then(|id| self.declarations.get(id))
    }
}
