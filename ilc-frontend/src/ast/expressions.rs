//! Expression AST nodes for ilang
//!
//! Everything inside a function body is an expression, including bindings,
//! loops and `return`.

use super::ops::{BinaryOp, UnaryOp};
use ilc_common::{DeclId, LocalId, SourceLocation, Type};
use serde::{Deserialize, Serialize};

/// A name occurrence, either declaring or referring.
///
/// `binding` is filled by name resolution; on a declaring occurrence it is the
/// declaration's own entry. `local` is filled by the code generator's frame
/// layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    pub location: SourceLocation,
    pub binding: Option<DeclId>,
    pub local: Option<LocalId>,
}

impl Identifier {
    pub fn new(name: String, location: SourceLocation) -> Self {
        Self {
            name,
            location,
            binding: None,
            local: None,
        }
    }
}

/// A type name as written in the source, with the type it denotes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeAnnotation {
    pub name: String,
    pub location: SourceLocation,
    pub ty: Type,
}

impl TypeAnnotation {
    /// Unknown names denote `Type::Undefined`
    pub fn new(name: String, location: SourceLocation) -> Self {
        let ty = Type::from_name(&name).unwrap_or(Type::Undefined);
        Self { name, location, ty }
    }
}

/// AST Expression nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub location: SourceLocation,
    pub expr_type: Type, // Filled during type resolution
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpressionKind {
    /// Raw literal text; `constant` is the data label the generator assigned
    /// to a string literal
    Literal {
        value: String,
        constant: Option<String>,
    },

    Identifier(Identifier),

    Call {
        callee: Identifier,
        arguments: Vec<Expression>,
    },

    /// Statements followed by an optional trailing implicit return
    Block {
        body: Vec<Expression>,
        implicit_return: Option<Box<Expression>>,
    },

    /// `let name: type = value`
    Bind {
        name: Identifier,
        annotation: TypeAnnotation,
        value: Box<Expression>,
    },

    Assignment {
        target: Identifier,
        value: Box<Expression>,
    },

    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },

    /// Parenthesized expression
    Separated(Box<Expression>),

    /// `if condition then [else otherwise]`
    Condition {
        condition: Box<Expression>,
        then_branch: Box<Expression>,
        else_branch: Option<Box<Expression>>,
    },

    Return(Box<Expression>),

    /// `while condition body`
    Loop {
        condition: Box<Expression>,
        body: Box<Expression>,
    },

    Break,
}

impl Expression {
    pub fn new(kind: ExpressionKind, location: SourceLocation) -> Self {
        Self {
            kind,
            location,
            expr_type: Type::Undefined,
        }
    }

    pub fn literal(value: &str, location: SourceLocation) -> Self {
        Self::new(
            ExpressionKind::Literal {
                value: value.to_string(),
                constant: None,
            },
            location,
        )
    }

    pub fn is_block(&self) -> bool {
        matches!(self.kind, ExpressionKind::Block { .. })
    }
}
