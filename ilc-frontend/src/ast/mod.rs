//! Abstract Syntax Tree definitions for ilang
//!
//! The AST is built once by the parser and then annotated in place: bindings by
//! name resolution, types by type resolution, frame slots and constant labels
//! by code generation.

pub mod declarations;
pub mod expressions;
pub mod ops;

pub use declarations::{
    Declaration, DeclarationKind, DeclarationTable, ExternalDeclaration, FunctionDeclaration,
    Parameter, Program, Signature,
};
pub use expressions::{Expression, ExpressionKind, Identifier, TypeAnnotation};
pub use ops::{BinaryOp, UnaryOp};
