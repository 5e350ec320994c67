//! Code generation error types
//!
//! The generator only sees programs that passed semantic analysis, so each of
//! these is an invariant violation. Generation stops at the first one.

use crate::abi::AbiError;
use ilc_common::{CompilerError, SourceLocation, Type};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodegenError {
    #[error("Redefinition of function '{name}' at {location}")]
    RedeclaredFunction {
        name: String,
        location: SourceLocation,
    },

    #[error("No entry point '{name}'")]
    MissingEntryPoint { name: String },

    #[error("Undefined local variable '{name}' at {location}")]
    UnresolvedLocal {
        name: String,
        location: SourceLocation,
    },

    #[error("Redefinition of variable '{name}' at {location}")]
    RedefinedLocal {
        name: String,
        location: SourceLocation,
    },

    #[error("Function '{function}' has {count} parameters, at most {max} are supported")]
    TooManyParameters {
        function: String,
        count: usize,
        max: usize,
    },

    #[error("Call to '{callee}' at {location} has {count} arguments, at most {max} are supported")]
    TooManyArguments {
        callee: String,
        count: usize,
        max: usize,
        location: SourceLocation,
    },

    #[error("Unsupported {ty} literal '{value}' at {location}")]
    UnsupportedLiteral {
        value: String,
        ty: Type,
        location: SourceLocation,
    },

    #[error("Unsupported constant type {ty} for '{label}'")]
    UnsupportedConstant { label: String, ty: Type },

    #[error("Break outside of a loop at {location}")]
    BreakOutsideLoop { location: SourceLocation },

    #[error(transparent)]
    InvalidRegister(#[from] AbiError),
}

impl From<CodegenError> for CompilerError {
    fn from(err: CodegenError) -> Self {
        CompilerError::codegen_error(err.to_string())
    }
}
