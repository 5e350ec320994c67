//! ilang compiler - x86-64 Code Generation Backend
//!
//! This crate handles the final phase of compilation: lowering a checked
//! ilang AST to x86-64 assembly text in AT&T syntax. It includes:
//!
//! - The instruction and register model
//! - The System V register calling convention
//! - Frame layout, the string constant pool and instruction emission

pub mod abi;
pub mod asm;
pub mod constants;
pub mod context;
pub mod errors;
pub mod generator;

pub use abi::{AbiError, CallingConvention};
pub use asm::{AsmInst, Condition, Operand, Reg};
pub use constants::{Constant, ConstantPool};
pub use context::{FunctionContext, LocalVariable};
pub use errors::CodegenError;
pub use generator::{Generator, GeneratorOptions};

use ilc_frontend::ast::Program;

/// Main entry point for code generation
///
/// `program` must have passed semantic analysis with no diagnostics.
pub fn generate_assembly(program: &mut Program, options: &GeneratorOptions) -> Result<String, CodegenError> {
    Generator::new(options.clone()).generate(program)
}
