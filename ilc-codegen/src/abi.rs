//! System V AMD64 ABI
//!
//! Only the register part of the calling convention is implemented: up to six
//! integer arguments are passed in registers and there is no stack-passed
//! overflow.

use crate::asm::Reg;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AbiError {
    #[error("Invalid register index {index}, allowed range is 0..{max}")]
    InvalidRegister { index: usize, max: usize },
}

/// System V calling convention
///
/// Register Usage:
/// - RDI, RSI, RDX, RCX, R8, R9: integer arguments, in order
/// - RAX: return value; zeroed before every call as the vector register count
///   for variadic callees
/// - RBP: frame pointer
pub struct CallingConvention;

impl CallingConvention {
    /// Maximum number of parameters that can be passed in registers
    pub const MAX_REG_PARAMS: usize = 6;

    /// Registers used for passing parameters
    pub const PARAM_REGS: [Reg; 6] = [Reg::Rdi, Reg::Rsi, Reg::Rdx, Reg::Rcx, Reg::R8, Reg::R9];

    pub const RETURN_REG: Reg = Reg::Rax;
    pub const FRAME_PTR: Reg = Reg::Rbp;
    pub const STACK_PTR: Reg = Reg::Rsp;

    /// Get the register for a parameter index (0-based)
    pub fn param_reg(index: usize) -> Result<Reg, AbiError> {
        Self::PARAM_REGS
            .get(index)
            .copied()
            .ok_or(AbiError::InvalidRegister {
                index,
                max: Self::MAX_REG_PARAMS,
            })
    }
}
