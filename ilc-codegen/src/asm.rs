//! x86-64 Assembly Instruction Definitions
//!
//! This module defines the small slice of the x86-64 instruction set the
//! generator emits, printed in AT&T syntax (`op src, dst`).

use std::fmt;

/// x86-64 registers used by the generator
///
/// `%rax` is the accumulator every expression leaves its value in and `%rbx`
/// holds the second operand of binary operators. `%al` and `%cl` are the byte
/// views needed by `setcc` and shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reg {
    Rax, Rbx, Rcx, Rdx, Rsi, Rdi,
    R8, R9,

    // Frame and stack
    Rbp, Rsp,

    // Instruction pointer, for RIP-relative data addresses
    Rip,

    // Byte registers
    Al, Cl,
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reg::Rax => write!(f, "%rax"),
            Reg::Rbx => write!(f, "%rbx"),
            Reg::Rcx => write!(f, "%rcx"),
            Reg::Rdx => write!(f, "%rdx"),
            Reg::Rsi => write!(f, "%rsi"),
            Reg::Rdi => write!(f, "%rdi"),
            Reg::R8 => write!(f, "%r8"),
            Reg::R9 => write!(f, "%r9"),
            Reg::Rbp => write!(f, "%rbp"),
            Reg::Rsp => write!(f, "%rsp"),
            Reg::Rip => write!(f, "%rip"),
            Reg::Al => write!(f, "%al"),
            Reg::Cl => write!(f, "%cl"),
        }
    }
}

/// Instruction operands
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Reg(Reg),
    Imm(i64),
    /// `offset(base)`, e.g. a frame slot `-8(%rbp)`
    Mem { offset: i32, base: Reg },
    /// `label(base)`, e.g. `.constant_0(%rip)`
    Symbol { label: String, base: Reg },
}

impl Operand {
    /// A slot in the current stack frame
    pub fn frame_slot(offset: i32) -> Self {
        Operand::Mem { offset, base: Reg::Rbp }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Reg(reg) => write!(f, "{}", reg),
            Operand::Imm(value) => write!(f, "${}", value),
            Operand::Mem { offset, base } => write!(f, "{}({})", offset, base),
            Operand::Symbol { label, base } => write!(f, "{}({})", label, base),
        }
    }
}

impl From<Reg> for Operand {
    fn from(reg: Reg) -> Self {
        Operand::Reg(reg)
    }
}

/// Condition codes for `setcc`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Equal => write!(f, "e"),
            Condition::NotEqual => write!(f, "ne"),
            Condition::Less => write!(f, "l"),
            Condition::Greater => write!(f, "g"),
            Condition::LessEqual => write!(f, "le"),
            Condition::GreaterEqual => write!(f, "ge"),
        }
    }
}

/// x86-64 Assembly Instructions
///
/// Two-operand forms are `(source, destination)` as in AT&T syntax.
#[derive(Debug, Clone, PartialEq)]
pub enum AsmInst {
    // Data movement
    Mov(Operand, Operand),
    Lea(Operand, Reg),
    Push(Reg),
    Pop(Reg),
    Movzbq(Reg, Reg),

    // Arithmetic and logic
    Add(Operand, Reg),
    Sub(Operand, Operand),
    Imul(Operand, Reg),
    Cqto,
    Idiv(Reg),
    And(Operand, Reg),
    Or(Operand, Reg),
    Shl(Reg, Reg), // count register, destination
    Shr(Reg, Reg),

    // Comparison
    Cmp(Operand, Operand),
    Set(Condition, Reg),

    // Control flow
    Jmp(String),
    Je(String),
    /// `external` targets go through the PLT
    Call { target: String, external: bool },
    Leave,
    Ret,

    // Assembly pseudo-instructions
    Label(String),
    Comment(String),
    /// Unindented assembler directive such as `.text`
    Directive(String),
    /// NUL-terminated string data; the text keeps its source quotes
    Asciz(String),
}

impl AsmInst {
    /// Whether the line is printed at column zero
    pub fn is_unindented(&self) -> bool {
        matches!(self, AsmInst::Label(_) | AsmInst::Comment(_) | AsmInst::Directive(_))
    }
}

impl fmt::Display for AsmInst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Data movement
            AsmInst::Mov(src, dst) => write!(f, "mov {}, {}", src, dst),
            AsmInst::Lea(src, dst) => write!(f, "lea {}, {}", src, dst),
            AsmInst::Push(reg) => write!(f, "push {}", reg),
            AsmInst::Pop(reg) => write!(f, "pop {}", reg),
            AsmInst::Movzbq(src, dst) => write!(f, "movzbq {}, {}", src, dst),

            // Arithmetic and logic
            AsmInst::Add(src, dst) => write!(f, "add {}, {}", src, dst),
            AsmInst::Sub(src, dst) => write!(f, "sub {}, {}", src, dst),
            AsmInst::Imul(src, dst) => write!(f, "imul {}, {}", src, dst),
            AsmInst::Cqto => write!(f, "cqto"),
            AsmInst::Idiv(reg) => write!(f, "idiv {}", reg),
            AsmInst::And(src, dst) => write!(f, "and {}, {}", src, dst),
            AsmInst::Or(src, dst) => write!(f, "or {}, {}", src, dst),
            AsmInst::Shl(count, dst) => write!(f, "shl {}, {}", count, dst),
            AsmInst::Shr(count, dst) => write!(f, "shr {}, {}", count, dst),

            // Comparison
            AsmInst::Cmp(lhs, rhs) => write!(f, "cmp {}, {}", lhs, rhs),
            AsmInst::Set(cond, reg) => write!(f, "set{} {}", cond, reg),

            // Control flow
            AsmInst::Jmp(label) => write!(f, "jmp {}", label),
            AsmInst::Je(label) => write!(f, "je {}", label),
            AsmInst::Call { target, external: false } => write!(f, "call {}", target),
            AsmInst::Call { target, external: true } => write!(f, "call {}@PLT", target),
            AsmInst::Leave => write!(f, "leave"),
            AsmInst::Ret => write!(f, "ret"),

            // Pseudo
            AsmInst::Label(label) => write!(f, "{}:", label),
            AsmInst::Comment(text) => write!(f, "#   {}", text),
            AsmInst::Directive(text) => write!(f, "{}", text),
            AsmInst::Asciz(text) => write!(f, ".asciz {}", text),
        }
    }
}

/// Render instructions one per line, indenting everything but labels,
/// comments and directives by four spaces
pub fn emit_instructions(instructions: &[AsmInst]) -> String {
    let mut output = String::new();
    for inst in instructions {
        if !inst.is_unindented() {
            output.push_str("    ");
        }
        output.push_str(&inst.to_string());
        output.push('\n');
    }
    output
}
