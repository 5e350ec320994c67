//! Operator definitions for ilang
//!
//! This module defines binary and unary operators and the static table of
//! which operand types each operator applies to.

use ilc_common::Type;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    // Arithmetic
    Add, Sub, Mul, Div,

    // Comparison
    Equal, NotEqual, Less, Greater, LessEqual, GreaterEqual,

    // Shifts
    LeftShift, RightShift,

    // Logical (both operands are always evaluated)
    LogicalAnd, LogicalOr,
}

impl BinaryOp {
    /// Whether the operator is defined for operands of type `ty`
    pub fn applies_to(self, ty: Type) -> bool {
        match self {
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => ty == Type::Integer,
            BinaryOp::Equal | BinaryOp::NotEqual => matches!(ty, Type::Integer | Type::Boolean),
            BinaryOp::Less | BinaryOp::Greater | BinaryOp::LessEqual | BinaryOp::GreaterEqual => {
                ty == Type::Integer
            }
            BinaryOp::LeftShift | BinaryOp::RightShift => ty == Type::Integer,
            BinaryOp::LogicalAnd | BinaryOp::LogicalOr => matches!(ty, Type::Integer | Type::Boolean),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op_str = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
            BinaryOp::LessEqual => "<=",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::LeftShift => "<<",
            BinaryOp::RightShift => ">>",
            BinaryOp::LogicalAnd => "&&",
            BinaryOp::LogicalOr => "||",
        };
        write!(f, "{}", op_str)
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    LogicalNot, // !
    Minus,      // -
}

impl UnaryOp {
    pub fn applies_to(self, ty: Type) -> bool {
        match self {
            UnaryOp::LogicalNot => ty == Type::Boolean,
            UnaryOp::Minus => ty == Type::Integer,
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::LogicalNot => write!(f, "!"),
            UnaryOp::Minus => write!(f, "-"),
        }
    }
}
