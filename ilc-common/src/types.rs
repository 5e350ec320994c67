//! Common types used throughout the compiler
//!
//! This module defines the closed set of ilang value types and the label
//! counters used by code generation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label identifier for code generation
pub type LabelId = u32;

/// The ilang value types.
///
/// `Undefined` is a sentinel for "not resolved yet" or "resolution failed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Type {
    Integer,
    Float,
    Boolean,
    String,
    Unit,
    #[default]
    Undefined,
}

impl Type {
    /// Frame bytes taken by every parameter and local, `unit` ones included
    pub const SLOT_SIZE: u32 = 8;

    /// Parse a source-level type name (`int`, `float`, `bool`, `string`, `unit`)
    pub fn from_name(name: &str) -> Option<Type> {
        match name {
            "int" => Some(Type::Integer),
            "float" => Some(Type::Float),
            "bool" => Some(Type::Boolean),
            "string" => Some(Type::String),
            "unit" => Some(Type::Unit),
            _ => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        !matches!(self, Type::Undefined)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Integer => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::Boolean => write!(f, "bool"),
            Type::String => write!(f, "string"),
            Type::Unit => write!(f, "unit"),
            Type::Undefined => write!(f, "undefined"),
        }
    }
}

/// Label generator for code generation.
///
/// Each generator owns one label namespace: labels are `{prefix}_{n}` with
/// `n` increasing monotonically from zero.
#[derive(Debug, Clone)]
pub struct LabelGenerator {
    prefix: String,
    next_id: LabelId,
}

impl LabelGenerator {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            next_id: 0,
        }
    }

    /// Generate a new unique label
    pub fn new_label(&mut self) -> String {
        let label = format!("{}_{}", self.prefix, self.next_id);
        self.next_id += 1;
        label
    }

    /// Number of labels handed out so far
    pub fn issued(&self) -> LabelId {
        self.next_id
    }
}
