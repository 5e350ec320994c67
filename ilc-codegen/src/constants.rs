//! Constant pool for the `.data` section
//!
//! Every string literal occurrence gets its own entry; equal strings are not
//! merged.

use ilc_common::{LabelGenerator, Type};

#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub label: String,
    pub ty: Type,
    /// Raw literal text, quotes included
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct ConstantPool {
    labels: LabelGenerator,
    constants: Vec<Constant>,
}

impl Default for ConstantPool {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstantPool {
    pub fn new() -> Self {
        Self {
            labels: LabelGenerator::new(".constant"),
            constants: Vec::new(),
        }
    }

    /// Add a constant under a fresh label and return the label
    pub fn allocate(&mut self, value: &str, ty: Type) -> String {
        let label = self.labels.new_label();
        self.constants.push(Constant {
            label: label.clone(),
            ty,
            value: value.to_string(),
        });
        label
    }

    /// Constants in allocation order
    pub fn iter(&self) -> std::slice::Iter<'_, Constant> {
        self.constants.iter()
    }

    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }
}
