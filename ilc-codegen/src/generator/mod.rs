//! x86-64 code generation from a checked AST
//!
//! Generation runs in three stages over the whole program:
//! 1. signature collection builds one `FunctionContext` per function and
//!    checks the entry point,
//! 2. frame layout gives every parameter and `let` a frame slot, binds every
//!    identifier to its slot and puts string literals in the constant pool,
//! 3. emission walks each function body once, leaving every expression's
//!    value in `%rax`.

mod emit;
mod layout;

use crate::asm::{emit_instructions, AsmInst};
use crate::constants::ConstantPool;
use crate::context::FunctionContext;
use crate::errors::CodegenError;
use ilc_common::{LabelGenerator, Type};
use ilc_frontend::ast::{FunctionDeclaration, Program};
use std::collections::HashSet;

/// Options controlling the generated assembly
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorOptions {
    /// Name exported with `.globl`
    pub entry_point: String,
    /// Fail when no function is named `entry_point`
    pub require_entry_point: bool,
    /// Emit `#` comments marking prologues, epilogues and expressions
    pub emit_comments: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            entry_point: "main".to_string(),
            require_entry_point: true,
            emit_comments: true,
        }
    }
}

/// Generator state for one compilation
pub struct Generator {
    options: GeneratorOptions,
    /// Names of functions defined in the program; all other callees go
    /// through the PLT
    functions: HashSet<String>,
    constants: ConstantPool,
    conditional_labels: LabelGenerator,
    loop_labels: LabelGenerator,
    code: Vec<AsmInst>,
}

impl Generator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self {
            options,
            functions: HashSet::new(),
            constants: ConstantPool::new(),
            conditional_labels: LabelGenerator::new(".conditional_label"),
            loop_labels: LabelGenerator::new(".loop_label"),
            code: Vec::new(),
        }
    }

    /// Generate the assembly for a program that passed semantic analysis.
    ///
    /// The program is annotated in place with frame slots and constant
    /// labels. No text is returned if any stage fails.
    pub fn generate(mut self, program: &mut Program) -> Result<String, CodegenError> {
        let mut contexts = self.collect_signatures(&program.functions)?;
        self.check_entry_point()?;

        for (function, ctx) in program.functions.iter_mut().zip(contexts.iter_mut()) {
            self.layout_function(function, ctx)?;
        }

        self.emit_header();
        for (function, ctx) in program.functions.iter().zip(contexts.iter_mut()) {
            self.emit_function(function, ctx)?;
        }
        let data = self.data_section()?;

        log::debug!(
            "generated {} functions, {} constants, {} conditional and {} loop labels",
            contexts.len(),
            self.constants.len(),
            self.conditional_labels.issued(),
            self.loop_labels.issued()
        );

        let mut output = emit_instructions(&self.code);
        output.push('\n');
        output.push_str(&emit_instructions(&data));
        Ok(output)
    }

    fn collect_signatures(&mut self, functions: &[FunctionDeclaration]) -> Result<Vec<FunctionContext>, CodegenError> {
        let mut contexts = Vec::with_capacity(functions.len());

        for function in functions {
            let name = &function.name.name;
            if !self.functions.insert(name.clone()) {
                return Err(CodegenError::RedeclaredFunction {
                    name: name.clone(),
                    location: function.name.location.clone(),
                });
            }

            let parameter_types: Vec<Type> = function.parameters.iter().map(|p| p.annotation.ty).collect();
            contexts.push(FunctionContext::new(name, function.return_type.ty, parameter_types));
        }

        Ok(contexts)
    }

    fn check_entry_point(&self) -> Result<(), CodegenError> {
        if self.options.require_entry_point && !self.functions.contains(&self.options.entry_point) {
            return Err(CodegenError::MissingEntryPoint {
                name: self.options.entry_point.clone(),
            });
        }
        Ok(())
    }

    fn emit_header(&mut self) {
        self.comment("headers");
        self.emit(AsmInst::Directive(".text".to_string()));
        self.emit(AsmInst::Directive(format!(".globl {}", self.options.entry_point)));
    }

    fn data_section(&self) -> Result<Vec<AsmInst>, CodegenError> {
        let mut data = vec![AsmInst::Directive(".data".to_string())];

        for constant in self.constants.iter() {
            if constant.ty != Type::String {
                return Err(CodegenError::UnsupportedConstant {
                    label: constant.label.clone(),
                    ty: constant.ty,
                });
            }
            data.push(AsmInst::Label(constant.label.clone()));
            data.push(AsmInst::Asciz(constant.value.clone()));
        }

        Ok(data)
    }

    fn emit(&mut self, inst: AsmInst) {
        self.code.push(inst);
    }

    fn comment(&mut self, text: &str) {
        if self.options.emit_comments {
            self.code.push(AsmInst::Comment(text.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ilc_frontend::Frontend;

    fn program(source: &str) -> Program {
        Frontend::analyze_source(source, "test.il").unwrap()
    }

    #[test]
    fn test_missing_entry_point() {
        let mut program = program("int start() { 0 }");
        let err = Generator::new(GeneratorOptions::default())
            .generate(&mut program)
            .unwrap_err();
        assert_eq!(err, CodegenError::MissingEntryPoint { name: "main".to_string() });
    }

    #[test]
    fn test_entry_point_can_be_renamed_or_optional() {
        let options = GeneratorOptions {
            entry_point: "start".to_string(),
            ..GeneratorOptions::default()
        };
        let asm = Generator::new(options).generate(&mut program("int start() { 0 }")).unwrap();
        assert!(asm.contains(".globl start\n"));

        let options = GeneratorOptions {
            require_entry_point: false,
            ..GeneratorOptions::default()
        };
        assert!(Generator::new(options).generate(&mut program("int helper() { 0 }")).is_ok());
    }

    #[test]
    fn test_unsupported_constant() {
        let mut generator = Generator::new(GeneratorOptions::default());
        generator.constants.allocate("1", Type::Integer);

        let err = generator.data_section().unwrap_err();
        assert_eq!(err.to_string(), "Unsupported constant type int for '.constant_0'");
    }

    #[test]
    fn test_comments_can_be_disabled() {
        let options = GeneratorOptions {
            emit_comments: false,
            ..GeneratorOptions::default()
        };
        let asm = Generator::new(options).generate(&mut program("int main() { 0 }")).unwrap();
        assert!(!asm.contains('#'));
    }
}
