//! ilang compiler - Frontend
//!
//! This crate provides the frontend components for the ilang compiler:
//! - Lexer: tokenizes ilang source code
//! - Parser: builds the AST from tokens
//! - AST: abstract syntax tree and the flat declaration table
//! - Semantic analysis: name resolution, type resolution and type checking

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod semantic;

pub use ast::{
    BinaryOp, Declaration, DeclarationKind, DeclarationTable, Expression, ExpressionKind,
    ExternalDeclaration, FunctionDeclaration, Identifier, Parameter, Program, Signature,
    TypeAnnotation, UnaryOp,
};
pub use lexer::{Lexer, Token, TokenType};
pub use parser::{ParseError, Parser};
pub use semantic::{analyze, check_types, resolve_names, resolve_types};

use ilc_common::{CompilerError, Diagnostics};

/// High-level frontend interface
pub struct Frontend;

impl Frontend {
    /// Parse ilang source code into an unresolved AST
    pub fn parse_source(source: &str, filename: &str) -> Result<Program, CompilerError> {
        let tokens = Self::tokenize_source(source, filename)?;
        let mut parser = Parser::new(tokens);
        parser.parse_program()
    }

    /// Run the semantic passes over a parsed program
    pub fn analyze(program: &mut Program) -> Diagnostics {
        semantic::analyze(program)
    }

    /// Parse and analyze ilang source code.
    ///
    /// Any diagnostic turns into `CompilerError::Semantic`, so a returned
    /// program is always safe to hand to code generation.
    pub fn analyze_source(source: &str, filename: &str) -> Result<Program, CompilerError> {
        let mut program = Self::parse_source(source, filename)?;

        let diagnostics = Self::analyze(&mut program);
        if !diagnostics.is_empty() {
            return Err(diagnostics.into());
        }

        Ok(program)
    }

    /// Tokenize source code (for debugging)
    pub fn tokenize_source(source: &str, filename: &str) -> Result<Vec<Token>, CompilerError> {
        let mut lexer = Lexer::new(source, filename);
        lexer.tokenize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ilc_common::{DiagnosticKind, MismatchReason, Type};

    #[test]
    fn test_frontend_parse_simple_function() {
        let source = r#"
int main() {
    return 42
}
"#;

        let program = Frontend::parse_source(source, "main.il").unwrap();
        assert_eq!(program.functions.len(), 1);
        assert_eq!(program.functions[0].name.name, "main");
        assert_eq!(program.functions[0].return_type.ty, Type::Integer);
    }

    #[test]
    fn test_frontend_tokenize() {
        let tokens = Frontend::tokenize_source("let x: int = 42;", "main.il").unwrap();

        // let, x, :, int, =, 42, ;, EOF
        assert_eq!(tokens.len(), 8);
        assert!(matches!(tokens[0].token_type, TokenType::Let));
        assert!(matches!(tokens[1].token_type, TokenType::Identifier(_)));
        assert!(matches!(tokens[5].token_type, TokenType::Literal(ref v) if v == "42"));
        assert!(matches!(tokens[7].token_type, TokenType::EndOfFile));
    }

    #[test]
    fn test_analyze_source_rejects_diagnostics() {
        let err = Frontend::analyze_source("int main() { missing }", "main.il").unwrap_err();
        match err {
            CompilerError::Semantic { diagnostics } => {
                let kinds: Vec<_> = diagnostics.iter().map(|d| d.kind).collect();
                assert_eq!(
                    kinds,
                    vec![
                        DiagnosticKind::UndeclaredIdentifier,
                        DiagnosticKind::UnresolvedType,
                        DiagnosticKind::TypeMismatch(MismatchReason::Return),
                    ]
                );
            }
            other => panic!("Expected semantic error, got {:?}", other),
        }
    }

    #[test]
    fn test_analyze_source_accepts_valid_program() {
        let program = Frontend::analyze_source(
            "extrn int puts(string s)\nint main() { puts(\"hi\"); 0 }",
            "main.il",
        )
        .unwrap();
        assert_eq!(program.declarations.len(), 3);
    }
}
