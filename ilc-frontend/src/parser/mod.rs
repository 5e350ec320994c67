//! ilang Recursive Descent Parser
//!
//! Parses ilang tokens into the raw (unresolved, untyped) AST.
//!
//! ```text
//! program    ::= { external | function }
//! external   ::= "extrn" type ident "(" [ params ] ")" [ ";" ]
//! function   ::= type ident "(" [ params ] ")" block
//! block      ::= "{" { expression ";" } [ expression ] "}"
//! expression ::= "return" value | "let" ident ":" type "=" value
//!              | ident "=" value | "while" value block | "break" | value
//! value      ::= unary [ binop value ]
//! unary      ::= ( "!" | "-" ) unary | primary
//! primary    ::= literal | ident "(" [ args ] ")" | ident | "(" value ")"
//!              | block | "if" value value [ "else" value ]
//! ```
//!
//! Binary chains are right-recursive without precedence, so `a - b - c`
//! parses as `a - (b - c)`.

pub mod declarations;
pub mod errors;
pub mod expressions;

use crate::ast::Program;
use crate::lexer::{Token, TokenType};
use ilc_common::{CompilerError, SourceLocation};
use std::collections::VecDeque;

pub use errors::ParseError;

/// ilang Parser
pub struct Parser {
    pub(crate) tokens: VecDeque<Token>,
    eof_location: SourceLocation,
}

impl Parser {
    /// Create a new parser over a token stream produced by the lexer
    pub fn new(tokens: Vec<Token>) -> Self {
        let eof_location = tokens
            .last()
            .map(|t| t.location.clone())
            .unwrap_or_else(SourceLocation::dummy);

        Self {
            tokens: tokens.into(),
            eof_location,
        }
    }

    /// Peek at current token without consuming
    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.front()
    }

    /// Peek at the token `offset` positions ahead of the current one
    pub(crate) fn peek_nth(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(offset)
    }

    /// Get current token and advance
    pub(crate) fn advance(&mut self) -> Option<Token> {
        self.tokens.pop_front()
    }

    /// Check if current token matches expected type
    pub(crate) fn check(&self, token_type: &TokenType) -> bool {
        if let Some(token) = self.peek() {
            std::mem::discriminant(&token.token_type) == std::mem::discriminant(token_type)
        } else {
            matches!(token_type, TokenType::EndOfFile)
        }
    }

    /// Consume token if it matches expected type
    pub(crate) fn match_token(&mut self, token_type: &TokenType) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Error for a token that cannot start or continue the current construct
    pub(crate) fn unexpected(&self, expected: String) -> ParseError {
        match self.peek() {
            Some(token) if !matches!(token.token_type, TokenType::EndOfFile) => {
                ParseError::UnexpectedToken {
                    expected,
                    found: token.clone(),
                }
            }
            _ => ParseError::UnexpectedEndOfFile {
                expected,
                location: self.current_location(),
            },
        }
    }

    /// Expect and consume a specific token type
    pub(crate) fn expect(&mut self, token_type: TokenType, context: &str) -> Result<Token, ParseError> {
        if self.check(&token_type) && !matches!(token_type, TokenType::EndOfFile) {
            if let Some(token) = self.advance() {
                return Ok(token);
            }
        }
        Err(self.unexpected(format!("'{}' in {}", token_type, context)))
    }

    /// Get current location for error reporting
    pub(crate) fn current_location(&self) -> SourceLocation {
        match self.peek() {
            Some(token) => token.location.clone(),
            None => self.eof_location.clone(),
        }
    }

    /// Parse a complete program
    pub fn parse_program(&mut self) -> Result<Program, CompilerError> {
        let mut program = Program::default();

        while !self.check(&TokenType::EndOfFile) {
            if self.check(&TokenType::Extrn) {
                program.externals.push(self.parse_external_declaration()?);
            } else {
                program.functions.push(self.parse_function_declaration()?);
            }
        }

        log::debug!(
            "parsed {} functions and {} external declarations",
            program.functions.len(),
            program.externals.len()
        );
        Ok(program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;
    use crate::lexer::Lexer;
    use ilc_common::Type;
    use pretty_assertions::assert_eq;

    fn parse(input: &str) -> Result<Program, CompilerError> {
        let tokens = Lexer::new(input, "test.il").tokenize()?;
        Parser::new(tokens).parse_program()
    }

    fn parse_value_from_str(input: &str) -> Expression {
        let tokens = Lexer::new(input, "test.il").tokenize().unwrap();
        Parser::new(tokens).parse_value().unwrap()
    }

    #[test]
    fn test_parse_function_with_parameters() {
        let program = parse("int add(int a, int b) { a + b }").unwrap();
        assert_eq!(program.functions.len(), 1);

        let func = &program.functions[0];
        assert_eq!(func.name.name, "add");
        assert_eq!(func.return_type.ty, Type::Integer);
        let names: Vec<_> = func.parameters.iter().map(|p| p.name.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);

        match &func.body.kind {
            ExpressionKind::Block { body, implicit_return } => {
                assert!(body.is_empty());
                assert!(matches!(
                    implicit_return.as_deref().map(|e| &e.kind),
                    Some(ExpressionKind::Binary { op: BinaryOp::Add, .. })
                ));
            }
            _ => panic!("Expected block body"),
        }
    }

    #[test]
    fn test_parse_external_declarations() {
        let program = parse(
            "extrn int printf(string format, ...)\nextrn unit exit(int code);\nint main() { 0 }",
        )
        .unwrap();

        assert_eq!(program.externals.len(), 2);
        assert!(program.externals[0].is_variadic);
        assert_eq!(program.externals[0].parameters.len(), 1);
        assert!(!program.externals[1].is_variadic);
        assert_eq!(program.externals[1].return_type.ty, Type::Unit);
        assert_eq!(program.functions.len(), 1);
    }

    #[test]
    fn test_binary_chains_are_right_recursive() {
        let expr = parse_value_from_str("a - b - c");
        match expr.kind {
            ExpressionKind::Binary { op: BinaryOp::Sub, left, right } => {
                assert!(matches!(left.kind, ExpressionKind::Identifier(_)));
                assert!(matches!(right.kind, ExpressionKind::Binary { op: BinaryOp::Sub, .. }));
            }
            _ => panic!("Expected binary expression"),
        }
    }

    #[test]
    fn test_unary_binds_tighter_than_binary() {
        let expr = parse_value_from_str("-a + b");
        match expr.kind {
            ExpressionKind::Binary { op: BinaryOp::Add, left, .. } => {
                assert!(matches!(left.kind, ExpressionKind::Unary { op: UnaryOp::Minus, .. }));
            }
            _ => panic!("Expected binary expression"),
        }
    }

    #[test]
    fn test_parse_statements() {
        let program = parse(
            "int main() { let x: int = 1; x = x + 1; while x < 10 { break; }; return x }",
        )
        .unwrap();

        match &program.functions[0].body.kind {
            ExpressionKind::Block { body, implicit_return } => {
                assert!(matches!(body[0].kind, ExpressionKind::Bind { .. }));
                assert!(matches!(body[1].kind, ExpressionKind::Assignment { .. }));
                assert!(matches!(body[2].kind, ExpressionKind::Loop { .. }));
                assert!(matches!(
                    implicit_return.as_deref().map(|e| &e.kind),
                    Some(ExpressionKind::Return(_))
                ));
            }
            _ => panic!("Expected block body"),
        }
    }

    #[test]
    fn test_parse_condition_and_call() {
        let expr = parse_value_from_str("if ready(1, x) { 1 } else 2");
        match expr.kind {
            ExpressionKind::Condition { condition, then_branch, else_branch } => {
                match condition.kind {
                    ExpressionKind::Call { callee, arguments } => {
                        assert_eq!(callee.name, "ready");
                        assert_eq!(arguments.len(), 2);
                    }
                    _ => panic!("Expected call"),
                }
                assert!(then_branch.is_block());
                assert!(else_branch.is_some());
            }
            _ => panic!("Expected condition"),
        }
    }

    #[test]
    fn test_parse_separated() {
        let expr = parse_value_from_str("(1 + 2) * 3");
        match expr.kind {
            ExpressionKind::Binary { op: BinaryOp::Mul, left, .. } => {
                assert!(matches!(left.kind, ExpressionKind::Separated(_)));
            }
            _ => panic!("Expected binary expression"),
        }
    }

    #[test]
    fn test_missing_semicolon_is_reported() {
        let err = parse("int main() { let x: int = 1 x }").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parse error at test.il:1:29: Expected '}' in block, found x"
        );
    }

    #[test]
    fn test_unexpected_end_of_file() {
        let err = parse("int main() {").unwrap_err();
        assert!(err.to_string().starts_with("Parse error at test.il:1:13: Unexpected end of file"));
    }
}
