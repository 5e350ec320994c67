//! Declaration parsing: functions, external prototypes, parameters and types

use crate::ast::{ExternalDeclaration, FunctionDeclaration, Identifier, Parameter, TypeAnnotation};
use crate::lexer::TokenType;
use crate::parser::{ParseError, Parser};
use ilc_common::CompilerError;

impl Parser {
    /// Parse `type ident "(" params ")" block`
    pub fn parse_function_declaration(&mut self) -> Result<FunctionDeclaration, CompilerError> {
        let location = self.current_location();
        let return_type = self.parse_type_annotation("function declaration")?;
        let name = self.parse_identifier("function declaration")?;
        let (parameters, _) = self.parse_parameter_list(false)?;
        let body = self.parse_block()?;

        Ok(FunctionDeclaration {
            name,
            return_type,
            parameters,
            body,
            location,
        })
    }

    /// Parse `"extrn" type ident "(" params ")" [";"]`
    pub fn parse_external_declaration(&mut self) -> Result<ExternalDeclaration, CompilerError> {
        let location = self.current_location();
        self.expect(TokenType::Extrn, "external declaration")?;
        let return_type = self.parse_type_annotation("external declaration")?;
        let name = self.parse_identifier("external declaration")?;
        let (parameters, is_variadic) = self.parse_parameter_list(true)?;
        self.match_token(&TokenType::Semicolon);

        Ok(ExternalDeclaration {
            name,
            return_type,
            parameters,
            is_variadic,
            location,
        })
    }

    /// Parse a parenthesized, comma separated parameter list.
    ///
    /// A trailing `...` is accepted only when `allow_variadic` is set.
    fn parse_parameter_list(&mut self, allow_variadic: bool) -> Result<(Vec<Parameter>, bool), CompilerError> {
        self.expect(TokenType::LeftParen, "parameter list")?;

        let mut parameters = Vec::new();
        let mut is_variadic = false;

        if !self.check(&TokenType::RightParen) {
            loop {
                if allow_variadic && self.match_token(&TokenType::Ellipsis) {
                    is_variadic = true;
                    break;
                }

                let annotation = self.parse_type_annotation("parameter")?;
                let name = self.parse_identifier("parameter")?;
                parameters.push(Parameter { name, annotation });

                if !self.match_token(&TokenType::Comma) {
                    break;
                }
            }
        }

        self.expect(TokenType::RightParen, "parameter list")?;
        Ok((parameters, is_variadic))
    }

    /// Parse a type name. `unit` lexes as a literal and is accepted here too.
    pub(crate) fn parse_type_annotation(&mut self, context: &str) -> Result<TypeAnnotation, ParseError> {
        let location = self.current_location();
        let name = match self.peek().map(|t| &t.token_type) {
            Some(TokenType::Identifier(name)) => name.clone(),
            Some(TokenType::Literal(value)) if value == "unit" => value.clone(),
            _ => return Err(self.unexpected(format!("type name in {}", context))),
        };
        self.advance();

        Ok(TypeAnnotation::new(name, location))
    }

    pub(crate) fn parse_identifier(&mut self, context: &str) -> Result<Identifier, ParseError> {
        let location = self.current_location();
        let name = match self.peek().map(|t| &t.token_type) {
            Some(TokenType::Identifier(name)) => name.clone(),
            _ => return Err(self.unexpected(format!("identifier in {}", context))),
        };
        self.advance();

        Ok(Identifier::new(name, location))
    }
}
