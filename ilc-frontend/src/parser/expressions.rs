//! Expression parsing
//!
//! Blocks, statement-level expressions (`let`, `return`, `while`, `break`,
//! assignment), binary chains, unary operators and primaries.

use crate::ast::{BinaryOp, Expression, ExpressionKind, UnaryOp};
use crate::lexer::TokenType;
use crate::parser::{ParseError, Parser};

impl Parser {
    /// Parse `"{" { expression ";" } [ expression ] "}"`
    pub fn parse_block(&mut self) -> Result<Expression, ParseError> {
        let location = self.current_location();
        self.expect(TokenType::LeftBrace, "block")?;

        let mut body = Vec::new();
        let mut implicit_return = None;

        while !self.match_token(&TokenType::RightBrace) {
            let expression = self.parse_expression()?;
            if self.match_token(&TokenType::Semicolon) {
                body.push(expression);
                continue;
            }

            self.expect(TokenType::RightBrace, "block")?;
            implicit_return = Some(Box::new(expression));
            break;
        }

        Ok(Expression::new(
            ExpressionKind::Block {
                body,
                implicit_return,
            },
            location,
        ))
    }

    /// Parse one statement-level expression
    pub fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        let location = self.current_location();

        match self.peek().map(|t| &t.token_type) {
            Some(TokenType::Return) => {
                self.advance();
                let value = self.parse_value()?;
                Ok(Expression::new(ExpressionKind::Return(Box::new(value)), location))
            }
            Some(TokenType::Let) => {
                self.advance();
                let name = self.parse_identifier("let binding")?;
                self.expect(TokenType::Colon, "let binding")?;
                let annotation = self.parse_type_annotation("let binding")?;
                self.expect(TokenType::Equal, "let binding")?;
                let value = self.parse_value()?;
                Ok(Expression::new(
                    ExpressionKind::Bind {
                        name,
                        annotation,
                        value: Box::new(value),
                    },
                    location,
                ))
            }
            Some(TokenType::While) => {
                self.advance();
                let condition = self.parse_value()?;
                let body = self.parse_block()?;
                Ok(Expression::new(
                    ExpressionKind::Loop {
                        condition: Box::new(condition),
                        body: Box::new(body),
                    },
                    location,
                ))
            }
            Some(TokenType::Break) => {
                self.advance();
                Ok(Expression::new(ExpressionKind::Break, location))
            }
            Some(TokenType::Identifier(_))
                if matches!(self.peek_nth(1).map(|t| &t.token_type), Some(TokenType::Equal)) =>
            {
                let target = self.parse_identifier("assignment")?;
                self.advance();
                let value = self.parse_value()?;
                Ok(Expression::new(
                    ExpressionKind::Assignment {
                        target,
                        value: Box::new(value),
                    },
                    location,
                ))
            }
            _ => self.parse_value(),
        }
    }

    /// Parse `unary [ binop value ]`
    pub fn parse_value(&mut self) -> Result<Expression, ParseError> {
        let left = self.parse_unary()?;

        let op = match self.peek().map(|t| &t.token_type).and_then(binary_operator) {
            Some(op) => op,
            None => return Ok(left),
        };
        self.advance();

        let right = self.parse_value()?;
        let location = left.location.clone();
        Ok(Expression::new(
            ExpressionKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            location,
        ))
    }

    fn parse_unary(&mut self) -> Result<Expression, ParseError> {
        let location = self.current_location();
        let op = match self.peek().map(|t| &t.token_type) {
            Some(TokenType::Bang) => UnaryOp::LogicalNot,
            Some(TokenType::Minus) => UnaryOp::Minus,
            _ => return self.parse_primary(),
        };
        self.advance();

        let operand = self.parse_unary()?;
        Ok(Expression::new(
            ExpressionKind::Unary {
                op,
                operand: Box::new(operand),
            },
            location,
        ))
    }

    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        let location = self.current_location();

        match self.peek().map(|t| &t.token_type) {
            Some(TokenType::Literal(value)) => {
                let expression = Expression::literal(value, location);
                self.advance();
                Ok(expression)
            }
            Some(TokenType::Identifier(_)) => {
                let identifier = self.parse_identifier("expression")?;
                if !self.check(&TokenType::LeftParen) {
                    return Ok(Expression::new(ExpressionKind::Identifier(identifier), location));
                }

                let arguments = self.parse_arguments()?;
                Ok(Expression::new(
                    ExpressionKind::Call {
                        callee: identifier,
                        arguments,
                    },
                    location,
                ))
            }
            Some(TokenType::LeftParen) => {
                self.advance();
                let inner = self.parse_value()?;
                self.expect(TokenType::RightParen, "parenthesized expression")?;
                Ok(Expression::new(ExpressionKind::Separated(Box::new(inner)), location))
            }
            Some(TokenType::LeftBrace) => self.parse_block(),
            Some(TokenType::If) => {
                self.advance();
                let condition = self.parse_value()?;
                let then_branch = self.parse_value()?;
                let else_branch = if self.match_token(&TokenType::Else) {
                    Some(Box::new(self.parse_value()?))
                } else {
                    None
                };
                Ok(Expression::new(
                    ExpressionKind::Condition {
                        condition: Box::new(condition),
                        then_branch: Box::new(then_branch),
                        else_branch,
                    },
                    location,
                ))
            }
            _ => Err(self.unexpected("expression".to_string())),
        }
    }

    /// Parse `"(" [ value { "," value } ] ")"`
    fn parse_arguments(&mut self) -> Result<Vec<Expression>, ParseError> {
        self.expect(TokenType::LeftParen, "call arguments")?;

        let mut arguments = Vec::new();
        if !self.check(&TokenType::RightParen) {
            loop {
                arguments.push(self.parse_value()?);
                if !self.match_token(&TokenType::Comma) {
                    break;
                }
            }
        }

        self.expect(TokenType::RightParen, "call arguments")?;
        Ok(arguments)
    }
}

fn binary_operator(token_type: &TokenType) -> Option<BinaryOp> {
    let op = match token_type {
        TokenType::Plus => BinaryOp::Add,
        TokenType::Minus => BinaryOp::Sub,
        TokenType::Star => BinaryOp::Mul,
        TokenType::Slash => BinaryOp::Div,
        TokenType::EqualEqual => BinaryOp::Equal,
        TokenType::BangEqual => BinaryOp::NotEqual,
        TokenType::Less => BinaryOp::Less,
        TokenType::Greater => BinaryOp::Greater,
        TokenType::LessEqual => BinaryOp::LessEqual,
        TokenType::GreaterEqual => BinaryOp::GreaterEqual,
        TokenType::LeftShift => BinaryOp::LeftShift,
        TokenType::RightShift => BinaryOp::RightShift,
        TokenType::AmpersandAmpersand => BinaryOp::LogicalAnd,
        TokenType::PipePipe => BinaryOp::LogicalOr,
        _ => return None,
    };
    Some(op)
}
