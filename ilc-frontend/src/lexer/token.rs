//! Token definitions for the ilang lexer
//!
//! This module defines token types and the Token struct.

use ilc_common::SourceLocation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ilang token types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenType {
    /// Raw literal text: numbers, quoted strings (quotes kept), `true`,
    /// `false` and `unit`. The type resolver decides its type from its shape.
    Literal(String),

    Identifier(String),

    // Keywords
    Let,
    If,
    Else,
    Return,
    Extrn,
    While,
    Break,

    // Operators
    Equal,              // =
    Plus,               // +
    Minus,              // -
    Bang,               // !
    Star,               // *
    Slash,              // /
    EqualEqual,         // ==
    BangEqual,          // !=
    Less,               // <
    Greater,            // >
    LessEqual,          // <=
    GreaterEqual,       // >=
    LeftShift,          // <<
    RightShift,         // >>
    AmpersandAmpersand, // &&
    PipePipe,           // ||

    // Delimiters
    LeftParen,  // (
    RightParen, // )
    LeftBrace,  // {
    RightBrace, // }
    Semicolon,  // ;
    Colon,      // :
    Comma,      // ,
    Ellipsis,   // ...

    EndOfFile,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Literal(s) => write!(f, "{s}"),
            TokenType::Identifier(s) => write!(f, "{s}"),

            TokenType::Let => write!(f, "let"),
            TokenType::If => write!(f, "if"),
            TokenType::Else => write!(f, "else"),
            TokenType::Return => write!(f, "return"),
            TokenType::Extrn => write!(f, "extrn"),
            TokenType::While => write!(f, "while"),
            TokenType::Break => write!(f, "break"),

            TokenType::Equal => write!(f, "="),
            TokenType::Plus => write!(f, "+"),
            TokenType::Minus => write!(f, "-"),
            TokenType::Bang => write!(f, "!"),
            TokenType::Star => write!(f, "*"),
            TokenType::Slash => write!(f, "/"),
            TokenType::EqualEqual => write!(f, "=="),
            TokenType::BangEqual => write!(f, "!="),
            TokenType::Less => write!(f, "<"),
            TokenType::Greater => write!(f, ">"),
            TokenType::LessEqual => write!(f, "<="),
            TokenType::GreaterEqual => write!(f, ">="),
            TokenType::LeftShift => write!(f, "<<"),
            TokenType::RightShift => write!(f, ">>"),
            TokenType::AmpersandAmpersand => write!(f, "&&"),
            TokenType::PipePipe => write!(f, "||"),

            TokenType::LeftParen => write!(f, "("),
            TokenType::RightParen => write!(f, ")"),
            TokenType::LeftBrace => write!(f, "{{"),
            TokenType::RightBrace => write!(f, "}}"),
            TokenType::Semicolon => write!(f, ";"),
            TokenType::Colon => write!(f, ":"),
            TokenType::Comma => write!(f, ","),
            TokenType::Ellipsis => write!(f, "..."),

            TokenType::EndOfFile => write!(f, "end of file"),
        }
    }
}

/// A token with its type and the location of its first character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub token_type: TokenType,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(token_type: TokenType, location: SourceLocation) -> Self {
        Self { token_type, location }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.location, self.token_type)
    }
}
