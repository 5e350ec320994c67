//! Error handling for the ilang compiler
//!
//! `CompilerError` is what every phase hands back to the driver. Lexing and
//! parsing stop at their first error; the semantic passes hand over their whole
//! `Diagnostics` report in one `Semantic` value.

use crate::diagnostics::Diagnostics;
use crate::source_loc::SourceLocation;
use thiserror::Error;

/// Main compiler error type that encompasses all phases of compilation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompilerError {
    #[error("Lexical error at {location}: {message}")]
    LexError {
        location: SourceLocation,
        message: String,
    },

    #[error("Parse error at {location}: {message}")]
    ParseError {
        location: SourceLocation,
        message: String,
    },

    #[error("{diagnostics}")]
    Semantic { diagnostics: Diagnostics },

    #[error("Code generation error: {message}")]
    CodegenError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("IO error: {message}")]
    IoError { message: String },
}

impl CompilerError {
    /// Create a lexer error
    pub fn lexer_error(message: String, location: SourceLocation) -> Self {
        CompilerError::LexError { location, message }
    }

    /// Create a parse error
    pub fn parse_error(message: String, location: SourceLocation) -> Self {
        CompilerError::ParseError { location, message }
    }

    /// Create a codegen error
    pub fn codegen_error(message: String) -> Self {
        CompilerError::CodegenError { message }
    }
}

/// Convert a non-empty semantic report into an error
impl From<Diagnostics> for CompilerError {
    fn from(diagnostics: Diagnostics) -> Self {
        CompilerError::Semantic { diagnostics }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for CompilerError {
    fn from(err: std::io::Error) -> Self {
        CompilerError::IoError {
            message: err.to_string(),
        }
    }
}
