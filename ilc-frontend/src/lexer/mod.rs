//! ilang Lexer
//!
//! Tokenizes ilang source code into a flat stream of positioned tokens.
//! Handles keywords, operators, literals, identifiers, and line comments.

pub mod token;

pub use token::{Token, TokenType};

use ilc_common::{CompilerError, SourceLocation};
use std::collections::HashMap;

/// ilang Lexer
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: u32,
    column: u32,
    filename: String,
    keywords: HashMap<&'static str, TokenType>,
}

impl Lexer {
    /// Create a new lexer; `filename` is only used for locations
    pub fn new(input: &str, filename: &str) -> Self {
        let keywords = [
            ("let", TokenType::Let),
            ("if", TokenType::If),
            ("else", TokenType::Else),
            ("return", TokenType::Return),
            ("extrn", TokenType::Extrn),
            ("while", TokenType::While),
            ("break", TokenType::Break),
            ("true", TokenType::Literal("true".to_string())),
            ("false", TokenType::Literal("false".to_string())),
            ("unit", TokenType::Literal("unit".to_string())),
        ];

        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            filename: filename.to_string(),
            keywords: keywords.into_iter().collect(),
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.current_char()?;
        self.position += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(&self.filename, self.line, self.column)
    }

    /// Skip whitespace and `//` comments
    fn skip_trivia(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else if ch == '/' && self.peek_char(1) == Some('/') {
                while let Some(c) = self.current_char() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn tokenize_word(&mut self) -> TokenType {
        let mut word = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                word.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match self.keywords.get(word.as_str()) {
            Some(keyword) => keyword.clone(),
            None => TokenType::Identifier(word),
        }
    }

    /// Digit run with an optional fractional part
    fn tokenize_number(&mut self) -> TokenType {
        let mut number = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if self.current_char() == Some('.') && self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) {
            number.push('.');
            self.advance();
            while let Some(ch) = self.current_char() {
                if ch.is_ascii_digit() {
                    number.push(ch);
                    self.advance();
                } else {
                    break;
                }
            }
        }

        TokenType::Literal(number)
    }

    /// String literal; quotes and escape sequences are kept verbatim
    fn tokenize_string(&mut self, start: &SourceLocation) -> Result<TokenType, CompilerError> {
        let mut text = String::new();
        if let Some(quote) = self.advance() {
            text.push(quote);
        }

        loop {
            match self.advance() {
                Some('"') => {
                    text.push('"');
                    return Ok(TokenType::Literal(text));
                }
                Some('\\') => {
                    text.push('\\');
                    match self.advance() {
                        Some(escaped) if escaped != '\n' => text.push(escaped),
                        _ => break,
                    }
                }
                Some('\n') | None => break,
                Some(ch) => text.push(ch),
            }
        }

        Err(CompilerError::lexer_error(
            "Unterminated string literal".to_string(),
            start.clone(),
        ))
    }

    /// Consume `second` if it follows, choosing between two token types
    fn one_or_two(&mut self, second: char, double: TokenType, single: TokenType) -> TokenType {
        self.advance();
        if self.current_char() == Some(second) {
            self.advance();
            double
        } else {
            single
        }
    }

    /// Get next token
    pub fn next_token(&mut self) -> Result<Token, CompilerError> {
        self.skip_trivia();

        let start = self.current_location();

        let token_type = match self.current_char() {
            None => TokenType::EndOfFile,

            Some(ch) if ch.is_alphabetic() || ch == '_' => self.tokenize_word(),
            Some(ch) if ch.is_ascii_digit() => self.tokenize_number(),
            Some('"') => self.tokenize_string(&start)?,

            Some('=') => self.one_or_two('=', TokenType::EqualEqual, TokenType::Equal),
            Some('!') => self.one_or_two('=', TokenType::BangEqual, TokenType::Bang),
            Some('<') => {
                self.advance();
                match self.current_char() {
                    Some('<') => {
                        self.advance();
                        TokenType::LeftShift
                    }
                    Some('=') => {
                        self.advance();
                        TokenType::LessEqual
                    }
                    _ => TokenType::Less,
                }
            }
            Some('>') => {
                self.advance();
                match self.current_char() {
                    Some('>') => {
                        self.advance();
                        TokenType::RightShift
                    }
                    Some('=') => {
                        self.advance();
                        TokenType::GreaterEqual
                    }
                    _ => TokenType::Greater,
                }
            }
            Some('&') if self.peek_char(1) == Some('&') => {
                self.advance();
                self.advance();
                TokenType::AmpersandAmpersand
            }
            Some('|') if self.peek_char(1) == Some('|') => {
                self.advance();
                self.advance();
                TokenType::PipePipe
            }
            Some('.') if self.peek_char(1) == Some('.') && self.peek_char(2) == Some('.') => {
                self.advance();
                self.advance();
                self.advance();
                TokenType::Ellipsis
            }

            Some('+') => { self.advance(); TokenType::Plus }
            Some('-') => { self.advance(); TokenType::Minus }
            Some('*') => { self.advance(); TokenType::Star }
            Some('/') => { self.advance(); TokenType::Slash }
            Some('(') => { self.advance(); TokenType::LeftParen }
            Some(')') => { self.advance(); TokenType::RightParen }
            Some('{') => { self.advance(); TokenType::LeftBrace }
            Some('}') => { self.advance(); TokenType::RightBrace }
            Some(';') => { self.advance(); TokenType::Semicolon }
            Some(':') => { self.advance(); TokenType::Colon }
            Some(',') => { self.advance(); TokenType::Comma }

            Some(ch) => {
                return Err(CompilerError::lexer_error(
                    format!("Unexpected character: {}", ch),
                    start,
                ));
            }
        };

        Ok(Token::new(token_type, start))
    }

    /// Tokenize entire input into a vector of tokens ending with `EndOfFile`
    pub fn tokenize(&mut self) -> Result<Vec<Token>, CompilerError> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.token_type, TokenType::EndOfFile);
            tokens.push(token);

            if is_eof {
                break;
            }
        }

        log::trace!("lexed {} tokens from {}", tokens.len(), self.filename);
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn token_types(input: &str) -> Vec<TokenType> {
        Lexer::new(input, "test.il")
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.token_type)
            .collect()
    }

    #[test]
    fn test_keywords() {
        let tokens = token_types("let if else return extrn while break");
        assert_eq!(
            tokens,
            vec![
                TokenType::Let,
                TokenType::If,
                TokenType::Else,
                TokenType::Return,
                TokenType::Extrn,
                TokenType::While,
                TokenType::Break,
                TokenType::EndOfFile,
            ]
        );
    }

    #[test]
    fn test_operators() {
        let tokens = token_types("= + - ! * / == != < > <= >= << >> && ||");
        assert_eq!(
            tokens,
            vec![
                TokenType::Equal,
                TokenType::Plus,
                TokenType::Minus,
                TokenType::Bang,
                TokenType::Star,
                TokenType::Slash,
                TokenType::EqualEqual,
                TokenType::BangEqual,
                TokenType::Less,
                TokenType::Greater,
                TokenType::LessEqual,
                TokenType::GreaterEqual,
                TokenType::LeftShift,
                TokenType::RightShift,
                TokenType::AmpersandAmpersand,
                TokenType::PipePipe,
                TokenType::EndOfFile,
            ]
        );
    }

    #[test]
    fn test_literals_keep_raw_text() {
        let tokens = token_types(r#"42 3.25 "hi\n" true false unit"#);
        assert_eq!(
            tokens,
            vec![
                TokenType::Literal("42".to_string()),
                TokenType::Literal("3.25".to_string()),
                TokenType::Literal(r#""hi\n""#.to_string()),
                TokenType::Literal("true".to_string()),
                TokenType::Literal("false".to_string()),
                TokenType::Literal("unit".to_string()),
                TokenType::EndOfFile,
            ]
        );
    }

    #[test]
    fn test_escaped_quote_does_not_end_string() {
        let tokens = token_types(r#""say \"hi\"""#);
        assert_eq!(tokens[0], TokenType::Literal(r#""say \"hi\"""#.to_string()));
    }

    #[test]
    fn test_positions_are_one_based() {
        let tokens = Lexer::new("int main()\n  x", "main.il").tokenize().unwrap();
        assert_eq!(tokens[0].location.to_string(), "main.il:1:1");
        assert_eq!(tokens[1].location.to_string(), "main.il:1:5");
        assert_eq!(tokens[4].location.to_string(), "main.il:2:3");
    }

    #[test]
    fn test_comments_are_skipped() {
        let tokens = token_types("a // comment ; ;\nb");
        assert_eq!(
            tokens,
            vec![
                TokenType::Identifier("a".to_string()),
                TokenType::Identifier("b".to_string()),
                TokenType::EndOfFile,
            ]
        );
    }

    #[test]
    fn test_ellipsis_and_punctuators() {
        let tokens = token_types("(string f, ...) {};:");
        assert_eq!(tokens[3], TokenType::Comma);
        assert_eq!(tokens[4], TokenType::Ellipsis);
        assert_eq!(tokens[8], TokenType::Semicolon);
        assert_eq!(tokens[9], TokenType::Colon);
    }

    #[test]
    fn test_unterminated_string() {
        let err = Lexer::new("\"abc", "test.il").tokenize().unwrap_err();
        assert!(matches!(err, CompilerError::LexError { ref location, .. } if location.column == 1));
    }

    #[test]
    fn test_unexpected_character() {
        let err = Lexer::new("a & b", "test.il").tokenize().unwrap_err();
        assert_eq!(err.to_string(), "Lexical error at test.il:1:3: Unexpected character: &");
    }
}
