//! SQL Lexer (Tokenizer)
//!
//! This module converts statement text into a stream of tokens.

use super::token::Token;
use crate::error::{Error, Result};

/// Context reported for errors raised before the statement shape is known
const LEXER_CONTEXT: &str = "statement";

/// SQL Lexer
pub struct Lexer {
    /// Input characters
    input: Vec<char>,
    /// Current position in input
    position: usize,
}

impl Lexer {
    /// Create a new lexer for the given input
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            if token == Token::Eof {
                tokens.push(token);
                break;
            }
            tokens.push(token);
        }

        Ok(tokens)
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        if self.is_at_end() {
            return Ok(Token::Eof);
        }

        let ch = self.current_char();

        match ch {
            '(' => {
                self.advance();
                Ok(Token::LParen)
            }
            ')' => {
                self.advance();
                Ok(Token::RParen)
            }
            ',' => {
                self.advance();
                Ok(Token::Comma)
            }
            ';' => {
                self.advance();
                Ok(Token::Semicolon)
            }
            '*' => {
                self.advance();
                Ok(Token::Asterisk)
            }
            '=' => {
                self.advance();
                Ok(Token::Eq)
            }
            '<' => {
                self.advance();
                match self.peek_current() {
                    Some('=') => {
                        self.advance();
                        Ok(Token::Lte)
                    }
                    Some('>') => {
                        self.advance();
                        Ok(Token::Neq)
                    }
                    _ => Ok(Token::Lt),
                }
            }
            '>' => {
                self.advance();
                if self.peek_current() == Some('=') {
                    self.advance();
                    return Ok(Token::Gte);
                }
                Ok(Token::Gt)
            }
            '!' => {
                self.advance();
                if self.peek_current() == Some('=') {
                    self.advance();
                    return Ok(Token::Neq);
                }
                Err(self.unexpected('!', self.position - 1))
            }
            '-' => {
                // Only a sign when directly followed by a digit
                if self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                    return self.read_number();
                }
                Err(self.unexpected('-', self.position))
            }
            '\'' => self.read_string(),
            c if c.is_ascii_digit() => self.read_number(),
            c if c.is_ascii_alphabetic() || c == '_' => Ok(self.read_identifier()),
            c => Err(self.unexpected(c, self.position)),
        }
    }

    /// Check if we've reached the end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Get the current character
    fn current_char(&self) -> char {
        self.input[self.position]
    }

    /// Get the current character, if any
    fn peek_current(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek at the next character
    fn peek_char(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    /// Advance to the next character
    fn advance(&mut self) {
        self.position += 1;
    }

    /// Skip whitespace characters
    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    fn unexpected(&self, ch: char, position: usize) -> Error {
        Error::syntax(
            LEXER_CONTEXT,
            format!("unexpected character '{}' at position {}", ch, position),
        )
    }

    /// Read a string literal (single-quoted)
    fn read_string(&mut self) -> Result<Token> {
        let start_pos = self.position;
        self.advance(); // skip opening quote

        let mut value = String::new();

        while !self.is_at_end() {
            let ch = self.current_char();

            if ch == '\'' {
                // Check for escaped quote ''
                if self.peek_char() == Some('\'') {
                    value.push('\'');
                    self.advance();
                    self.advance();
                } else {
                    self.advance(); // skip closing quote
                    return Ok(Token::StringLiteral(value));
                }
            } else {
                value.push(ch);
                self.advance();
            }
        }

        Err(Error::syntax(
            LEXER_CONTEXT,
            format!("unterminated string literal starting at position {}", start_pos),
        ))
    }

    /// Read a digit run, with an optional leading minus sign.
    ///
    /// The literal text is kept as written; column coercion decides
    /// whether it is an integer.
    fn read_number(&mut self) -> Result<Token> {
        let mut value = String::new();

        if self.current_char() == '-' {
            value.push('-');
            self.advance();
        }

        while !self.is_at_end() && self.current_char().is_ascii_digit() {
            value.push(self.current_char());
            self.advance();
        }

        // 12abc is neither a number nor an identifier
        if let Some(c) = self.peek_current() {
            if c.is_ascii_alphabetic() || c == '_' || c == '.' {
                return Err(self.unexpected(c, self.position));
            }
        }

        Ok(Token::NumberLiteral(value))
    }

    /// Read an identifier or keyword
    fn read_identifier(&mut self) -> Token {
        let mut value = String::new();

        while !self.is_at_end() {
            let ch = self.current_char();

            if ch.is_ascii_alphanumeric() || ch == '_' {
                value.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        // Check if it's a keyword
        Token::from_keyword(&value).unwrap_or(Token::Identifier(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_select() {
        let mut lexer = Lexer::new("SELECT * FROM users");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(
            tokens,
            vec![
                Token::Select,
                Token::Asterisk,
                Token::From,
                Token::Identifier("users".to_string()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_select_with_where() {
        let mut lexer = Lexer::new("select id, name from users where id = 1;");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(
            tokens,
            vec![
                Token::Select,
                Token::Identifier("id".to_string()),
                Token::Comma,
                Token::Identifier("name".to_string()),
                Token::From,
                Token::Identifier("users".to_string()),
                Token::Where,
                Token::Identifier("id".to_string()),
                Token::Eq,
                Token::NumberLiteral("1".to_string()),
                Token::Semicolon,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_type_names_are_identifiers() {
        let mut lexer = Lexer::new("CREATE TABLE users (id INT, name TEXT)");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens[0], Token::Create);
        assert_eq!(tokens[1], Token::Table);
        assert_eq!(tokens[2], Token::Identifier("users".to_string()));
        assert_eq!(tokens[3], Token::LParen);
        assert_eq!(tokens[5], Token::Identifier("INT".to_string()));
        assert_eq!(tokens[8], Token::Identifier("TEXT".to_string()));
    }

    #[test]
    fn test_string_literal() {
        let mut lexer = Lexer::new("VALUES ('hello world', 'it''s')");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens[2], Token::StringLiteral("hello world".to_string()));
        assert_eq!(tokens[4], Token::StringLiteral("it's".to_string()));
    }

    #[test]
    fn test_unterminated_string() {
        let mut lexer = Lexer::new("SELECT * FROM t WHERE name = 'Bob");
        let err = lexer.tokenize().unwrap_err();

        assert!(err.to_string().contains("unterminated string literal"));
    }

    #[test]
    fn test_negative_number() {
        let mut lexer = Lexer::new("age > -5");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens[2], Token::NumberLiteral("-5".to_string()));
    }

    #[test]
    fn test_number_keeps_literal_text() {
        let mut lexer = Lexer::new("VALUES (007, 99999999999999999999)");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens[2], Token::NumberLiteral("007".to_string()));
        assert_eq!(
            tokens[4],
            Token::NumberLiteral("99999999999999999999".to_string())
        );
    }

    #[test]
    fn test_comparison_operators() {
        let mut lexer = Lexer::new("a < b <= c > d >= e <> f != g = h");
        let tokens = lexer.tokenize().unwrap();

        assert!(tokens.contains(&Token::Lt));
        assert!(tokens.contains(&Token::Lte));
        assert!(tokens.contains(&Token::Gt));
        assert!(tokens.contains(&Token::Gte));
        assert!(tokens.contains(&Token::Eq));
        assert_eq!(tokens.iter().filter(|t| **t == Token::Neq).count(), 2);
    }

    #[test]
    fn test_rejects_unknown_characters() {
        assert!(Lexer::new("SELECT @ FROM t").tokenize().is_err());
        assert!(Lexer::new("SELECT 3.14").tokenize().is_err());
        assert!(Lexer::new("SELECT 12abc").tokenize().is_err());
    }
}
