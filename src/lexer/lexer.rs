use crate::error::CompileError;

use super::token::KEYWORDS;
use super::{Token, TokenKind};

/// One-pass scanner over the raw source text. Tracks 1-based line/column
/// positions; every token records the position of its first character.
#[derive(Debug)]
pub struct Lexer {
    chars: Vec<char>,
    index: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            index: 0,
            line: 1,
            column: 1,
            tokens: vec![],
        }
    }

    pub fn tokenize(source: &str) -> Result<Vec<Token>, CompileError> {
        let mut lexer = Lexer::new(source);
        lexer.scan()?;
        Ok(lexer.tokens)
    }

    fn is_eof(&self) -> bool {
        self.index >= self.chars.len()
    }

    fn current(&self) -> char {
        self.chars[self.index]
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.index + 1).copied()
    }

    fn bump(&mut self) {
        self.index += 1;
        self.column += 1;
    }

    fn push_token(&mut self, kind: TokenKind, text: String, column: usize) {
        self.tokens.push(Token {
            kind,
            text,
            line: self.line,
            column,
        });
    }

    /// Emits an operator or punctuation token of `len` characters.
    fn symbol(&mut self, kind: TokenKind, text: &str, len: usize) {
        let column = self.column;
        for _ in 0..len {
            self.bump();
        }
        self.push_token(kind, text.to_string(), column);
    }

    fn scan(&mut self) -> Result<(), CompileError> {
        while !self.is_eof() {
            let c = self.current();
            match c {
                ' ' | '\t' | '\r' => self.bump(),
                '\n' => {
                    self.push_token(TokenKind::Newline, "\\n".to_string(), self.column);
                    self.bump();
                    self.line += 1;
                    self.column = 1;
                }
                '/' if self.peek() == Some('/') => self.skip_comment(),
                '<' if self.peek() == Some('-') => self.symbol(TokenKind::Assign, "<-", 2),
                '<' if self.peek() == Some('=') => self.symbol(TokenKind::LessEqual, "<=", 2),
                '>' if self.peek() == Some('=') => self.symbol(TokenKind::GreaterEqual, ">=", 2),
                '=' if self.peek() == Some('=') => self.symbol(TokenKind::DoubleEqual, "==", 2),
                '!' if self.peek() == Some('=') => self.symbol(TokenKind::NotEqual, "!=", 2),
                '<' => self.symbol(TokenKind::LessThan, "<", 1),
                '>' => self.symbol(TokenKind::GreaterThan, ">", 1),
                '+' => self.symbol(TokenKind::Plus, "+", 1),
                '-' => self.symbol(TokenKind::Minus, "-", 1),
                '*' => self.symbol(TokenKind::Star, "*", 1),
                '/' => self.symbol(TokenKind::Slash, "/", 1),
                '%' => self.symbol(TokenKind::Percent, "%", 1),
                '(' => self.symbol(TokenKind::OpenParen, "(", 1),
                ')' => self.symbol(TokenKind::CloseParen, ")", 1),
                '[' => self.symbol(TokenKind::OpenSquareBrace, "[", 1),
                ']' => self.symbol(TokenKind::CloseSquareBrace, "]", 1),
                ':' => self.symbol(TokenKind::Colon, ":", 1),
                ',' => self.symbol(TokenKind::Comma, ",", 1),
                '"' => self.read_string()?,
                c if c.is_ascii_digit() => self.read_number()?,
                c if c.is_alphabetic() || c == '_' => self.read_word(),
                c => {
                    return Err(CompileError::Lexical {
                        message: format!("unrecognized character '{}'", c),
                        line: self.line,
                        column: self.column,
                    })
                }
            }
        }

        self.push_token(TokenKind::Eof, String::new(), self.column);
        Ok(())
    }

    fn skip_comment(&mut self) {
        while !self.is_eof() && self.current() != '\n' {
            self.bump();
        }
    }

    fn read_string(&mut self) -> Result<(), CompileError> {
        let line = self.line;
        let column = self.column;
        self.bump();

        let mut s = String::new();
        while !self.is_eof() && self.current() != '"' {
            if self.current() == '\n' {
                return Err(CompileError::Lexical {
                    message: "unterminated string".to_string(),
                    line,
                    column,
                });
            }
            s.push(self.current());
            self.bump();
        }

        if self.is_eof() {
            return Err(CompileError::Lexical {
                message: "unterminated string".to_string(),
                line,
                column,
            });
        }

        self.bump();
        self.tokens.push(Token {
            kind: TokenKind::Str(s.clone()),
            text: s,
            line,
            column,
        });
        Ok(())
    }

    fn read_number(&mut self) -> Result<(), CompileError> {
        let column = self.column;
        let mut s = String::new();

        while !self.is_eof() && self.current().is_ascii_digit() {
            s.push(self.current());
            self.bump();
        }

        let is_real = !self.is_eof()
            && self.current() == '.'
            && self.peek().is_some_and(|c| c.is_ascii_digit());
        if is_real {
            s.push('.');
            self.bump();
            while !self.is_eof() && self.current().is_ascii_digit() {
                s.push(self.current());
                self.bump();
            }
            let value: f64 = s.parse().map_err(|_| CompileError::Lexical {
                message: format!("invalid real literal '{}'", s),
                line: self.line,
                column,
            })?;
            self.push_token(TokenKind::Real(value), s, column);
        } else {
            let value: i64 = s.parse().map_err(|_| CompileError::Lexical {
                message: format!("integer literal '{}' is too large", s),
                line: self.line,
                column,
            })?;
            self.push_token(TokenKind::Num(value), s, column);
        }
        Ok(())
    }

    fn read_word(&mut self) {
        let column = self.column;
        let mut word = String::new();

        while !self.is_eof() && (self.current().is_alphanumeric() || self.current() == '_') {
            word.push(self.current());
            self.bump();
        }

        let upper = word.to_uppercase();
        match KEYWORDS.get(upper.as_str()) {
            // Only a bare upper-case `A` is the POUR range keyword; any
            // other casing stays an identifier.
            Some(kind) if *kind != TokenKind::A || word == "A" => {
                self.push_token(kind.clone(), upper, column);
            }
            _ => self.push_token(TokenKind::Ident(word.clone()), word, column),
        }
    }
}
