//! Tokenizer: converts expression text into a stream of tokens.
//!
//! Supports numbers (`2`, `0.5`, `.5`, `1.5e-3`), identifiers, the operators
//! `+ - * / ^` (with `**` read as `^`) and parentheses.

use std::fmt;

use crate::error::{ExprError, ExprResult};

/// Longest accepted token stream, `Eof` excluded.
pub const MAX_TOKENS: usize = 512;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "number {}", n),
            Token::Ident(name) => write!(f, "identifier '{}'", name),
            Token::Plus => write!(f, "'+'"),
            Token::Minus => write!(f, "'-'"),
            Token::Star => write!(f, "'*'"),
            Token::Slash => write!(f, "'/'"),
            Token::Caret => write!(f, "'^'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::Eof => write!(f, "end of input"),
        }
    }
}

/// Token plus the character offset it started at.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub pos: usize,
}

pub struct Tokenizer {
    chars: Vec<char>,
    pos: usize,
}

impl Tokenizer {
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    /// Tokenize the whole input. The last token is always `Eof`.
    pub fn tokenize(mut self) -> ExprResult<Vec<Spanned>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            let start = self.pos;
            let Some(ch) = self.peek() else {
                tokens.push(Spanned {
                    token: Token::Eof,
                    pos: start,
                });
                return Ok(tokens);
            };

            let token = match ch {
                '+' => self.single(Token::Plus),
                '-' => self.single(Token::Minus),
                '/' => self.single(Token::Slash),
                '^' => self.single(Token::Caret),
                '(' => self.single(Token::LParen),
                ')' => self.single(Token::RParen),
                '*' => {
                    self.pos += 1;
                    if self.peek() == Some('*') {
                        self.pos += 1;
                        Token::Caret
                    } else {
                        Token::Star
                    }
                }
                c if c.is_ascii_digit() || c == '.' => self.read_number()?,
                c if c.is_ascii_alphabetic() || c == '_' => self.read_ident(),
                ',' => return Err(ExprError::CommaNotAllowed),
                _ => return Err(ExprError::UnexpectedChar { ch, pos: start }),
            };
            if tokens.len() == MAX_TOKENS {
                return Err(ExprError::TooLong { max: MAX_TOKENS });
            }
            tokens.push(Spanned { token, pos: start });
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn single(&mut self, token: Token) -> Token {
        self.pos += 1;
        token
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn eat_digits(&mut self) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn read_number(&mut self) -> ExprResult<Token> {
        let start = self.pos;
        let mut digits = self.eat_digits();
        if self.peek() == Some('.') {
            self.pos += 1;
            digits += self.eat_digits();
        }
        // Exponent only if a digit follows, so `2e` stays an error below.
        if matches!(self.peek(), Some('e' | 'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some('+' | '-')) {
                self.pos += 1;
            }
            if self.eat_digits() == 0 {
                return Err(self.invalid_number(start));
            }
        }
        if digits == 0 {
            return Err(self.invalid_number(start));
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Token::Number(value)),
            _ => Err(ExprError::InvalidNumber { text, pos: start }),
        }
    }

    fn invalid_number(&self, start: usize) -> ExprError {
        ExprError::InvalidNumber {
            text: self.chars[start..self.pos].iter().collect(),
            pos: start,
        }
    }

    fn read_ident(&mut self) -> Token {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.pos += 1;
        }
        Token::Ident(self.chars[start..self.pos].iter().collect())
    }
}

pub fn tokenize(input: &str) -> ExprResult<Vec<Spanned>> {
    Tokenizer::new(input).tokenize()
}
