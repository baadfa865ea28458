//! Pratt parser: converts a token stream into an AST.
//!
//! Grammar (informal):
//!   expr   = prefix (BINOP prefix)*     (precedence climbing)
//!   prefix = ('-' | '+') prefix | atom
//!   atom   = NUMBER | VAR | CONST | FUNC '(' expr ')' | '(' expr ')'
//!
//! Unary minus binds looser than `^`, so `-x^2` is `-(x^2)`.

use crate::ast::{self, BinOp, Expr, Func, UnaryOp, Var};
use crate::error::{ExprError, ExprResult};
use crate::token::{Spanned, Token, tokenize};

/// Operand binding power for unary signs: only `^` binds tighter.
const UNARY_BP: u8 = 3;

/// Deepest accepted nesting of parentheses, signs, calls and `^` chains.
pub const MAX_DEPTH: usize = 64;

pub struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Spanned>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    pub fn parse(mut self) -> ExprResult<Expr> {
        let expr = self.parse_expr(0)?;
        if self.peek() != &Token::Eof {
            return Err(self.unexpected("an operator or end of input"));
        }
        Ok(expr)
    }

    fn parse_expr(&mut self, min_bp: u8) -> ExprResult<Expr> {
        if self.depth == MAX_DEPTH {
            return Err(ExprError::TooDeep { max: MAX_DEPTH });
        }
        self.depth += 1;
        let expr = self.parse_binary(min_bp);
        self.depth -= 1;
        expr
    }

    fn parse_binary(&mut self, min_bp: u8) -> ExprResult<Expr> {
        let mut lhs = self.parse_prefix()?;

        loop {
            let op = match self.peek() {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                Token::Star => BinOp::Mul,
                Token::Slash => BinOp::Div,
                Token::Caret => BinOp::Pow,
                _ => break,
            };

            let prec = op.precedence();
            if prec < min_bp {
                break;
            }
            self.advance();

            let next_bp = if op.is_right_assoc() { prec } else { prec + 1 };
            let rhs = self.parse_expr(next_bp)?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> ExprResult<Expr> {
        match self.peek() {
            Token::Minus => {
                self.advance();
                let arg = self.parse_expr(UNARY_BP)?;
                Ok(Expr::Unary {
                    op: UnaryOp::Neg,
                    arg: Box::new(arg),
                })
            }
            Token::Plus => {
                self.advance();
                self.parse_expr(UNARY_BP)
            }
            _ => self.parse_atom(),
        }
    }

    fn parse_atom(&mut self) -> ExprResult<Expr> {
        match self.peek().clone() {
            Token::Number(n) => {
                self.advance();
                Ok(Expr::Number(n))
            }
            Token::Ident(name) => {
                self.advance();
                self.parse_ident(name)
            }
            Token::LParen => {
                self.advance();
                let expr = self.parse_expr(0)?;
                self.expect_rparen()?;
                Ok(expr)
            }
            _ => Err(self.unexpected("a number, variable, function or '('")),
        }
    }

    fn parse_ident(&mut self, name: String) -> ExprResult<Expr> {
        if let Some(func) = Func::from_name(&name) {
            if self.peek() != &Token::LParen {
                return Err(ExprError::MissingCall { name });
            }
            self.advance();
            let arg = self.parse_expr(0)?;
            self.expect_rparen()?;
            return Ok(Expr::Call {
                func,
                arg: Box::new(arg),
            });
        }
        if let Some(value) = ast::constant(&name) {
            return Ok(Expr::Number(value));
        }
        if let Some(var) = Var::from_name(&name) {
            return Ok(Expr::Var(var));
        }
        if self.peek() == &Token::LParen {
            Err(ExprError::UnknownFunction { name })
        } else {
            Err(ExprError::UnknownVariable { name })
        }
    }

    fn peek(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .map(|s| &s.token)
            .unwrap_or(&Token::Eof)
    }

    fn peek_pos(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|s| s.pos)
            .unwrap_or(0)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn expect_rparen(&mut self) -> ExprResult<()> {
        if self.peek() == &Token::RParen {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected("')'"))
        }
    }

    fn unexpected(&self, expected: &'static str) -> ExprError {
        ExprError::UnexpectedToken {
            found: self.peek().to_string(),
            expected,
            pos: self.peek_pos(),
        }
    }
}

/// Tokenize and parse `input` into an AST.
pub fn parse(input: &str) -> ExprResult<Expr> {
    Parser::new(tokenize(input)?).parse()
}
