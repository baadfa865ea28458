//! Error types for parsing and evaluating expressions.

use thiserror::Error;

pub type ExprResult<T> = Result<T, ExprError>;
pub type EvalResult<T> = Result<T, EvalError>;

/// Rejection of an expression text at compile time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    #[error("Expression is empty")]
    Empty,

    #[error("Commas are not allowed in expressions (use '.' as the decimal separator)")]
    CommaNotAllowed,

    #[error("Unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("Invalid number literal '{text}' at position {pos}")]
    InvalidNumber { text: String, pos: usize },

    #[error("Unexpected {found} at position {pos}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
        pos: usize,
    },

    #[error("Unknown function '{name}'")]
    UnknownFunction { name: String },

    #[error("Function '{name}' must be called with one parenthesized argument")]
    MissingCall { name: String },

    #[error("Unknown variable '{name}' (only x and y are allowed)")]
    UnknownVariable { name: String },

    #[error("Expression does not reference x or y")]
    NoVariables,

    #[error("Expression has more than {max} tokens")]
    TooLong { max: usize },

    #[error("Expression nests deeper than {max} levels")]
    TooDeep { max: usize },
}

/// Failure while evaluating a compiled expression at one point.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Argument {arg} outside the domain of {func}")]
    Domain { func: &'static str, arg: f64 },

    #[error("Non-finite result from {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },
}
