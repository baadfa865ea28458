//! oc-expr: expression compiler for right-hand sides `f(x, y)`.
//!
//! Provides:
//! - Tokenizer for arithmetic text (`+ - * / ^ **`, parentheses, literals)
//! - Pratt parser producing a small tagged AST
//! - Compilation of the AST into a closure tree evaluated at `(x, y)`
//!
//! # Example
//!
//! ```
//! use oc_expr::compile;
//!
//! let f = compile("x*y + sin(x)").unwrap();
//! assert_eq!(f.eval(0.0, 2.0).unwrap(), 0.0);
//! assert!(f.variables().has_both());
//! ```

pub mod ast;
pub mod compile;
pub mod error;
pub mod parser;
pub mod token;

pub use ast::{BinOp, Expr, Func, UnaryOp, Var, VarSet};
pub use compile::{CompiledExpression, compile};
pub use error::{EvalError, EvalResult, ExprError, ExprResult};
pub use parser::{MAX_DEPTH, parse};
pub use token::MAX_TOKENS;
