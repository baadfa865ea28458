//! Abstract syntax tree for right-hand side expressions.

use crate::error::{EvalError, EvalResult};

/// The two free variables an expression may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Var {
    X,
    Y,
}

impl Var {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "x" => Some(Var::X),
            "y" => Some(Var::Y),
            _ => None,
        }
    }
}

/// Which of `x` / `y` an expression mentions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VarSet {
    pub x: bool,
    pub y: bool,
}

impl VarSet {
    pub fn insert(&mut self, var: Var) {
        match var {
            Var::X => self.x = true,
            Var::Y => self.y = true,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.x && !self.y
    }

    pub fn has_both(&self) -> bool {
        self.x && self.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinOp {
    /// Binding power for Pratt parsing. Higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinOp::Add | BinOp::Sub => 1,
            BinOp::Mul | BinOp::Div => 2,
            BinOp::Pow => 4,
        }
    }

    /// `2^3^2` is `2^(3^2)`.
    pub fn is_right_assoc(self) -> bool {
        matches!(self, BinOp::Pow)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Pow => "^",
        }
    }

    pub fn apply(self, l: f64, r: f64) -> EvalResult<f64> {
        let value = match self {
            BinOp::Add => l + r,
            BinOp::Sub => l - r,
            BinOp::Mul => l * r,
            BinOp::Div => {
                if r == 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                l / r
            }
            BinOp::Pow => {
                if l == 0.0 && r < 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                l.powf(r)
            }
        };
        finite(value, self.symbol())
    }
}

/// Elementary functions of one argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Exp,
    Log,
    Sqrt,
    Abs,
}

impl Func {
    pub const ALL: [Func; 13] = [
        Func::Sin,
        Func::Cos,
        Func::Tan,
        Func::Asin,
        Func::Acos,
        Func::Atan,
        Func::Sinh,
        Func::Cosh,
        Func::Tanh,
        Func::Exp,
        Func::Log,
        Func::Sqrt,
        Func::Abs,
    ];

    /// `ln` is accepted as a spelling of the natural log.
    pub fn from_name(name: &str) -> Option<Self> {
        if name == "ln" {
            return Some(Func::Log);
        }
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
            Func::Asin => "asin",
            Func::Acos => "acos",
            Func::Atan => "atan",
            Func::Sinh => "sinh",
            Func::Cosh => "cosh",
            Func::Tanh => "tanh",
            Func::Exp => "exp",
            Func::Log => "log",
            Func::Sqrt => "sqrt",
            Func::Abs => "abs",
        }
    }

    pub fn apply(self, v: f64) -> EvalResult<f64> {
        let domain = |ok: bool| {
            if ok {
                Ok(())
            } else {
                Err(EvalError::Domain {
                    func: self.name(),
                    arg: v,
                })
            }
        };
        let value = match self {
            Func::Sin => v.sin(),
            Func::Cos => v.cos(),
            Func::Tan => v.tan(),
            Func::Asin => {
                domain((-1.0..=1.0).contains(&v))?;
                v.asin()
            }
            Func::Acos => {
                domain((-1.0..=1.0).contains(&v))?;
                v.acos()
            }
            Func::Atan => v.atan(),
            Func::Sinh => v.sinh(),
            Func::Cosh => v.cosh(),
            Func::Tanh => v.tanh(),
            Func::Exp => v.exp(),
            Func::Log => {
                domain(v > 0.0)?;
                v.ln()
            }
            Func::Sqrt => {
                domain(v >= 0.0)?;
                v.sqrt()
            }
            Func::Abs => v.abs(),
        };
        finite(value, self.name())
    }
}

fn finite(value: f64, what: &'static str) -> EvalResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::NonFinite { what, value })
    }
}

/// Named constants folded into literals by the parser.
pub fn constant(name: &str) -> Option<f64> {
    match name {
        "pi" => Some(std::f64::consts::PI),
        "E" => Some(std::f64::consts::E),
        _ => None,
    }
}

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Var(Var),
    Unary { op: UnaryOp, arg: Box<Expr> },
    Binary { op: BinOp, lhs: Box<Expr>, rhs: Box<Expr> },
    Call { func: Func, arg: Box<Expr> },
}

impl Expr {
    /// Collect the free variables referenced anywhere in the tree.
    pub fn variables(&self) -> VarSet {
        let mut vars = VarSet::default();
        self.collect_vars(&mut vars);
        vars
    }

    fn collect_vars(&self, vars: &mut VarSet) {
        match self {
            Expr::Number(_) => {}
            Expr::Var(v) => vars.insert(*v),
            Expr::Unary { arg, .. } | Expr::Call { arg, .. } => arg.collect_vars(vars),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_vars(vars);
                rhs.collect_vars(vars);
            }
        }
    }
}
