//! Compilation of parsed expressions into callables over `(x, y)`.

use std::fmt;

use crate::ast::{Expr, UnaryOp, Var, VarSet};
use crate::error::{EvalResult, ExprError, ExprResult};
use crate::parser::parse;

type EvalFn = Box<dyn Fn(f64, f64) -> EvalResult<f64> + Send + Sync>;

/// A parsed expression lowered into a closure tree.
///
/// Text is parsed exactly once; `eval` only walks pre-built closures, so one
/// value can be reused for every step of an integration.
pub struct CompiledExpression {
    source: String,
    variables: VarSet,
    eval: EvalFn,
}

impl CompiledExpression {
    /// Evaluate at one point. Domain errors and non-finite results are
    /// reported, never substituted.
    #[inline]
    pub fn eval(&self, x: f64, y: f64) -> EvalResult<f64> {
        (self.eval)(x, y)
    }

    /// The exact text this expression was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn variables(&self) -> VarSet {
        self.variables
    }
}

impl fmt::Debug for CompiledExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledExpression")
            .field("source", &self.source)
            .field("variables", &self.variables)
            .finish_non_exhaustive()
    }
}

/// Compile expression text into a [`CompiledExpression`].
///
/// Rejects commas before parsing, malformed text, names other than the known
/// functions/constants and `x`/`y`, and expressions mentioning neither
/// variable.
pub fn compile(text: &str) -> ExprResult<CompiledExpression> {
    if text.contains(',') {
        return Err(ExprError::CommaNotAllowed);
    }
    if text.trim().is_empty() {
        return Err(ExprError::Empty);
    }

    let ast = parse(text)?;
    let variables = ast.variables();
    if variables.is_empty() {
        return Err(ExprError::NoVariables);
    }

    Ok(CompiledExpression {
        source: text.to_string(),
        variables,
        eval: lower(ast),
    })
}

fn lower(expr: Expr) -> EvalFn {
    match expr {
        Expr::Number(n) => Box::new(move |_, _| Ok(n)),
        Expr::Var(Var::X) => Box::new(|x, _| Ok(x)),
        Expr::Var(Var::Y) => Box::new(|_, y| Ok(y)),
        Expr::Unary {
            op: UnaryOp::Neg,
            arg,
        } => {
            let arg = lower(*arg);
            Box::new(move |x, y| Ok(-arg(x, y)?))
        }
        Expr::Binary { op, lhs, rhs } => {
            let lhs = lower(*lhs);
            let rhs = lower(*rhs);
            Box::new(move |x, y| {
                let l = lhs(x, y)?;
                let r = rhs(x, y)?;
                op.apply(l, r)
            })
        }
        Expr::Call { func, arg } => {
            let arg = lower(*arg);
            Box::new(move |x, y| func.apply(arg(x, y)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalError;

    #[test]
    fn evaluates_arithmetic() {
        let f = compile("x*y + 2^x - y/4").unwrap();
        assert_eq!(f.eval(3.0, 4.0).unwrap(), 12.0 + 8.0 - 1.0);
    }

    #[test]
    fn evaluates_functions() {
        let f = compile("sin(x) * y").unwrap();
        assert_eq!(f.eval(0.0, 5.0).unwrap(), 0.0);
        let g = compile("exp(x) + log(y) + sqrt(abs(x*y))").unwrap();
        let v = g.eval(0.0, 1.0).unwrap();
        assert!((v - 1.0).abs() < 1e-15);
    }

    #[test]
    fn sympy_style_power_and_constants() {
        let f = compile("x**2 + 0*y + E").unwrap();
        assert!((f.eval(3.0, 0.0).unwrap() - (9.0 + std::f64::consts::E)).abs() < 1e-12);
        let g = compile("cos(pi*x)*y").unwrap();
        assert!((g.eval(1.0, 2.0).unwrap() + 2.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_comma_before_parsing() {
        assert_eq!(compile("x,y").unwrap_err(), ExprError::CommaNotAllowed);
        assert_eq!(compile("1,5*x").unwrap_err(), ExprError::CommaNotAllowed);
        // Two-argument calls are unreachable through the comma rule.
        assert_eq!(compile("pow(x, 2)").unwrap_err(), ExprError::CommaNotAllowed);
    }

    #[test]
    fn rejects_constant_expressions() {
        assert_eq!(compile("1").unwrap_err(), ExprError::NoVariables);
        assert_eq!(compile("sin(pi)").unwrap_err(), ExprError::NoVariables);
        assert_eq!(compile("   ").unwrap_err(), ExprError::Empty);
    }

    #[test]
    fn one_variable_compiles() {
        let f = compile("y").unwrap();
        assert!(f.variables().y);
        assert!(!f.variables().x);
        assert_eq!(f.eval(10.0, 2.5).unwrap(), 2.5);
    }

    #[test]
    fn domain_errors_surface_at_eval() {
        let f = compile("log(y - 5)").unwrap();
        assert!(f.eval(0.0, 6.0).is_ok());
        assert!(matches!(
            f.eval(0.0, 5.0),
            Err(EvalError::Domain { func: "log", .. })
        ));
        let g = compile("x / y").unwrap();
        assert_eq!(g.eval(1.0, 0.0), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn keeps_source_text() {
        let f = compile("x + y").unwrap();
        assert_eq!(f.source(), "x + y");
        assert!(format!("{f:?}").contains("x + y"));
    }
}
