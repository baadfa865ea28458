//! Slope trait for pluggable right-hand sides.

use oc_expr::{CompiledExpression, EvalError, EvalResult};

/// Right-hand side `f(x, y)` of `y' = f(x, y)`.
///
/// Implementations must be pure: the same `(x, y)` always gives the same
/// result, and a non-finite value is reported as an error.
pub trait Slope {
    fn slope(&self, x: f64, y: f64) -> EvalResult<f64>;
}

impl Slope for CompiledExpression {
    #[inline]
    fn slope(&self, x: f64, y: f64) -> EvalResult<f64> {
        self.eval(x, y)
    }
}

impl<S: Slope + ?Sized> Slope for &S {
    #[inline]
    fn slope(&self, x: f64, y: f64) -> EvalResult<f64> {
        (**self).slope(x, y)
    }
}

/// Adapter for plain closures; NaN/inf results become errors.
#[derive(Clone, Copy, Debug)]
pub struct FnSlope<F>(pub F);

impl<F> Slope for FnSlope<F>
where
    F: Fn(f64, f64) -> f64,
{
    fn slope(&self, x: f64, y: f64) -> EvalResult<f64> {
        let value = (self.0)(x, y);
        if value.is_finite() {
            Ok(value)
        } else {
            Err(EvalError::NonFinite {
                what: "slope",
                value,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_slope_checks_finiteness() {
        let ok = FnSlope(|x: f64, y: f64| x + y);
        assert_eq!(ok.slope(1.0, 2.0), Ok(3.0));

        let bad = FnSlope(|_x: f64, y: f64| 1.0 / y);
        assert!(matches!(
            bad.slope(0.0, 0.0),
            Err(EvalError::NonFinite { what: "slope", .. })
        ));
    }

    #[test]
    fn compiled_expression_is_a_slope() {
        let f = oc_expr::compile("x*y").unwrap();
        assert_eq!(f.slope(2.0, 3.0), Ok(6.0));
        assert_eq!((&f).slope(2.0, 3.0), Ok(6.0));
    }
}
