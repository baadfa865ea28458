//! Fixed-step update rules.

use oc_expr::EvalResult;

use crate::model::Slope;

/// One explicit step from sample `i-1` to sample `i`.
///
/// The grid is owned by the stepping routine; a rule only sees the two
/// abscissae it spans and the previous ordinate.
pub trait StepRule {
    /// Number of slope evaluations per step.
    const EVALS_PER_STEP: usize;

    fn step<S: Slope + ?Sized>(
        &self,
        f: &S,
        x_prev: f64,
        x_next: f64,
        y_prev: f64,
        h: f64,
    ) -> EvalResult<f64>;
}

/// Explicit Euler (1st order, one slope evaluation per step).
#[derive(Clone, Copy, Debug, Default)]
pub struct Euler;

impl StepRule for Euler {
    const EVALS_PER_STEP: usize = 1;

    fn step<S: Slope + ?Sized>(
        &self,
        f: &S,
        x_prev: f64,
        _x_next: f64,
        y_prev: f64,
        h: f64,
    ) -> EvalResult<f64> {
        let k = f.slope(x_prev, y_prev)?;
        Ok(y_prev + h * k)
    }
}

/// Euler-Cauchy / Heun predictor-corrector (2nd order, two evaluations).
#[derive(Clone, Copy, Debug, Default)]
pub struct EulerCauchy;

impl StepRule for EulerCauchy {
    const EVALS_PER_STEP: usize = 2;

    fn step<S: Slope + ?Sized>(
        &self,
        f: &S,
        x_prev: f64,
        x_next: f64,
        y_prev: f64,
        h: f64,
    ) -> EvalResult<f64> {
        // Predictor slope, then slope at the Euler-predicted point.
        let f1 = f.slope(x_prev, y_prev)?;
        let f2 = f.slope(x_next, y_prev + h * f1)?;

        // Combine: y_new = y + (h/2) * (f1 + f2)
        Ok(y_prev + (h / 2.0) * (f1 + f2))
    }
}
