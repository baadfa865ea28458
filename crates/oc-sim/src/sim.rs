//! Grid generation, the shared stepping routine and trajectory output.

use serde::{Deserialize, Serialize};

use crate::error::{IntegrationError, SimResult};
use crate::integrator::{Euler, EulerCauchy, StepRule};
use crate::model::Slope;

/// Integration method selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Explicit Euler (1st order, 1 slope evaluation per step).
    Euler,
    /// Euler-Cauchy / Heun (2nd order, 2 slope evaluations per step).
    EulerCauchy,
}

impl Method {
    pub const ALL: [Method; 2] = [Method::Euler, Method::EulerCauchy];

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Euler => "euler",
            Method::EulerCauchy => "euler_cauchy",
        }
    }

    /// Human-readable name for tables and legends.
    pub fn label(self) -> &'static str {
        match self {
            Method::Euler => "Euler",
            Method::EulerCauchy => "Euler-Cauchy",
        }
    }
}

/// Options for integration runs.
#[derive(Clone, Debug)]
pub struct IntegrateOptions {
    /// Maximum number of samples (safety limit on memory)
    pub max_samples: usize,
}

impl Default for IntegrateOptions {
    fn default() -> Self {
        Self {
            max_samples: 1_000_000,
        }
    }
}

/// Ordered `(x, y)` samples produced by one method.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub method: Method,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    pub fn last(&self) -> Option<(f64, f64)> {
        Some((*self.x.last()?, *self.y.last()?))
    }
}

/// Number of grid samples for `[x0, b]` with step `h`:
/// `ceil((b - x0) / h) + 1`.
///
/// The last sample may overshoot `b` when the interval is not a whole number
/// of steps.
pub fn sample_count(x0: f64, h: f64, b: f64) -> SimResult<usize> {
    oc_core::ensure_finite(x0, "x0 must be finite")?;
    oc_core::ensure_finite(b, "b must be finite")?;
    oc_core::ensure_positive(h, "h must be positive")?;
    if b <= x0 {
        return Err(IntegrationError::InvalidArg {
            what: "b must exceed x0",
        });
    }

    // At least one step even if the quotient underflows.
    let steps = ((b - x0) / h).ceil().max(1.0);
    if !steps.is_finite() || steps >= usize::MAX as f64 {
        return Err(IntegrationError::TooManySamples {
            samples: usize::MAX,
            max_samples: usize::MAX,
        });
    }
    Ok(steps as usize + 1)
}

/// Integrate with default options.
pub fn integrate<S: Slope + ?Sized>(
    method: Method,
    f: &S,
    x0: f64,
    y0: f64,
    h: f64,
    b: f64,
) -> SimResult<Trajectory> {
    integrate_with_options(method, f, x0, y0, h, b, &IntegrateOptions::default())
}

/// Integrate `y' = f(x, y)`, `y(x0) = y0` over `[x0, b]` with step `h`.
pub fn integrate_with_options<S: Slope + ?Sized>(
    method: Method,
    f: &S,
    x0: f64,
    y0: f64,
    h: f64,
    b: f64,
    opts: &IntegrateOptions,
) -> SimResult<Trajectory> {
    let samples = sample_count(x0, h, b)?;
    if samples > opts.max_samples {
        return Err(IntegrationError::TooManySamples {
            samples,
            max_samples: opts.max_samples,
        });
    }
    oc_core::ensure_finite(y0, "y0 must be finite")?;

    let (x, y) = match method {
        Method::Euler => march(&Euler, f, x0, y0, h, samples)?,
        Method::EulerCauchy => march(&EulerCauchy, f, x0, y0, h, samples)?,
    };

    Ok(Trajectory { method, x, y })
}

/// Explicit Euler over `[x0, b]`.
pub fn euler<S: Slope + ?Sized>(f: &S, x0: f64, y0: f64, h: f64, b: f64) -> SimResult<Trajectory> {
    integrate(Method::Euler, f, x0, y0, h, b)
}

/// Euler-Cauchy (Heun) over `[x0, b]`.
pub fn euler_cauchy<S: Slope + ?Sized>(
    f: &S,
    x0: f64,
    y0: f64,
    h: f64,
    b: f64,
) -> SimResult<Trajectory> {
    integrate(Method::EulerCauchy, f, x0, y0, h, b)
}

/// Shared stepping loop: grid `x[i] = x0 + i*h`, then one rule step per
/// sample. Aborts on the first failing sample.
fn march<R: StepRule, S: Slope + ?Sized>(
    rule: &R,
    f: &S,
    x0: f64,
    y0: f64,
    h: f64,
    samples: usize,
) -> SimResult<(Vec<f64>, Vec<f64>)> {
    let mut x = Vec::with_capacity(samples);
    x.push(x0);
    for i in 1..samples {
        // Computed from the index, not by accumulation, so rounding does not drift.
        x.push(x0 + i as f64 * h);
    }
    if x.last().is_some_and(|v| !v.is_finite()) {
        return Err(IntegrationError::InvalidArg {
            what: "grid exceeds floating-point range",
        });
    }

    let mut y = Vec::with_capacity(samples);
    y.push(y0);
    for i in 1..samples {
        let (x_prev, y_prev) = (x[i - 1], y[i - 1]);
        let y_next = rule
            .step(f, x_prev, x[i], y_prev, h)
            .map_err(|source| IntegrationError::Evaluation {
                at_step: i,
                x: x_prev,
                y: y_prev,
                source,
            })?;
        if !y_next.is_finite() {
            return Err(IntegrationError::NonFinite {
                at_step: i,
                value: y_next,
            });
        }
        y.push(y_next);
    }

    Ok((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FnSlope;

    #[test]
    fn integrate_options_defaults() {
        let opts = IntegrateOptions::default();
        assert_eq!(opts.max_samples, 1_000_000);
    }

    #[test]
    fn sample_count_ceiling_rule() {
        assert_eq!(sample_count(0.0, 0.5, 1.0).unwrap(), 3);
        assert_eq!(sample_count(0.0, 0.1, 1.0).unwrap(), 11);
        // 1 / 0.3 = 3.33.. -> 4 steps, last sample 1.2 overshoots b.
        assert_eq!(sample_count(0.0, 0.3, 1.0).unwrap(), 5);
        // Step larger than the interval: a single step.
        assert_eq!(sample_count(0.0, 10.0, 1.0).unwrap(), 2);
    }

    #[test]
    fn sample_count_rejects_bad_parameters() {
        assert_eq!(
            sample_count(0.0, 0.0, 1.0),
            Err(IntegrationError::InvalidArg {
                what: "h must be positive"
            })
        );
        assert!(sample_count(0.0, -1.0, 1.0).is_err());
        assert_eq!(
            sample_count(1.0, 0.1, 1.0),
            Err(IntegrationError::InvalidArg {
                what: "b must exceed x0"
            })
        );
        assert!(sample_count(2.0, 0.1, 1.0).is_err());
        assert!(sample_count(f64::NAN, 0.1, 1.0).is_err());
        assert!(sample_count(0.0, f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn overshooting_grid_is_kept() {
        let f = FnSlope(|_x: f64, _y: f64| 1.0);
        let traj = integrate(Method::Euler, &f, 0.0, 0.0, 0.3, 1.0).unwrap();
        assert_eq!(traj.len(), 5);
        assert!(traj.x[4] > 1.0);
        assert_eq!(traj.x[4], 4.0 * 0.3);
    }

    #[test]
    fn too_many_samples_is_rejected_before_allocating() {
        let f = FnSlope(|_x: f64, y: f64| y);
        let opts = IntegrateOptions { max_samples: 10 };
        let err = integrate_with_options(Method::Euler, &f, 0.0, 1.0, 0.1, 1.0, &opts).unwrap_err();
        assert_eq!(
            err,
            IntegrationError::TooManySamples {
                samples: 11,
                max_samples: 10
            }
        );
    }

    #[test]
    fn overflow_in_y_is_reported() {
        let f = FnSlope(|_x: f64, y: f64| y * 1e200);
        let err = integrate(Method::Euler, &f, 0.0, 1e200, 1.0, 5.0).unwrap_err();
        assert!(err.at_step().is_some());
    }

    #[test]
    fn trajectory_helpers() {
        let traj = Trajectory {
            method: Method::Euler,
            x: vec![0.0, 0.5],
            y: vec![1.0, 2.0],
        };
        assert_eq!(traj.points().collect::<Vec<_>>(), vec![(0.0, 1.0), (0.5, 2.0)]);
        assert_eq!(traj.last(), Some((0.5, 2.0)));
        assert!(!traj.is_empty());
    }

    #[test]
    fn method_names() {
        assert_eq!(Method::EulerCauchy.as_str(), "euler_cauchy");
        assert_eq!(Method::EulerCauchy.label(), "Euler-Cauchy");
        assert_eq!(
            serde_json::to_string(&Method::EulerCauchy).unwrap(),
            "\"euler_cauchy\""
        );
    }
}
