//! Property tests: grid shape and bit-for-bit reproducibility.

use oc_expr::compile;
use oc_sim::{FnSlope, Method, integrate, sample_count};
use proptest::prelude::*;

proptest! {
    #[test]
    fn grid_has_ceiling_length(
        x0 in -100.0_f64..100.0,
        len in 0.01_f64..50.0,
        h in 0.005_f64..5.0,
        y0 in -10.0_f64..10.0,
    ) {
        let b = x0 + len;
        prop_assume!(b > x0);
        let f = FnSlope(|_x: f64, _y: f64| 0.0);
        let expected = ((b - x0) / h).ceil() as usize + 1;

        prop_assert_eq!(sample_count(x0, h, b).unwrap(), expected);
        for method in Method::ALL {
            let traj = integrate(method, &f, x0, y0, h, b).unwrap();
            prop_assert_eq!(traj.len(), expected);
            prop_assert_eq!(traj.y.len(), expected);
            prop_assert_eq!(traj.x[0], x0);
            prop_assert_eq!(traj.y[0], y0);
            for (i, &x) in traj.x.iter().enumerate() {
                prop_assert_eq!(x, x0 + i as f64 * h);
            }
        }
    }

    #[test]
    fn repeated_runs_are_bit_identical(
        y0 in -2.0_f64..2.0,
        h in 0.01_f64..0.5,
    ) {
        let f = compile("sin(x) - y/10").unwrap();
        for method in Method::ALL {
            let a = integrate(method, &f, 0.0, y0, h, 3.0).unwrap();
            let b = integrate(method, &f, 0.0, y0, h, 3.0).unwrap();
            let bits = |v: &[f64]| v.iter().map(|f| f.to_bits()).collect::<Vec<_>>();
            prop_assert_eq!(bits(&a.x), bits(&b.x));
            prop_assert_eq!(bits(&a.y), bits(&b.y));
        }
    }
}
