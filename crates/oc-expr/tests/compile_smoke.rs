//! Integration test: compile user-style expressions end to end.

use oc_expr::{EvalError, ExprError, compile};
use proptest::prelude::*;

#[test]
fn accepts_typical_right_hand_sides() {
    for text in [
        "x + y",
        "sin(x) * y",
        "x*y",
        "y - x^2 + 1",
        "-2*x*y",
        "(x + 1) / (y*y + 1)",
        "exp(-x) * cos(y)",
        "ln(x + 2) + y",
        "tanh(x) - atan(y)",
        "1.5e-3 * x + .5 * y",
    ] {
        assert!(compile(text).is_ok(), "expected '{}' to compile", text);
    }
}

#[test]
fn rejects_malformed_or_disallowed_text() {
    let cases: [(&str, fn(&ExprError) -> bool); 8] = [
        ("x,y", |e| matches!(e, ExprError::CommaNotAllowed)),
        ("1", |e| matches!(e, ExprError::NoVariables)),
        ("", |e| matches!(e, ExprError::Empty)),
        ("x + a", |e| matches!(e, ExprError::UnknownVariable { .. })),
        ("x * (y", |e| matches!(e, ExprError::UnexpectedToken { .. })),
        ("2x + y", |e| matches!(e, ExprError::UnexpectedToken { .. })),
        ("gamma(x) + y", |e| matches!(e, ExprError::UnknownFunction { .. })),
        ("x # y", |e| matches!(e, ExprError::UnexpectedChar { .. })),
    ];
    for (text, check) in cases {
        let err = compile(text).unwrap_err();
        assert!(check(&err), "'{}' gave unexpected error {:?}", text, err);
    }
}

#[test]
fn error_messages_are_readable() {
    let err = compile("x,y").unwrap_err();
    assert!(err.to_string().contains("Commas are not allowed"));
    let err = compile("x + q").unwrap_err();
    assert!(err.to_string().contains("'q'"));
}

#[test]
fn evaluation_error_is_per_point() {
    let f = compile("sqrt(y) + x").unwrap();
    assert!(f.eval(1.0, 4.0).is_ok());
    assert!(matches!(
        f.eval(1.0, -4.0),
        Err(EvalError::Domain { func: "sqrt", .. })
    ));
    // A failed point does not poison the compiled value.
    assert_eq!(f.eval(1.0, 9.0).unwrap(), 4.0);
}

#[test]
fn pathological_input_is_rejected_not_fatal() {
    let deep = format!("{}x + y{}", "(".repeat(20_000), ")".repeat(20_000));
    assert!(matches!(compile(&deep), Err(ExprError::TooLong { .. })));

    let nested = format!("{}x + y{}", "(".repeat(100), ")".repeat(100));
    assert!(matches!(compile(&nested), Err(ExprError::TooDeep { .. })));

    assert!(matches!(
        compile("1e999 * x + y"),
        Err(ExprError::InvalidNumber { .. })
    ));
}

proptest! {
    #[test]
    fn linear_expression_matches_native(x in -1e3_f64..1e3, y in -1e3_f64..1e3) {
        let f = compile("2*x - 3*y + 1").unwrap();
        prop_assert_eq!(f.eval(x, y).unwrap(), 2.0 * x - 3.0 * y + 1.0);
    }

    #[test]
    fn evaluation_is_deterministic(x in -10.0_f64..10.0, y in -10.0_f64..10.0) {
        let f = compile("sin(x) * y + exp(x / 10)").unwrap();
        let a = f.eval(x, y).unwrap();
        let b = f.eval(x, y).unwrap();
        prop_assert_eq!(a.to_bits(), b.to_bits());
    }
}
