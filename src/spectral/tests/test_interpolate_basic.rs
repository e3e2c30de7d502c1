use approx::assert_relative_eq;

use crate::spectral::{CubicSpline, InterpolateError, MonotoneCubic};

#[test]
fn natural_spline_passes_through_knots() {
    let x = [0.0, 1.0, 2.5, 4.0, 5.0];
    let y = [1.0, -0.5, 2.0, 0.25, 3.0];
    let spline = CubicSpline::natural(&x, &y).expect("spline");
    for (xi, yi) in x.iter().zip(&y) {
        assert_relative_eq!(spline.eval(*xi), *yi, epsilon = 1e-12);
    }
    assert_eq!(spline.domain(), (0.0, 5.0));
}

#[test]
fn natural_spline_reproduces_a_line() {
    let x: Vec<f64> = (0..8).map(f64::from).collect();
    let y: Vec<f64> = x.iter().map(|v| 3.0 * v - 2.0).collect();
    let spline = CubicSpline::natural(&x, &y).expect("spline");
    for t in [0.25, 1.5, 3.75, 6.9] {
        assert_relative_eq!(spline.eval(t), 3.0 * t - 2.0, epsilon = 1e-12);
    }
}

#[test]
fn knot_validation() {
    assert_eq!(
        CubicSpline::natural(&[0.0, 1.0], &[0.0, 1.0]).unwrap_err(),
        InterpolateError::TooFewKnots { required: 3, actual: 2 }
    );
    assert_eq!(
        MonotoneCubic::new(&[0.0, 1.0, 1.0], &[0.0, 1.0, 2.0]).unwrap_err(),
        InterpolateError::NotIncreasing { index: 2 }
    );
    assert_eq!(
        MonotoneCubic::new(&[0.0, 1.0], &[0.0]).unwrap_err(),
        InterpolateError::LengthMismatch { knots: 2, values: 1 }
    );
}

#[test]
fn monotone_cubic_is_exact_at_knots() {
    let x = [380.0, 385.0, 390.0, 395.0];
    let y = [0.001368, 0.002236, 0.004243, 0.00765];
    let pchip = MonotoneCubic::new(&x, &y).expect("pchip");
    for (xi, yi) in x.iter().zip(&y) {
        assert_eq!(pchip.eval(*xi), *yi);
    }
    // Tolerant to grid snapping noise.
    assert_eq!(pchip.eval(390.000_000_000_1), 0.004243);
}

#[test]
fn monotone_cubic_does_not_overshoot() {
    let x = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
    let y = [0.0, 0.0, 1.0, 1.0, 0.0, 0.0];
    let pchip = MonotoneCubic::new(&x, &y).expect("pchip");
    for i in 0..=500 {
        let t = f64::from(i) / 100.0;
        let v = pchip.eval(t);
        assert!((0.0..=1.0).contains(&v), "overshoot {v} at {t}");
    }
    assert_eq!(pchip.eval(0.5), 0.0);
    assert_eq!(pchip.eval(2.5), 1.0);
}
