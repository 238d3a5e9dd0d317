//! Contract tests for MathObject

use builtins::MathObject;

#[test]
fn test_math_abs() {
    assert_eq!(MathObject::abs(-5.0), 5.0);
    assert_eq!(MathObject::abs(5.0), 5.0);
}

#[test]
fn test_math_ceil_floor() {
    assert_eq!(MathObject::ceil(1.1), 2.0);
    assert_eq!(MathObject::ceil(-1.1), -1.0);
    assert_eq!(MathObject::floor(1.9), 1.0);
    assert_eq!(MathObject::floor(-1.1), -2.0);
}

#[test]
fn test_math_round() {
    assert_eq!(MathObject::round(1.4), 1.0);
    assert_eq!(MathObject::round(1.5), 2.0);
    assert_eq!(MathObject::round(-1.5), -1.0);
}

#[test]
fn test_math_sqrt() {
    assert_eq!(MathObject::sqrt(16.0), 4.0);
    assert!(MathObject::sqrt(-1.0).is_nan());
}

#[test]
fn test_math_pow() {
    assert_eq!(MathObject::pow(2.0, 3.0), 8.0);
    assert_eq!(MathObject::pow(10.0, 0.0), 1.0);
    assert_eq!(MathObject::pow(2.0, -1.0), 0.5);
}

#[test]
fn test_math_trig() {
    assert!(MathObject::sin(0.0).abs() < 1e-10);
    assert!((MathObject::cos(0.0) - 1.0).abs() < 1e-10);
    assert!((MathObject::sin(std::f64::consts::FRAC_PI_2) - 1.0).abs() < 1e-10);
}

#[test]
fn test_math_max_min_variadic() {
    assert_eq!(MathObject::max(&[3.0]), 3.0);
    assert_eq!(MathObject::max(&[-1.0, -7.0]), -1.0);
    assert_eq!(MathObject::min(&[]), f64::INFINITY);
    assert!(MathObject::max(&[f64::NAN, 1.0]).is_nan());
}
