//! Math namespace operations

/// Math namespace with static methods
pub struct MathObject;

impl MathObject {
    /// Math.abs(x)
    pub fn abs(x: f64) -> f64 {
        x.abs()
    }

    /// Math.ceil(x)
    pub fn ceil(x: f64) -> f64 {
        x.ceil()
    }

    /// Math.floor(x)
    pub fn floor(x: f64) -> f64 {
        x.floor()
    }

    /// Math.round(x); halves round towards positive infinity
    pub fn round(x: f64) -> f64 {
        (x + 0.5).floor()
    }

    /// Math.sqrt(x)
    pub fn sqrt(x: f64) -> f64 {
        x.sqrt()
    }

    /// Math.pow(base, exponent)
    pub fn pow(base: f64, exponent: f64) -> f64 {
        base.powf(exponent)
    }

    /// Math.sin(x)
    pub fn sin(x: f64) -> f64 {
        x.sin()
    }

    /// Math.cos(x)
    pub fn cos(x: f64) -> f64 {
        x.cos()
    }

    /// Math.max(...values); `-Infinity` for no values, NaN if any is NaN
    pub fn max(values: &[f64]) -> f64 {
        values.iter().fold(f64::NEG_INFINITY, |acc, &v| {
            if acc.is_nan() || v.is_nan() {
                f64::NAN
            } else {
                acc.max(v)
            }
        })
    }

    /// Math.min(...values); `Infinity` for no values, NaN if any is NaN
    pub fn min(values: &[f64]) -> f64 {
        values.iter().fold(f64::INFINITY, |acc, &v| {
            if acc.is_nan() || v.is_nan() {
                f64::NAN
            } else {
                acc.min(v)
            }
        })
    }
}
