//! Standard normal distribution primitives.
//!
//! `cdf` is computed from the complementary error function so that the
//! lower tail keeps its relative precision. Both functions saturate outside
//! `|x| <= 8` instead of returning denormals.

use std::f64::consts::{PI, SQRT_2};

/// Beyond this magnitude the CDF is reported as exactly 0 or 1 and the PDF as 0.
pub const SATURATION_BOUND: f64 = 8.0;

/// Standard normal CDF Φ(x).
#[must_use]
pub fn cdf(x: f64) -> f64 {
    if x < -SATURATION_BOUND {
        0.0
    } else if x > SATURATION_BOUND {
        1.0
    } else {
        0.5 * libm::erfc(-x / SQRT_2)
    }
}

/// Standard normal PDF φ(x).
#[must_use]
pub fn pdf(x: f64) -> f64 {
    if x.abs() > SATURATION_BOUND {
        0.0
    } else {
        (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
    }
}
