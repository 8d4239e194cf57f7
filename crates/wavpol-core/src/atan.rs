//! Branch-correct arctangents for real and complex operands.
//!
//! The real variant is the ordinary four-quadrant `atan2`. The complex
//! variant continues it into the complex plane through the principal
//! logarithm:
//!
//! ```text
//! atan2(y, x) = -i * ln((x + i*y) / sqrt(x^2 + y^2))
//! ```
//!
//! For real `x`, `y` the complex form reduces to the real one.

use rustfft::num_complex::Complex64;

/// Four-quadrant arctangent of `y / x` in `(-π, π]`.
#[inline]
pub fn atan2_real(y: f64, x: f64) -> f64 {
    y.atan2(x)
}

/// Complex-domain arctangent of `y / x` on the principal branch.
///
/// Returns NaN components when `x² + y² = 0`. The analysis pipeline only
/// rotates by real sums and goes through [`rotation_angle`]; this variant is
/// kept for callers holding complex operands.
pub fn atan2_complex(y: Complex64, x: Complex64) -> Complex64 {
    let i = Complex64::i();
    let radius = (x * x + y * y).sqrt();
    if radius.norm_sqr() == 0.0 {
        return Complex64::new(f64::NAN, f64::NAN);
    }
    -i * ((x + i * y) / radius).ln()
}

/// Rotation angle that makes `Σ v²` real and positive, in `(0, 2π]`.
///
/// `upper` is `Σ 2·Re·Im` and `lower` is `Σ (Re² − Im²)`. Non-positive
/// `upper` is lifted by a full turn so the angle stays on one branch.
pub fn rotation_angle(upper: f64, lower: f64) -> f64 {
    let angle = atan2_real(upper, lower);
    if upper > 0.0 {
        angle
    } else {
        2.0 * std::f64::consts::PI + angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    #[test]
    fn test_real_quadrants() {
        assert!((atan2_real(1.0, 1.0) - FRAC_PI_4).abs() < 1e-12);
        assert!((atan2_real(1.0, -1.0) - 3.0 * FRAC_PI_4).abs() < 1e-12);
        assert!((atan2_real(-1.0, -1.0) + 3.0 * FRAC_PI_4).abs() < 1e-12);
        assert!((atan2_real(1.0, 0.0) - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_complex_matches_real_on_real_axis() {
        for &(y, x) in &[(1.0, 2.0), (-3.0, 0.5), (0.7, -0.2), (-1.0, -1.0)] {
            let c = atan2_complex(Complex64::new(y, 0.0), Complex64::new(x, 0.0));
            assert!((c.re - atan2_real(y, x)).abs() < 1e-12, "y={y} x={x} got {c}");
            assert!(c.im.abs() < 1e-12);
        }
    }

    #[test]
    fn test_complex_inverts_tangent() {
        // tan(atan2(y, x)) == y / x for complex operands
        let y = Complex64::new(0.3, 0.4);
        let x = Complex64::new(1.2, -0.1);
        let theta = atan2_complex(y, x);
        let tan = theta.tan();
        let expected = y / x;
        assert!((tan - expected).norm() < 1e-10, "tan={tan} expected={expected}");
    }

    #[test]
    fn test_complex_zero_is_nan() {
        let zero = Complex64::new(0.0, 0.0);
        assert!(atan2_complex(zero, zero).re.is_nan());
    }

    #[test]
    fn test_rotation_angle_branch() {
        assert!((rotation_angle(1.0, 0.0) - FRAC_PI_2).abs() < 1e-12);
        assert!((rotation_angle(-1.0, 0.0) - 3.0 * FRAC_PI_2).abs() < 1e-12);
        assert!((rotation_angle(0.0, 1.0) - 2.0 * PI).abs() < 1e-12);
        assert!((rotation_angle(0.0, -1.0) - 3.0 * PI).abs() < 1e-12);
    }
}
