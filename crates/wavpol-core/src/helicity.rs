//! Helicity and ellipticity from rotated spectral-matrix rows.
//!
//! For each reference axis `a`, the row `M[a][·] / sqrt(M[a][a])` is a
//! complex field vector up to a common phase. Rotating it by
//! `exp(−iγ/2)`, with `γ` chosen so that `Σ v²` is real and positive,
//! aligns its real part with the major axis of the polarization ellipse and
//! its imaginary part with the minor axis. The minor/major ratio over all
//! three components is the helicity; over the x and y components (the plane
//! transverse to the z reference axis) it is the ellipticity.

use crate::atan::rotation_angle;
use crate::spectral_matrix::SpectralMatrix;
use rustfft::num_complex::Complex64;

/// Three-axis averaged helicity and signed ellipticity for one bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelicityEllipticity {
    /// Minor/major axis ratio of the full three-component ellipse.
    pub helicity: f64,
    /// Minor/major axis ratio in the x–y plane, negative for left-handed
    /// rotation about z.
    pub ellipticity: f64,
}

/// Row `axis` of `m` divided by the square root of its auto-power.
///
/// `None` when that auto-power is zero or not finite.
fn normalized_row(m: &SpectralMatrix, axis: usize) -> Option<[Complex64; 3]> {
    let norm = m.auto_power(axis).sqrt();
    if !(norm > 0.0 && norm.is_finite()) {
        return None;
    }
    Some(m.0[axis].map(|c| c / norm))
}

/// Rotate `v` by `exp(−iγ/2)` so its real and imaginary parts decorrelate.
pub fn rotate_to_principal<const N: usize>(v: [Complex64; N]) -> [Complex64; N] {
    let upper: f64 = v.iter().map(|c| 2.0 * c.re * c.im).sum();
    let lower: f64 = v.iter().map(|c| c.re * c.re - c.im * c.im).sum();
    let gamma = rotation_angle(upper, lower);
    let phase = Complex64::from_polar(1.0, -0.5 * gamma);
    v.map(|c| c * phase)
}

/// `‖Im v‖ / ‖Re v‖`, NaN when the real part vanishes.
fn minor_major_ratio(v: &[Complex64]) -> f64 {
    let re = v.iter().map(|c| c.re * c.re).sum::<f64>().sqrt();
    let im = v.iter().map(|c| c.im * c.im).sum::<f64>().sqrt();
    if re == 0.0 {
        return f64::NAN;
    }
    im / re
}

/// Sign applied to the unsigned ellipticity.
///
/// `sign(Im(M_xy)·sin θ)`; when `sin θ` is zero the sign of `Im(M_xy)`
/// alone decides. Negative is left-handed about the reference axis. `None`
/// when `Im(M_xy)` is zero or NaN, which leaves the ellipticity unsigned.
pub fn handedness_sign(m: &SpectralMatrix, wave_angle: f64) -> Option<f64> {
    let im_xy = m[(0, 1)].im;
    let product = im_xy * wave_angle.sin();
    if product != 0.0 && product.is_finite() {
        Some(product.signum())
    } else if im_xy != 0.0 && im_xy.is_finite() {
        Some(im_xy.signum())
    } else {
        None
    }
}

/// Helicity and unsigned ellipticity with axis `axis` as reference row.
pub fn axis_estimate(m: &SpectralMatrix, axis: usize) -> Option<(f64, f64)> {
    let row = normalized_row(m, axis)?;
    let rotated = rotate_to_principal(row);
    let helicity = minor_major_ratio(&rotated);

    let transverse = rotate_to_principal([rotated[0], rotated[1]]);
    let ellipticity = minor_major_ratio(&transverse);

    Some((helicity, ellipticity))
}

/// Mean of the finite values, NaN when there are none.
fn finite_mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Helicity and ellipticity averaged over the three reference rows.
///
/// Rows with zero auto-power are skipped; if all are degenerate both values
/// are NaN.
pub fn helicity_ellipticity(m: &SpectralMatrix, wave_angle: f64) -> HelicityEllipticity {
    let estimates: Vec<(f64, f64)> = (0..3).filter_map(|axis| axis_estimate(m, axis)).collect();
    let sign = handedness_sign(m, wave_angle).unwrap_or(1.0);

    HelicityEllipticity {
        helicity: finite_mean(estimates.iter().map(|e| e.0)),
        ellipticity: sign * finite_mean(estimates.iter().map(|e| e.1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polarization::wave_normal_angle;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_rotation_decorrelates() {
        let v = [c(1.0, 0.5), c(-0.3, 0.8), c(0.2, 0.1)];
        let r = rotate_to_principal(v);
        let cross: f64 = r.iter().map(|c| c.re * c.im).sum();
        assert!(cross.abs() < 1e-12);
        let re: f64 = r.iter().map(|c| c.re * c.re).sum();
        let im: f64 = r.iter().map(|c| c.im * c.im).sum();
        assert!(re >= im);
    }

    #[test]
    fn test_circular_in_xy() {
        let m = SpectralMatrix::outer([c(1.0, 0.0), c(0.0, 1.0), c(0.0, 0.0)]);
        let theta = wave_normal_angle(&m);
        let result = helicity_ellipticity(&m, theta);
        assert!((result.helicity - 1.0).abs() < 1e-9);
        assert!((result.ellipticity.abs() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_handedness_flips_with_rotation_sense() {
        let left = SpectralMatrix::outer([c(1.0, 0.0), c(0.0, 1.0), c(0.0, 0.0)]);
        let right = SpectralMatrix::outer([c(1.0, 0.0), c(0.0, -1.0), c(0.0, 0.0)]);
        let a = helicity_ellipticity(&left, wave_normal_angle(&left)).ellipticity;
        let b = helicity_ellipticity(&right, wave_normal_angle(&right)).ellipticity;
        assert!(a * b < 0.0, "a={a} b={b}");
    }

    #[test]
    fn test_left_handed_is_negative() {
        // M_xy = S_x·conj(S_y) with S_y = i·S_x: Im(M_xy) < 0
        let left = SpectralMatrix::outer([c(1.0, 0.0), c(0.0, 1.0), c(0.0, 0.0)]);
        assert_eq!(handedness_sign(&left, 0.0), Some(-1.0));
        let e = helicity_ellipticity(&left, wave_normal_angle(&left)).ellipticity;
        assert!((e + 1.0).abs() < 1e-9, "ellipticity {e}");

        let right = SpectralMatrix::outer([c(1.0, 0.0), c(0.0, -1.0), c(0.0, 0.0)]);
        assert_eq!(handedness_sign(&right, 0.3), Some(1.0));
        assert_eq!(handedness_sign(&SpectralMatrix::zero(), 0.3), None);
    }

    #[test]
    fn test_linear_is_flat() {
        let m = SpectralMatrix::outer([c(1.0, 0.2), c(2.0, 0.4), c(0.5, 0.1)]);
        let result = helicity_ellipticity(&m, wave_normal_angle(&m));
        assert!(result.helicity.abs() < 1e-9);
        assert!(result.ellipticity.abs() < 1e-9);
    }

    #[test]
    fn test_elliptical_ratio() {
        // x = 2 cos, y = sin: minor/major = 0.5
        let m = SpectralMatrix::outer([c(2.0, 0.0), c(0.0, 1.0), c(0.0, 0.0)]);
        let result = helicity_ellipticity(&m, wave_normal_angle(&m));
        assert!((result.ellipticity.abs() - 0.5).abs() < 1e-9);
        assert!((result.helicity - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_zero_matrix_is_nan() {
        let result = helicity_ellipticity(&SpectralMatrix::zero(), f64::NAN);
        assert!(result.helicity.is_nan());
        assert!(result.ellipticity.is_nan());
    }
}
