//! Wave power, degree of polarization, and wavenormal angle.
//!
//! All estimators take a smoothed [`SpectralMatrix`] and return NaN instead
//! of failing when the matrix is degenerate (zero power, no off-diagonal
//! imaginary part).

use crate::spectral_matrix::SpectralMatrix;

/// Converts spectral-matrix entries to power spectral density.
///
/// Interior bins carry a factor of two for the mirrored negative
/// frequencies; the first and last bins of the one-sided spectrum do not.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerScale {
    num_bins: usize,
    inverse: f64,
}

impl PowerScale {
    /// Scale for `num_bins` bins of width `bin_width` Hz and a taper with
    /// energy factor `taper_energy`.
    pub fn new(num_bins: usize, bin_width: f64, taper_energy: f64) -> Self {
        Self {
            num_bins,
            inverse: 1.0 / (taper_energy * bin_width),
        }
    }

    /// Multiplier for bin `k`.
    pub fn factor(&self, k: usize) -> f64 {
        if k == 0 || k + 1 == self.num_bins {
            self.inverse
        } else {
            2.0 * self.inverse
        }
    }

    /// Total power at bin `k`.
    pub fn power(&self, k: usize, m: &SpectralMatrix) -> f64 {
        self.factor(k) * m.trace()
    }

    /// Per-axis power at bin `k`.
    pub fn axis_power(&self, k: usize, m: &SpectralMatrix) -> [f64; 3] {
        let factor = self.factor(k);
        std::array::from_fn(|axis| factor * m.auto_power(axis))
    }
}

/// Samson–Olson degree of polarization `(3·tr(M²) − tr(M)²) / (2·tr(M)²)`.
///
/// Near 1 for a single coherent wave, near 0 for isotropic noise. Not
/// clamped: smoothing and noise can push it slightly outside `[0, 1]`.
pub fn degree_of_polarization(m: &SpectralMatrix) -> f64 {
    let tr = m.trace();
    let tr2 = tr * tr;
    (3.0 * m.trace_of_square() - tr2) / (2.0 * tr2)
}

/// Unit wavenormal estimate from the off-diagonal imaginary parts.
///
/// `k = (|Im M_yz|, −|Im M_xz|, Im M_xy) / ‖·‖`. All components are NaN
/// when the three imaginary parts vanish.
pub fn wave_normal(m: &SpectralMatrix) -> [f64; 3] {
    let im_xy = m[(0, 1)].im;
    let im_xz = m[(0, 2)].im;
    let im_yz = m[(1, 2)].im;
    let norm = (im_xy * im_xy + im_xz * im_xz + im_yz * im_yz).sqrt();
    if norm == 0.0 {
        return [f64::NAN; 3];
    }
    [im_yz.abs() / norm, -im_xz.abs() / norm, im_xy / norm]
}

/// Angle in `[0, π/2]` between the wavenormal and the z axis.
pub fn wave_normal_angle(m: &SpectralMatrix) -> f64 {
    let [kx, ky, kz] = wave_normal(m);
    (kx * kx + ky * ky).sqrt().atan2(kz.abs())
}
