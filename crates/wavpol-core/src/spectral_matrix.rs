//! Complex 3×3 cross-power matrices.

use rustfft::num_complex::Complex64;
use std::ops::{Add, Index, Mul};

/// Cross-power matrix of the x, y, z spectra at one frequency bin.
///
/// Built as `M[i][j] = S_i · conj(S_j)`, so it is Hermitian with real,
/// non-negative diagonal. Smoothing is a non-negative weighted sum of such
/// matrices and keeps both properties.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralMatrix(pub [[Complex64; 3]; 3]);

impl SpectralMatrix {
    /// The all-zero matrix.
    pub fn zero() -> Self {
        Self([[Complex64::new(0.0, 0.0); 3]; 3])
    }

    /// Outer product `s · sᴴ` of one bin's channel spectra.
    pub fn outer(s: [Complex64; 3]) -> Self {
        Self(std::array::from_fn(|i| {
            std::array::from_fn(|j| s[i] * s[j].conj())
        }))
    }

    /// Auto-power of channel `axis`.
    pub fn auto_power(&self, axis: usize) -> f64 {
        self.0[axis][axis].re
    }

    /// Real part of the trace.
    pub fn trace(&self) -> f64 {
        self.0[0][0].re + self.0[1][1].re + self.0[2][2].re
    }

    /// Trace of the matrix square, `tr(M²) = Σ M_ij · M_ji`.
    pub fn trace_of_square(&self) -> f64 {
        let mut sum = Complex64::new(0.0, 0.0);
        for i in 0..3 {
            for j in 0..3 {
                sum += self.0[i][j] * self.0[j][i];
            }
        }
        sum.re
    }

    /// Largest deviation from Hermitian symmetry, including any imaginary
    /// part on the diagonal.
    pub fn hermitian_error(&self) -> f64 {
        let mut worst = 0.0f64;
        for i in 0..3 {
            for j in 0..3 {
                worst = worst.max((self.0[i][j] - self.0[j][i].conj()).norm());
            }
        }
        worst
    }
}

impl Index<(usize, usize)> for SpectralMatrix {
    type Output = Complex64;

    fn index(&self, (i, j): (usize, usize)) -> &Complex64 {
        &self.0[i][j]
    }
}

impl Add for SpectralMatrix {
    type Output = SpectralMatrix;

    fn add(self, rhs: SpectralMatrix) -> SpectralMatrix {
        Self(std::array::from_fn(|i| {
            std::array::from_fn(|j| self.0[i][j] + rhs.0[i][j])
        }))
    }
}

impl Mul<f64> for SpectralMatrix {
    type Output = SpectralMatrix;

    fn mul(self, rhs: f64) -> SpectralMatrix {
        Self(self.0.map(|row| row.map(|c| c * rhs)))
    }
}

/// Spectral matrix for every bin of one window.
///
/// The three spectra must have equal length.
pub fn build_spectral_matrices(spectra: &[Vec<Complex64>; 3]) -> Vec<SpectralMatrix> {
    let [sx, sy, sz] = spectra;
    sx.iter()
        .zip(sy)
        .zip(sz)
        .map(|((&x, &y), &z)| SpectralMatrix::outer([x, y, z]))
        .collect()
}
