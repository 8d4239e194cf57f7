//! FFT wrapper and the analysis taper

use rustfft::{FftPlanner, num_complex::Complex64};
use std::f64::consts::PI;
use std::sync::Arc;

/// Raised-cosine taper applied to every analysis window.
///
/// `w[n] = 0.08 + 0.46 * (1 - cos(2πn / N))`. This is a Hamming-like
/// window with a 0.08 pedestal, not the textbook Hann window.
#[derive(Debug, Clone, PartialEq)]
pub struct Taper {
    coefficients: Vec<f64>,
    energy: f64,
}

impl Taper {
    /// Build the taper for windows of `size` samples.
    pub fn new(size: usize) -> Self {
        let n = size as f64;
        let coefficients: Vec<f64> = (0..size)
            .map(|i| 0.08 + 0.46 * (1.0 - (2.0 * PI * i as f64 / n).cos()))
            .collect();
        let energy = coefficients.iter().map(|w| w * w).sum::<f64>() / n;
        Self {
            coefficients,
            energy,
        }
    }

    /// Window length.
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    /// True for a zero-length taper.
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Taper coefficients.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Energy normalization `W = Σ w[n]² / N`.
    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// Multiply `buffer` by the taper in place.
    pub fn apply(&self, buffer: &mut [f64]) {
        for (sample, w) in buffer.iter_mut().zip(&self.coefficients) {
            *sample *= w;
        }
    }
}

/// Forward FFT processor for a fixed size
pub struct Fft {
    fft: Arc<dyn rustfft::Fft<f64>>,
    size: usize,
}

impl Fft {
    /// Create a new FFT processor for the given size
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        Self { fft, size }
    }

    /// Get FFT size
    pub fn size(&self) -> usize {
        self.size
    }

    /// One-sided, energy-normalized spectrum of a real input.
    ///
    /// Returns the first `size / 2` bins of the forward transform divided
    /// by `size`. Input shorter than the FFT size is zero-padded.
    pub fn half_spectrum(&self, input: &[f64]) -> Vec<Complex64> {
        let mut buffer: Vec<Complex64> = input
            .iter()
            .take(self.size)
            .map(|&x| Complex64::new(x, 0.0))
            .collect();
        buffer.resize(self.size, Complex64::new(0.0, 0.0));

        self.fft.process(&mut buffer);

        let scale = 1.0 / self.size as f64;
        buffer.truncate(self.size / 2);
        for c in &mut buffer {
            *c *= scale;
        }
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taper_shape() {
        let taper = Taper::new(256);
        let w = taper.coefficients();
        assert!((w[0] - 0.08).abs() < 1e-12);
        assert!((w[128] - 1.0).abs() < 1e-12);
        // periodic: symmetric about the center
        assert!((w[1] - w[255]).abs() < 1e-12);
    }

    #[test]
    fn test_taper_energy() {
        // Σ (0.54 - 0.46 cos)^2 / N = 0.54^2 + 0.46^2 / 2
        let taper = Taper::new(512);
        let expected = 0.54 * 0.54 + 0.46 * 0.46 / 2.0;
        assert!((taper.energy() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_half_spectrum_length_and_scale() {
        let fft = Fft::new(64);
        let input = vec![1.0; 64];
        let spectrum = fft.half_spectrum(&input);
        assert_eq!(spectrum.len(), 32);
        // normalized DC of a unit constant is 1
        assert!((spectrum[0].re - 1.0).abs() < 1e-12);
        assert!(spectrum[1..].iter().all(|c| c.norm() < 1e-12));
    }

    #[test]
    fn test_sine_peak_bin() {
        let fft = Fft::new(128);
        let input: Vec<f64> = (0..128)
            .map(|i| (2.0 * PI * 10.0 * i as f64 / 128.0).sin())
            .collect();
        let spectrum = fft.half_spectrum(&input);
        // A sin at an exact bin splits into ±k halves of amplitude 1/2
        assert!((spectrum[10].norm() - 0.5).abs() < 1e-9);
    }
}
