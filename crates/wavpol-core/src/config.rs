//! Validated analysis parameters.

use crate::error::WavpolError;
use crate::smoothing::KERNEL;

/// Default FFT window length in samples.
pub const DEFAULT_WINDOW_LENGTH: usize = 256;

/// Default number of frequency bins averaged by the smoother.
pub const DEFAULT_SMOOTHING_WIDTH: usize = 3;

/// Smallest accepted window length.
pub const MIN_WINDOW_LENGTH: usize = 8;

/// Parameters for one polarization analysis run.
///
/// Fields are private so that every instance has passed validation:
///
/// - `window_length` is even and at least [`MIN_WINDOW_LENGTH`]
/// - `stride` is at least 1
/// - `smoothing_width` is odd, no wider than the 7-tap kernel, and no wider
///   than the one-sided spectrum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavpolConfig {
    window_length: usize,
    stride: usize,
    smoothing_width: usize,
}

impl WavpolConfig {
    /// Build a configuration, checking every precondition.
    pub fn new(
        window_length: usize,
        stride: usize,
        smoothing_width: usize,
    ) -> Result<Self, WavpolError> {
        if window_length < MIN_WINDOW_LENGTH {
            return Err(WavpolError::invalid_config(format!(
                "window_length {window_length} is below the minimum of {MIN_WINDOW_LENGTH}"
            )));
        }
        if window_length % 2 != 0 {
            return Err(WavpolError::invalid_config(format!(
                "window_length {window_length} must be even"
            )));
        }
        if stride == 0 {
            return Err(WavpolError::invalid_config("stride must be at least 1"));
        }
        if smoothing_width == 0 || smoothing_width % 2 == 0 {
            return Err(WavpolError::invalid_config(format!(
                "smoothing_width {smoothing_width} must be a positive odd number"
            )));
        }
        if smoothing_width > KERNEL.len() {
            return Err(WavpolError::invalid_config(format!(
                "smoothing_width {smoothing_width} exceeds the {}-tap kernel",
                KERNEL.len()
            )));
        }
        if smoothing_width > window_length / 2 {
            return Err(WavpolError::invalid_config(format!(
                "smoothing_width {smoothing_width} leaves no interior in {} frequency bins",
                window_length / 2
            )));
        }

        Ok(Self {
            window_length,
            stride,
            smoothing_width,
        })
    }

    /// Configuration with the given window length, half-window stride, and
    /// default smoothing width.
    pub fn with_window_length(window_length: usize) -> Result<Self, WavpolError> {
        Self::new(window_length, window_length / 2, DEFAULT_SMOOTHING_WIDTH)
    }

    /// FFT window length in samples.
    pub fn window_length(&self) -> usize {
        self.window_length
    }

    /// Window advance in samples.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Number of frequency bins averaged together.
    pub fn smoothing_width(&self) -> usize {
        self.smoothing_width
    }

    /// Number of bins in the one-sided spectrum.
    pub fn num_bins(&self) -> usize {
        self.window_length / 2
    }
}

impl Default for WavpolConfig {
    fn default() -> Self {
        Self {
            window_length: DEFAULT_WINDOW_LENGTH,
            stride: DEFAULT_WINDOW_LENGTH / 2,
            smoothing_width: DEFAULT_SMOOTHING_WIDTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WavpolConfig::default();
        assert_eq!(config.window_length(), 256);
        assert_eq!(config.stride(), 128);
        assert_eq!(config.smoothing_width(), 3);
        assert_eq!(config.num_bins(), 128);
    }

    #[test]
    fn test_with_window_length_halves_stride() {
        let config = WavpolConfig::with_window_length(128).unwrap();
        assert_eq!(config.stride(), 64);
    }

    #[test]
    fn test_rejects_odd_window() {
        assert!(WavpolConfig::new(255, 128, 3).is_err());
    }

    #[test]
    fn test_rejects_tiny_window() {
        assert!(WavpolConfig::new(4, 2, 1).is_err());
    }

    #[test]
    fn test_rejects_zero_stride() {
        let err = WavpolConfig::new(256, 0, 3).unwrap_err();
        assert!(err.to_string().contains("stride"));
    }

    #[test]
    fn test_rejects_even_or_wide_smoothing() {
        assert!(WavpolConfig::new(256, 128, 4).is_err());
        assert!(WavpolConfig::new(256, 128, 0).is_err());
        assert!(WavpolConfig::new(256, 128, 9).is_err());
        assert!(WavpolConfig::new(8, 4, 7).is_err());
    }

    #[test]
    fn test_accepts_non_power_of_two() {
        let config = WavpolConfig::new(200, 50, 7).unwrap();
        assert_eq!(config.num_bins(), 100);
    }
}
