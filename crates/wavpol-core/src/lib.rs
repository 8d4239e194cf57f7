//! Wavpol Core - wave polarization analysis of three-component time series
//!
//! Given synchronized samples of an oscillating vector field (typically the
//! three components of a magnetometer), this crate computes, per time window
//! and frequency bin, the wave power, degree of polarization, wavenormal
//! angle, ellipticity, and helicity from the smoothed cospectral matrix.
//!
//! - [`batch`] - split a gapped or irregular time axis into uniform batches
//! - [`window`] - stride-advanced windows, gap interpolation, tapered FFTs
//! - [`fft`] - FFT wrapper and the analysis taper
//! - [`spectral_matrix`] - complex 3×3 cross-power matrices
//! - [`smoothing`] - frequency-domain smoothing of spectral matrices
//! - [`polarization`] - power, degree of polarization, wavenormal angle
//! - [`helicity`] - helicity and ellipticity from rotated matrix rows
//! - [`atan`] - real and complex arctangents
//! - [`result`] - output grids and their assembly
//! - [`analyzer`] - the end-to-end pipeline
//!
//! ## Example
//!
//! ```rust
//! use wavpol_core::{WavpolConfig, wavpol, Quantity};
//! use std::f64::consts::PI;
//!
//! let time: Vec<f64> = (0..2048).map(|i| i as f64 / 32.0).collect();
//! let x: Vec<f64> = time.iter().map(|t| (2.0 * PI * 2.0 * t).cos()).collect();
//! let y: Vec<f64> = time.iter().map(|t| (2.0 * PI * 2.0 * t).sin()).collect();
//! let z = vec![0.0; time.len()];
//!
//! let result = wavpol(&time, &x, &y, &z, WavpolConfig::default()).unwrap();
//! let bin = result.freq_to_bin(2.0);
//! let dop = result.get(Quantity::DegreeOfPolarization, 0, bin).unwrap();
//! assert!(dop > 0.9);
//! ```
//!
//! ## Errors
//!
//! Only two conditions are errors: arrays of unequal length, and a time axis
//! with more than [`batch::MAX_DISCONTINUITIES`] discontinuities. Everything
//! else (NaN samples, zero power, degenerate geometry) yields NaN cells.
//!
//! ## Features
//!
//! - `tracing` - log batch planning, skipped batches, and rate warnings
//! - `parallel` - analyze windows on the rayon thread pool

pub mod analyzer;
pub mod atan;
pub mod batch;
pub mod config;
pub mod error;
pub mod fft;
pub mod helicity;
pub mod polarization;
pub mod result;
pub mod series;
pub mod smoothing;
pub mod spectral_matrix;
pub mod window;

pub use analyzer::{WavpolAnalyzer, wavpol};
pub use atan::{atan2_complex, atan2_real};
pub use batch::{Batch, MAX_DISCONTINUITIES, find_batches};
pub use config::WavpolConfig;
pub use error::WavpolError;
pub use result::{FrameRow, PolarizationSpectrogram, Quantity};
pub use series::TimeSeries;
pub use spectral_matrix::SpectralMatrix;
