//! The polarization analysis pipeline.
//!
//! ```text
//! batches → windows → tapered FFT → spectral matrices → smoothing
//!         → {power, polarization, wavenormal, helicity, ellipticity}
//!         → assembled grids
//! ```
//!
//! All window positions are planned before any transform runs, so every
//! window is an independent job writing one output row. With the `parallel`
//! feature the jobs run on the rayon pool; the output is identical.

use crate::batch::{Batch, find_batches, nominal_period, sampling_rate_mismatch};
use crate::config::WavpolConfig;
use crate::error::WavpolError;
use crate::helicity::helicity_ellipticity;
use crate::polarization::{PowerScale, degree_of_polarization, wave_normal_angle};
use crate::result::{FrameRow, PolarizationSpectrogram, ResultAssembler};
use crate::series::TimeSeries;
use crate::smoothing::smooth;
use crate::spectral_matrix::{SpectralMatrix, build_spectral_matrices};
use crate::window::{WindowedFft, plan_windows};

/// One output row to compute.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Job {
    /// Analyze the window starting at `start`.
    Window {
        start: usize,
        time: f64,
        sample_rate: f64,
    },
    /// Placeholder row for a sole batch too short to analyze.
    Degenerate { time: f64 },
}

/// Wave polarization analyzer.
///
/// Holds the validated configuration and the FFT plan; it keeps no state
/// between calls, so repeated runs on the same input are bit-identical.
///
/// # Example
///
/// ```rust
/// use wavpol_core::{TimeSeries, WavpolAnalyzer, WavpolConfig};
/// use std::f64::consts::PI;
///
/// let time: Vec<f64> = (0..401).map(|i| i as f64 * 0.1).collect();
/// let x: Vec<f64> = time.iter().map(|t| (2.0 * PI * t).sin()).collect();
/// let y: Vec<f64> = time.iter().map(|t| (2.0 * PI * t).cos()).collect();
/// let z = vec![0.0; time.len()];
///
/// let config = WavpolConfig::new(128, 64, 3).unwrap();
/// let series = TimeSeries::new(&time, &x, &y, &z).unwrap();
/// let result = WavpolAnalyzer::new(config).analyze(&series).unwrap();
///
/// assert_eq!(result.num_frames(), 5);
/// assert_eq!(result.num_bins(), 64);
/// ```
pub struct WavpolAnalyzer {
    config: WavpolConfig,
    processor: WindowedFft,
}

impl WavpolAnalyzer {
    /// Create an analyzer for `config`.
    pub fn new(config: WavpolConfig) -> Self {
        Self {
            config,
            processor: WindowedFft::new(config.window_length()),
        }
    }

    /// Analysis parameters.
    pub fn config(&self) -> &WavpolConfig {
        &self.config
    }

    /// Run the full analysis over `series`.
    ///
    /// Fails only on [`WavpolError::BatchOverflow`]; numeric trouble in the
    /// data shows up as NaN cells.
    pub fn analyze(&self, series: &TimeSeries<'_>) -> Result<PolarizationSpectrogram, WavpolError> {
        let time = series.time();
        let batches = find_batches(time)?;

        if let Some((_first, _last)) = sampling_rate_mismatch(time) {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                first_hz = _first,
                last_hz = _last,
                "first and last sampling rates disagree; using per-batch rates"
            );
        }

        let jobs = self.plan(series, &batches);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            batches = batches.len(),
            rows = jobs.len(),
            "planned polarization analysis"
        );

        let rows = self.run_jobs(series, &jobs);

        let sample_rate = jobs
            .iter()
            .rev()
            .find_map(|job| match job {
                Job::Window { sample_rate, .. } => Some(*sample_rate),
                Job::Degenerate { .. } => None,
            })
            .or_else(|| batches.last().map(|b| b.sample_rate))
            .or_else(|| nominal_period(time).map(|p| 1.0 / p))
            .unwrap_or(f64::NAN);

        let mut assembler = ResultAssembler::new(self.config, rows.len());
        for row in rows {
            assembler.push(row);
        }
        Ok(assembler.finish(sample_rate / self.config.window_length() as f64))
    }

    /// Output rows for every batch, in time order.
    fn plan(&self, series: &TimeSeries<'_>, batches: &[Batch]) -> Vec<Job> {
        let n = self.config.window_length();
        let mut jobs = Vec::new();
        for batch in batches {
            let windows = plan_windows(series, batch, n, self.config.stride());
            if windows.is_empty() {
                #[cfg(feature = "tracing")]
                tracing::info!(
                    start = batch.start,
                    end = batch.end,
                    window_length = n,
                    "batch too short for one window"
                );
                if batches.len() == 1 {
                    jobs.push(Job::Degenerate {
                        time: series.time()[batch.start + batch.len() / 2],
                    });
                }
                continue;
            }
            jobs.extend(windows.into_iter().map(|w| Job::Window {
                start: w.start,
                time: w.time,
                sample_rate: batch.sample_rate,
            }));
        }
        jobs
    }

    #[cfg(not(feature = "parallel"))]
    fn run_jobs(&self, series: &TimeSeries<'_>, jobs: &[Job]) -> Vec<FrameRow> {
        jobs.iter().map(|job| self.run_job(series, job)).collect()
    }

    #[cfg(feature = "parallel")]
    fn run_jobs(&self, series: &TimeSeries<'_>, jobs: &[Job]) -> Vec<FrameRow> {
        use rayon::prelude::*;
        jobs.par_iter().map(|job| self.run_job(series, job)).collect()
    }

    fn run_job(&self, series: &TimeSeries<'_>, job: &Job) -> FrameRow {
        match *job {
            Job::Window {
                start,
                time,
                sample_rate,
            } => self.analyze_window(series, start, time, sample_rate),
            Job::Degenerate { time } => FrameRow::nan(time, self.config.num_bins()),
        }
    }

    /// Raw (unsmoothed) spectral matrices of the window starting at `start`.
    pub fn window_matrices(&self, series: &TimeSeries<'_>, start: usize) -> Vec<SpectralMatrix> {
        build_spectral_matrices(&self.processor.spectra(series, start))
    }

    /// Analyze the single window starting at `start`.
    pub fn analyze_window(
        &self,
        series: &TimeSeries<'_>,
        start: usize,
        time: f64,
        sample_rate: f64,
    ) -> FrameRow {
        let bins = self.config.num_bins();
        let bin_width = sample_rate / self.config.window_length() as f64;
        let scale = PowerScale::new(bins, bin_width, self.processor.taper().energy());
        let smoothed = smooth(
            &self.window_matrices(series, start),
            self.config.smoothing_width(),
        );

        let mut row = FrameRow::nan(time, bins);
        for (k, m) in smoothed.iter().enumerate() {
            let Some(m) = m else { continue };
            let angle = wave_normal_angle(m);
            let he = helicity_ellipticity(m, angle);
            row.power[k] = scale.power(k, m);
            row.axis_power[k] = scale.axis_power(k, m);
            row.degree_of_polarization[k] = degree_of_polarization(m);
            row.wave_normal_angle[k] = angle;
            row.ellipticity[k] = he.ellipticity;
            row.helicity[k] = he.helicity;
        }
        row
    }
}

/// Analyze plain arrays in one call.
pub fn wavpol(
    time: &[f64],
    x: &[f64],
    y: &[f64],
    z: &[f64],
    config: WavpolConfig,
) -> Result<PolarizationSpectrogram, WavpolError> {
    let series = TimeSeries::new(time, x, y, z)?;
    WavpolAnalyzer::new(config).analyze(&series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn circular(n: usize, fs: f64, freq: f64) -> (Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>) {
        let time: Vec<f64> = (0..n).map(|i| i as f64 / fs).collect();
        let x = time.iter().map(|t| (2.0 * PI * freq * t).sin()).collect();
        let y = time.iter().map(|t| (2.0 * PI * freq * t).cos()).collect();
        (time, x, y, vec![0.0; n])
    }

    #[test]
    fn test_short_sole_batch_gives_one_nan_row() {
        let (t, x, y, z) = circular(100, 10.0, 1.0);
        let config = WavpolConfig::with_window_length(128).unwrap();
        let out = wavpol(&t, &x, &y, &z, config).unwrap();
        assert_eq!(out.num_frames(), 1);
        assert_eq!(out.num_bins(), 64);
        assert!(out.power[0].iter().all(|p| p.is_nan()));
        assert!((out.timeline[0] - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_batch_among_many_is_skipped() {
        let (mut t, mut x, mut y, mut z) = circular(300, 10.0, 1.0);
        // a 50-sample batch after a gap
        let (t2, x2, y2, z2) = circular(50, 10.0, 1.0);
        t.extend(t2.iter().map(|v| v + 100.0));
        x.extend(x2);
        y.extend(y2);
        z.extend(z2);
        let config = WavpolConfig::new(128, 64, 3).unwrap();
        let out = wavpol(&t, &x, &y, &z, config).unwrap();
        assert_eq!(out.num_frames(), (300 - 128) / 64 + 1);
        assert!(out.timeline.iter().all(|&time| time < 100.0));
    }

    #[test]
    fn test_edge_bins_are_nan() {
        let (t, x, y, z) = circular(256, 10.0, 1.0);
        let config = WavpolConfig::new(128, 128, 5).unwrap();
        let out = wavpol(&t, &x, &y, &z, config).unwrap();
        let dop = &out.degree_of_polarization[0];
        assert!(dop[0].is_nan() && dop[1].is_nan());
        assert!(dop[62].is_nan() && dop[63].is_nan());
        assert!(dop[13].is_finite());
    }

    #[test]
    fn test_empty_series() {
        let config = WavpolConfig::default();
        let out = wavpol(&[], &[], &[], &[], config).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.num_bins(), 128);
    }

    #[test]
    fn test_mismatched_lengths() {
        let config = WavpolConfig::default();
        let err = wavpol(&[0.0, 1.0], &[0.0], &[0.0, 1.0], &[0.0, 1.0], config).unwrap_err();
        assert!(matches!(err, WavpolError::LengthMismatch { .. }));
    }
}
