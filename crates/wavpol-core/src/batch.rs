//! Splitting a time axis into uniformly sampled batches.
//!
//! The nominal sample period comes from the first pair of time stamps. Every
//! later step is compared against it; a step that runs backwards, or that
//! deviates from the nominal period by more than [`CADENCE_TOLERANCE`], is a
//! discontinuity. Each discontinuity closes the current batch, and the final
//! sample always closes the last one, so `k` discontinuities give `k + 1`
//! batches.
//!
//! Every batch later allocates full per-bin arrays, so a time axis with more
//! than [`MAX_DISCONTINUITIES`] discontinuities is rejected outright.

use crate::error::WavpolError;

/// Most discontinuities accepted before the analysis is aborted.
pub const MAX_DISCONTINUITIES: usize = 80_000;

/// Allowed relative deviation of a step from the nominal sample period.
pub const CADENCE_TOLERANCE: f64 = 0.01;

/// Contiguous sample range `[start, end)` with one sampling rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Batch {
    /// First sample index.
    pub start: usize,
    /// One past the last sample index.
    pub end: usize,
    /// Sampling rate in Hz inferred from the first step of the batch.
    pub sample_rate: f64,
}

impl Batch {
    /// Number of samples in the batch.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True when the batch holds no samples.
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// Frequency bin width in Hz for an FFT of `window_length` samples.
    pub fn bin_width(&self, window_length: usize) -> f64 {
        self.sample_rate / window_length as f64
    }
}

/// Sample period implied by the first two time stamps.
pub fn nominal_period(time: &[f64]) -> Option<f64> {
    match time {
        [t0, t1, ..] => Some(t1 - t0),
        _ => None,
    }
}

/// Sampling rates from the first and last steps, when they disagree by more
/// than [`CADENCE_TOLERANCE`].
pub fn sampling_rate_mismatch(time: &[f64]) -> Option<(f64, f64)> {
    let n = time.len();
    if n < 3 {
        return None;
    }
    let first = 1.0 / (time[1] - time[0]);
    let last = 1.0 / (time[n - 1] - time[n - 2]);
    let agree = (first - last).abs() <= CADENCE_TOLERANCE * first.abs();
    if agree { None } else { Some((first, last)) }
}

/// True when the step from `time[i]` to `time[i + 1]` breaks the cadence.
fn is_discontinuity(dt: f64, period: f64) -> bool {
    let within = dt >= 0.0 && (dt - period).abs() <= CADENCE_TOLERANCE * period;
    !within
}

/// Indices `i` whose following step breaks the cadence.
pub fn discontinuities(time: &[f64]) -> Vec<usize> {
    let Some(period) = nominal_period(time) else {
        return Vec::new();
    };
    time.windows(2)
        .enumerate()
        .filter(|(_, pair)| is_discontinuity(pair[1] - pair[0], period))
        .map(|(i, _)| i)
        .collect()
}

/// Split `time` into batches of consistent cadence.
///
/// Fails with [`WavpolError::BatchOverflow`] when the number of
/// discontinuities exceeds [`MAX_DISCONTINUITIES`]; no batches are built in
/// that case.
pub fn find_batches(time: &[f64]) -> Result<Vec<Batch>, WavpolError> {
    if time.is_empty() {
        return Ok(Vec::new());
    }

    let breaks = discontinuities(time);
    if breaks.len() > MAX_DISCONTINUITIES {
        #[cfg(feature = "tracing")]
        tracing::error!(
            discontinuities = breaks.len(),
            limit = MAX_DISCONTINUITIES,
            "batch overflow, aborting analysis"
        );
        return Err(WavpolError::BatchOverflow {
            discontinuities: breaks.len(),
            limit: MAX_DISCONTINUITIES,
        });
    }

    let fallback_rate = nominal_period(time)
        .filter(|p| p.is_finite() && *p > 0.0)
        .map_or(f64::NAN, |p| 1.0 / p);

    let mut batches = Vec::with_capacity(breaks.len() + 1);
    let mut start = 0;
    for end in breaks
        .into_iter()
        .map(|i| i + 1)
        .chain(std::iter::once(time.len()))
    {
        let sample_rate = if end - start >= 2 {
            1.0 / (time[start + 1] - time[start])
        } else {
            fallback_rate
        };
        batches.push(Batch {
            start,
            end,
            sample_rate,
        });
        start = end;
    }

    Ok(batches)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(n: usize, dt: f64) -> Vec<f64> {
        (0..n).map(|i| i as f64 * dt).collect()
    }

    #[test]
    fn test_uniform_is_one_batch() {
        let time = uniform(1000, 0.1);
        let batches = find_batches(&time).unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].start, 0);
        assert_eq!(batches[0].end, 1000);
        assert!((batches[0].sample_rate - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_small_jitter_tolerated() {
        let time: Vec<f64> = (0..100)
            .map(|i| i as f64 + if i % 2 == 0 { 0.002 } else { -0.002 })
            .collect();
        assert_eq!(find_batches(&time).unwrap().len(), 1);
    }

    #[test]
    fn test_gap_splits() {
        let mut time = uniform(10, 1.0);
        time.extend((0..10).map(|i| 20.0 + i as f64));
        let batches = find_batches(&time).unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!((batches[0].start, batches[0].end), (0, 10));
        assert_eq!((batches[1].start, batches[1].end), (10, 20));
    }

    #[test]
    fn test_reversal_splits() {
        let time = [0.0, 1.0, 2.0, 3.0, 2.0, 3.0, 4.0];
        let batches = find_batches(&time).unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].end, 4);
        assert_eq!(batches[1].start, 4);
    }

    #[test]
    fn test_nan_time_breaks() {
        let time = [0.0, 1.0, 2.0, f64::NAN, 4.0, 5.0];
        let batches = find_batches(&time).unwrap();
        assert_eq!(batches.len(), 3);
    }

    #[test]
    fn test_single_sample() {
        let batches = find_batches(&[5.0]).unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 1);
        assert!(batches[0].sample_rate.is_nan());
    }

    #[test]
    fn test_empty() {
        assert!(find_batches(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_sampling_rate_mismatch() {
        assert!(sampling_rate_mismatch(&uniform(50, 0.5)).is_none());
        let mut time = uniform(50, 0.5);
        time.push(24.5 + 0.25);
        let (first, last) = sampling_rate_mismatch(&time).unwrap();
        assert!((first - 2.0).abs() < 1e-9);
        assert!((last - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_bin_width() {
        let batch = Batch {
            start: 0,
            end: 10,
            sample_rate: 10.0,
        };
        assert!((batch.bin_width(128) - 0.078125).abs() < 1e-12);
    }
}
