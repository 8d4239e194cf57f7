//! Stride-advanced windows over a batch and their tapered spectra.
//!
//! Windows are addressed by index into the caller's arrays; nothing is
//! shifted or copied beyond the one working buffer per channel.

use crate::batch::Batch;
use crate::fft::{Fft, Taper};
use crate::series::TimeSeries;
use rustfft::num_complex::Complex64;

/// One analysis window: `window_length` samples starting at `start`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    /// First sample index into the series.
    pub start: usize,
    /// Time stamp at the window center.
    pub time: f64,
}

/// Windows that fit in `batch`, advanced by `stride`.
///
/// A batch whose finite-sample count does not exceed `window_length`
/// yields no windows.
pub fn plan_windows(
    series: &TimeSeries<'_>,
    batch: &Batch,
    window_length: usize,
    stride: usize,
) -> Vec<Window> {
    if series.finite_count(batch.start, batch.end) <= window_length {
        return Vec::new();
    }

    let steps = (batch.len() - window_length) / stride + 1;
    let time = series.time();
    (0..steps)
        .map(|k| {
            let start = batch.start + k * stride;
            Window {
                start,
                time: time[start + window_length / 2],
            }
        })
        .collect()
}

/// Replace non-finite samples by linear interpolation over sample index.
///
/// Samples before the first or after the last finite value take that
/// value. A buffer with no finite samples is left unchanged.
pub fn interpolate_gaps(buffer: &mut [f64]) {
    let finite: Vec<usize> = (0..buffer.len())
        .filter(|&i| buffer[i].is_finite())
        .collect();
    let (Some(&first), Some(&last)) = (finite.first(), finite.last()) else {
        return;
    };
    if finite.len() == buffer.len() {
        return;
    }

    for i in 0..first {
        buffer[i] = buffer[first];
    }
    for i in last + 1..buffer.len() {
        buffer[i] = buffer[last];
    }
    for pair in finite.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if b - a < 2 {
            continue;
        }
        let (va, vb) = (buffer[a], buffer[b]);
        let span = (b - a) as f64;
        for i in a + 1..b {
            let frac = (i - a) as f64 / span;
            buffer[i] = va + (vb - va) * frac;
        }
    }
}

/// Computes the tapered one-sided spectra of the three channels.
pub struct WindowedFft {
    fft: Fft,
    taper: Taper,
}

impl WindowedFft {
    /// Create a processor for windows of `window_length` samples.
    pub fn new(window_length: usize) -> Self {
        Self {
            fft: Fft::new(window_length),
            taper: Taper::new(window_length),
        }
    }

    /// Window length in samples.
    pub fn window_length(&self) -> usize {
        self.fft.size()
    }

    /// The taper applied before each transform.
    pub fn taper(&self) -> &Taper {
        &self.taper
    }

    /// Spectra of x, y, z for the window starting at `start`.
    ///
    /// Each is `window_length / 2` bins long. A channel with no finite
    /// sample in the window yields an all-NaN spectrum.
    pub fn spectra(&self, series: &TimeSeries<'_>, start: usize) -> [Vec<Complex64>; 3] {
        let n = self.window_length();
        let mut buffer = vec![0.0; n];
        std::array::from_fn(|axis| {
            buffer.copy_from_slice(&series.channel(axis)[start..start + n]);
            interpolate_gaps(&mut buffer);
            self.taper.apply(&mut buffer);
            self.fft.half_spectrum(&buffer)
        })
    }
}
