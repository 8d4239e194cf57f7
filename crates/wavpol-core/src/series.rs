//! Borrowed view of a three-component time series.

use crate::error::WavpolError;

/// Synchronized time stamps and three channel arrays.
///
/// The engine only reads the arrays. Time may contain reversals and gaps,
/// and channels may contain NaN; both are handled downstream.
#[derive(Debug, Clone, Copy)]
pub struct TimeSeries<'a> {
    time: &'a [f64],
    x: &'a [f64],
    y: &'a [f64],
    z: &'a [f64],
}

impl<'a> TimeSeries<'a> {
    /// Wrap the four arrays, checking that they have one length.
    pub fn new(
        time: &'a [f64],
        x: &'a [f64],
        y: &'a [f64],
        z: &'a [f64],
    ) -> Result<Self, WavpolError> {
        let n = time.len();
        if x.len() != n || y.len() != n || z.len() != n {
            return Err(WavpolError::LengthMismatch {
                time: n,
                x: x.len(),
                y: y.len(),
                z: z.len(),
            });
        }
        Ok(Self { time, x, y, z })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// True when there are no samples.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Time stamps in seconds.
    pub fn time(&self) -> &'a [f64] {
        self.time
    }

    /// Channel `axis` (0 = x, 1 = y, 2 = z).
    pub fn channel(&self, axis: usize) -> &'a [f64] {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// True when all three channels are finite at `index`.
    pub fn is_finite_at(&self, index: usize) -> bool {
        self.x[index].is_finite() && self.y[index].is_finite() && self.z[index].is_finite()
    }

    /// Count of indices in `start..end` where all three channels are finite.
    pub fn finite_count(&self, start: usize, end: usize) -> usize {
        (start..end).filter(|&i| self.is_finite_at(i)).count()
    }
}
