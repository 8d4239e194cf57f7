//! Frequency-domain smoothing of spectral matrices.

use crate::spectral_matrix::SpectralMatrix;
use std::ops::RangeInclusive;

/// Hanning-shaped smoothing profile. Only the central `width` taps are used.
pub const KERNEL: [f64; 7] = [0.024, 0.093, 0.232, 0.301, 0.232, 0.093, 0.024];

/// The central `width` taps of [`KERNEL`].
pub fn kernel_taps(width: usize) -> &'static [f64] {
    let half = width.saturating_sub(1) / 2;
    let center = KERNEL.len() / 2;
    &KERNEL[center - half..=center + half]
}

/// Bins that have a full smoothing neighborhood in `num_bins` bins.
///
/// Empty when `width` exceeds `num_bins`.
pub fn interior(num_bins: usize, width: usize) -> RangeInclusive<usize> {
    let half = width.saturating_sub(1) / 2;
    if num_bins < 2 * half + 1 {
        #[allow(clippy::reversed_empty_ranges)]
        return 1..=0;
    }
    half..=num_bins - 1 - half
}

/// Convolve every matrix entry along frequency with the central `width`
/// kernel taps.
///
/// Bins outside [`interior`] have no full neighborhood and come back as
/// `None`.
///
/// The taps are not renormalized, so smoothed power is scaled by the sum of
/// [`kernel_taps`]: 0.765 at width 3, 0.999 at width 7.
pub fn smooth(matrices: &[SpectralMatrix], width: usize) -> Vec<Option<SpectralMatrix>> {
    let taps = kernel_taps(width);
    let half = taps.len() / 2;
    let valid = interior(matrices.len(), width);

    (0..matrices.len())
        .map(|k| {
            if !valid.contains(&k) {
                return None;
            }
            let smoothed = taps
                .iter()
                .zip(&matrices[k - half..=k + half])
                .fold(SpectralMatrix::zero(), |acc, (&w, m)| acc + *m * w);
            Some(smoothed)
        })
        .collect()
}
