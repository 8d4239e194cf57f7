//! Shared CLI helpers used across multiple commands.

use clap::Args;
use wavpol_config::{AnalysisPreset, resolve_preset};
use wavpol_core::WavpolConfig;

/// Analysis parameter flags shared by commands that build a configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct AnalysisParams {
    /// Preset name or path to a preset TOML file
    #[arg(long)]
    pub preset: Option<String>,

    /// FFT window length in samples (even, at least 8)
    #[arg(long)]
    pub window_length: Option<usize>,

    /// Window advance in samples (default: half the window)
    #[arg(long)]
    pub stride: Option<usize>,

    /// Frequency smoothing width in bins (odd, 1-7)
    #[arg(long)]
    pub smoothing_width: Option<usize>,
}

impl AnalysisParams {
    /// Start from the named preset (or defaults) and apply the flag overrides.
    ///
    /// Changing the window length without a stride resets the stride to half
    /// the new window.
    pub fn to_preset(&self, name: &str) -> anyhow::Result<AnalysisPreset> {
        let mut preset = match &self.preset {
            Some(preset_name) => resolve_preset(preset_name)?,
            None => AnalysisPreset::new(name),
        };

        if let Some(window_length) = self.window_length {
            preset.window_length = window_length;
            preset.stride = None;
        }
        if let Some(stride) = self.stride {
            preset.stride = Some(stride);
        }
        if let Some(smoothing_width) = self.smoothing_width {
            preset.smoothing_width = smoothing_width;
        }

        Ok(preset)
    }

    /// Validated analyzer configuration.
    pub fn to_config(&self) -> anyhow::Result<WavpolConfig> {
        Ok(self.to_preset("command line")?.to_config()?)
    }
}

/// Median of the finite values, if any.
pub fn finite_median<'a>(values: impl IntoIterator<Item = &'a f64>) -> Option<f64> {
    let mut finite: Vec<f64> = values.into_iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    finite.sort_by(f64::total_cmp);
    let mid = finite.len() / 2;
    Some(if finite.len() % 2 == 0 {
        0.5 * (finite[mid - 1] + finite[mid])
    } else {
        finite[mid]
    })
}
