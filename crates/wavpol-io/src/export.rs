//! Export formats for polarization results.
//!
//! - JSON with every grid and an explicit `error_flag`
//! - CSV for one quantity, time on rows and frequency on columns
//! - PGM grayscale images for one quantity

use crate::store::display_meta;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use wavpol_core::{PolarizationSpectrogram, Quantity, WavpolError};

/// Decades of power shown in PGM images of the power grid.
const POWER_DECADES: f64 = 6.0;

#[derive(Serialize)]
struct ResultDocument<'a> {
    error_flag: bool,
    window_length: usize,
    stride: usize,
    smoothing_width: usize,
    bin_width: f64,
    timeline: &'a [f64],
    freqline: &'a [f64],
    powspec: &'a [Vec<f64>],
    degpol: &'a [Vec<f64>],
    waveangle: &'a [Vec<f64>],
    elliptict: &'a [Vec<f64>],
    helict: &'a [Vec<f64>],
    pspec3: [Vec<Vec<f64>>; 3],
}

/// Write every result grid to a JSON document.
///
/// NaN cells are written as `null`. `error_flag` is always `false` here;
/// see [`export_overflow_json`] for the aborted case.
pub fn export_json(result: &PolarizationSpectrogram, path: impl AsRef<Path>) -> Result<()> {
    let config = &result.config;
    let document = ResultDocument {
        error_flag: false,
        window_length: config.window_length(),
        stride: config.stride(),
        smoothing_width: config.smoothing_width(),
        bin_width: result.bin_width,
        timeline: &result.timeline,
        freqline: &result.freqline,
        powspec: &result.power,
        degpol: &result.degree_of_polarization,
        waveangle: &result.wave_normal_angle,
        elliptict: &result.ellipticity,
        helict: &result.helicity,
        pspec3: [
            result.axis_power_grid(0),
            result.axis_power_grid(1),
            result.axis_power_grid(2),
        ],
    };

    let mut file = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut file, &document)?;
    file.flush()?;
    Ok(())
}

/// Record written in place of results when the analysis aborts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverflowRecord {
    /// Always `true`.
    pub error_flag: bool,
    /// Human-readable reason.
    pub message: String,
    /// Discontinuities found, for a batch overflow.
    pub discontinuities: Option<usize>,
    /// Ceiling that was exceeded, for a batch overflow.
    pub limit: Option<usize>,
}

/// Describe an aborted analysis.
pub fn overflow_record(error: &WavpolError) -> OverflowRecord {
    let (discontinuities, limit) = match *error {
        WavpolError::BatchOverflow {
            discontinuities,
            limit,
        } => (Some(discontinuities), Some(limit)),
        _ => (None, None),
    };
    OverflowRecord {
        error_flag: true,
        message: error.to_string(),
        discontinuities,
        limit,
    }
}

/// Write an [`OverflowRecord`] as JSON.
pub fn export_overflow_json(record: &OverflowRecord, path: impl AsRef<Path>) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut file, record)?;
    file.flush()?;
    Ok(())
}

/// Export one quantity as CSV.
///
/// First row holds the frequency labels, first column the window times.
/// NaN cells are written as `nan`.
pub fn export_grid_csv(
    result: &PolarizationSpectrogram,
    quantity: Quantity,
    path: impl AsRef<Path>,
) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);

    write!(file, "time_s")?;
    for freq in &result.freqline {
        write!(file, ",{freq:.6}")?;
    }
    writeln!(file)?;

    for (time, row) in result.timeline.iter().zip(result.grid(quantity)) {
        write!(file, "{time:.6}")?;
        for &value in row {
            if value.is_nan() {
                write!(file, ",nan")?;
            } else {
                write!(file, ",{value:e}")?;
            }
        }
        writeln!(file)?;
    }

    file.flush()?;
    Ok(())
}

/// Export every quantity as `<dir>/<prefix>_<quantity>.csv`.
///
/// Returns the written paths.
pub fn export_all_csv(
    result: &PolarizationSpectrogram,
    dir: impl AsRef<Path>,
    prefix: &str,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    Quantity::ALL
        .iter()
        .map(|&q| -> Result<PathBuf> {
            let path = dir.join(format!("{prefix}_{}.csv", q.name()));
            export_grid_csv(result, q, &path)?;
            Ok(path)
        })
        .collect()
}

/// Export one quantity as a PGM grayscale image.
///
/// Time runs along X, frequency along Y (low frequencies at the bottom).
/// Bounded quantities use their natural range; power is shown over six
/// decades below its maximum. NaN cells are black.
pub fn export_grid_pgm(
    result: &PolarizationSpectrogram,
    quantity: Quantity,
    path: impl AsRef<Path>,
) -> Result<()> {
    let width = result.num_frames();
    let height = result.num_bins();
    if width == 0 || height == 0 {
        return Err(Error::Unsupported("cannot render an empty grid".into()));
    }

    let grid = result.grid(quantity);
    let meta = display_meta(quantity);
    let scale: Box<dyn Fn(f64) -> f64> = if meta.z_log {
        let max = grid
            .iter()
            .flatten()
            .filter(|v| v.is_finite() && **v > 0.0)
            .fold(f64::NEG_INFINITY, |a, &b| a.max(b));
        let top = max.log10();
        Box::new(move |v| (v.log10() - (top - POWER_DECADES)) / POWER_DECADES)
    } else {
        let (lo, hi) = meta.z_range.unwrap_or((0.0, 1.0));
        Box::new(move |v| (v - lo) / (hi - lo))
    };

    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "P2")?;
    writeln!(file, "# wavpol {} export", quantity.name())?;
    writeln!(file, "{width} {height}")?;
    writeln!(file, "255")?;

    for bin in (0..height).rev() {
        let row: Vec<String> = (0..width)
            .map(|frame| pixel(scale(grid[frame][bin])).to_string())
            .collect();
        writeln!(file, "{}", row.join(" "))?;
    }

    file.flush()?;
    Ok(())
}

/// Gray level for a normalized value; NaN maps to black.
fn pixel(normalized: f64) -> u8 {
    if normalized.is_nan() {
        0
    } else {
        (normalized.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}
