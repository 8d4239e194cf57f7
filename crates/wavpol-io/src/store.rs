//! Named-variable store adapter.
//!
//! Analysis pipelines often keep series in a store keyed by variable name.
//! [`wavpol_variables`] reads one `(time, N×3)` vector variable, runs the
//! analyzer, and registers each result grid as a named spectrogram:
//!
//! | variable            | contents                         |
//! |---------------------|----------------------------------|
//! | `<name>_powspec`    | total power spectral density     |
//! | `<name>_degpol`     | degree of polarization           |
//! | `<name>_waveangle`  | wavenormal angle (radians)       |
//! | `<name>_elliptict`  | signed ellipticity               |
//! | `<name>_helict`     | helicity                         |
//! | `<name>_pspec3_x/y/z` | per-axis power spectral density |

use std::collections::BTreeMap;
use std::f64::consts::FRAC_PI_2;

use serde::Serialize;
use wavpol_core::{PolarizationSpectrogram, Quantity, WavpolAnalyzer, WavpolConfig};

use crate::{Error, Result, SeriesData};

const AXIS_SUFFIXES: [&str; 3] = ["x", "y", "z"];

/// Plot hints attached to a stored spectrogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayMeta {
    /// Label for the frequency axis.
    pub y_label: String,
    /// Label for the color axis.
    pub z_label: String,
    /// Plot the frequency axis logarithmically.
    pub y_log: bool,
    /// Plot the color axis logarithmically.
    pub z_log: bool,
    /// Fixed color range, or `None` to autoscale.
    pub z_range: Option<(f64, f64)>,
}

impl DisplayMeta {
    fn new(z_label: &str, z_log: bool, z_range: Option<(f64, f64)>) -> Self {
        Self {
            y_label: "Frequency (Hz)".to_string(),
            z_label: z_label.to_string(),
            y_log: true,
            z_log,
            z_range,
        }
    }
}

/// Display hints for one result quantity.
pub fn display_meta(quantity: Quantity) -> DisplayMeta {
    match quantity {
        Quantity::Power => DisplayMeta::new("Power (units²/Hz)", true, None),
        Quantity::DegreeOfPolarization => {
            DisplayMeta::new("Degree of polarization", false, Some((0.0, 1.0)))
        }
        Quantity::WaveNormalAngle => {
            DisplayMeta::new("Wave normal angle (rad)", false, Some((0.0, FRAC_PI_2)))
        }
        Quantity::Ellipticity => DisplayMeta::new("Ellipticity", false, Some((-1.0, 1.0))),
        Quantity::Helicity => DisplayMeta::new("Helicity", false, Some((0.0, 1.0))),
    }
}

/// A `(time, N×3)` variable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VectorVariable {
    /// Sample times in seconds.
    pub time: Vec<f64>,
    /// One `[x, y, z]` row per sample.
    pub values: Vec<[f64; 3]>,
}

/// A `(time, values[time][freq], freq)` variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    /// Row times in seconds.
    pub time: Vec<f64>,
    /// Column frequencies in Hz.
    pub freq: Vec<f64>,
    /// Values indexed `[row][column]`.
    pub values: Vec<Vec<f64>>,
    /// Plot hints.
    pub meta: DisplayMeta,
}

/// Storage for named variables.
pub trait VariableStore {
    /// Look up a vector variable.
    fn get_vector(&self, name: &str) -> Option<&VectorVariable>;

    /// Register (or replace) a spectrogram variable.
    fn store_spectrogram(&mut self, name: &str, spectrogram: Spectrogram);

    /// Names of every stored variable, sorted.
    fn names(&self) -> Vec<String>;
}

/// In-memory [`VariableStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    vectors: BTreeMap<String, VectorVariable>,
    spectrograms: BTreeMap<String, Spectrogram>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a vector variable.
    pub fn insert_vector(&mut self, name: impl Into<String>, variable: VectorVariable) {
        self.vectors.insert(name.into(), variable);
    }

    /// Look up a spectrogram variable.
    pub fn spectrogram(&self, name: &str) -> Option<&Spectrogram> {
        self.spectrograms.get(name)
    }
}

impl VariableStore for MemoryStore {
    fn get_vector(&self, name: &str) -> Option<&VectorVariable> {
        self.vectors.get(name)
    }

    fn store_spectrogram(&mut self, name: &str, spectrogram: Spectrogram) {
        self.spectrograms.insert(name.to_string(), spectrogram);
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .vectors
            .keys()
            .chain(self.spectrograms.keys())
            .cloned()
            .collect();
        names.sort();
        names
    }
}

/// Analyze the vector variable `name` and store the result grids.
///
/// Returns the names of the stored variables. On a batch overflow nothing
/// is stored and the engine error is returned.
pub fn wavpol_variables<S: VariableStore + ?Sized>(
    store: &mut S,
    name: &str,
    config: WavpolConfig,
) -> Result<Vec<String>> {
    let analysis = {
        let variable = store
            .get_vector(name)
            .ok_or_else(|| Error::MissingVariable(name.to_string()))?;
        let data = SeriesData::from_rows(&variable.time, &variable.values)?;
        let series = data.as_series()?;
        WavpolAnalyzer::new(config).analyze(&series)
    };

    let result = match analysis {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(variable = name, error = %e, "polarization analysis aborted");
            return Err(e.into());
        }
    };

    let mut stored = Vec::with_capacity(Quantity::ALL.len() + AXIS_SUFFIXES.len());
    for quantity in Quantity::ALL {
        let var_name = format!("{name}_{}", quantity.name());
        store.store_spectrogram(
            &var_name,
            spectrogram_of(&result, result.grid(quantity).to_vec(), display_meta(quantity)),
        );
        stored.push(var_name);
    }

    for (axis, suffix) in AXIS_SUFFIXES.iter().enumerate() {
        let var_name = format!("{name}_pspec3_{suffix}");
        let meta = DisplayMeta::new(&format!("Power {suffix} (units²/Hz)"), true, None);
        store.store_spectrogram(
            &var_name,
            spectrogram_of(&result, result.axis_power_grid(axis), meta),
        );
        stored.push(var_name);
    }

    tracing::info!(
        variable = name,
        rows = result.num_frames(),
        bins = result.num_bins(),
        "stored polarization spectrograms"
    );

    Ok(stored)
}

fn spectrogram_of(
    result: &PolarizationSpectrogram,
    values: Vec<Vec<f64>>,
    meta: DisplayMeta,
) -> Spectrogram {
    Spectrogram {
        time: result.timeline.clone(),
        freq: result.freqline.clone(),
        values,
        meta,
    }
}
