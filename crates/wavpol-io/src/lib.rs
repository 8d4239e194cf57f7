//! I/O layer around the wavpol engine.
//!
//! This crate provides:
//!
//! - **Series input/output**: [`read_series`] and [`write_series`] for CSV,
//!   JSON, and three-channel WAV files holding `time, x, y, z`
//! - **Result export**: [`export_json`], [`export_grid_csv`], and
//!   [`export_grid_pgm`] for polarization spectrograms
//! - **Variable store adapter**: [`wavpol_variables`] reads a named vector
//!   variable from a [`VariableStore`] and registers the result grids as
//!   named spectrograms with display metadata
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wavpol_core::{WavpolConfig, WavpolAnalyzer};
//! use wavpol_io::{read_series, export_json};
//!
//! let data = read_series("field.csv")?;
//! let result = WavpolAnalyzer::new(WavpolConfig::default()).analyze(&data.as_series()?)?;
//! export_json(&result, "field_wavpol.json")?;
//! ```

mod export;
mod series;
mod store;

pub use export::{
    OverflowRecord, export_all_csv, export_grid_csv, export_grid_pgm, export_json,
    export_overflow_json, overflow_record,
};
pub use series::{
    SeriesData, SeriesFormat, read_csv_series, read_json_series, read_series, read_wav_series,
    write_csv_series, write_json_series, write_series, write_wav_series,
};
pub use store::{
    DisplayMeta, MemoryStore, Spectrogram, VariableStore, VectorVariable, display_meta,
    wavpol_variables,
};

/// Error types for wavpol I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// JSON encode/decode error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed CSV row.
    #[error("CSV line {line}: {message}")]
    Csv {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },

    /// Input that parses but cannot be analyzed.
    #[error("Unsupported input: {0}")]
    Unsupported(String),

    /// Error reported by the analysis engine.
    #[error("Analysis error: {0}")]
    Engine(#[from] wavpol_core::WavpolError),

    /// Named variable missing from the store.
    #[error("Variable not found: {0}")]
    MissingVariable(String),
}

/// Convenience result type for wavpol I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
