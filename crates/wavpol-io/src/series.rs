//! Three-component series files: CSV, JSON, and WAV.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use wavpol_core::TimeSeries;
use wavpol_core::batch::nominal_period;

/// Owned `time, x, y, z` samples.
///
/// Missing samples are NaN in memory, `null` in JSON, and `nan` (or an
/// empty field) in CSV.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesData {
    /// Sample times in seconds.
    #[serde(deserialize_with = "null_as_nan")]
    pub time: Vec<f64>,
    /// First component.
    #[serde(deserialize_with = "null_as_nan")]
    pub x: Vec<f64>,
    /// Second component.
    #[serde(deserialize_with = "null_as_nan")]
    pub y: Vec<f64>,
    /// Third component.
    #[serde(deserialize_with = "null_as_nan")]
    pub z: Vec<f64>,
}

fn null_as_nan<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<f64>, D::Error> {
    let values: Vec<Option<f64>> = Vec::deserialize(deserializer)?;
    Ok(values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

impl SeriesData {
    /// Build from columns of equal length.
    pub fn new(time: Vec<f64>, x: Vec<f64>, y: Vec<f64>, z: Vec<f64>) -> Result<Self> {
        let data = Self { time, x, y, z };
        data.as_series()?;
        Ok(data)
    }

    /// Build from a time axis and `N×3` rows.
    pub fn from_rows(time: &[f64], rows: &[[f64; 3]]) -> Result<Self> {
        Self::new(
            time.to_vec(),
            rows.iter().map(|r| r[0]).collect(),
            rows.iter().map(|r| r[1]).collect(),
            rows.iter().map(|r| r[2]).collect(),
        )
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// True if there are no samples.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Borrowed view for the analyzer.
    pub fn as_series(&self) -> Result<TimeSeries<'_>> {
        Ok(TimeSeries::new(&self.time, &self.x, &self.y, &self.z)?)
    }

    /// First and last sample time.
    pub fn time_span(&self) -> Option<(f64, f64)> {
        Some((*self.time.first()?, *self.time.last()?))
    }

    /// Count of non-finite samples per component.
    pub fn nan_counts(&self) -> [usize; 3] {
        let count = |v: &[f64]| v.iter().filter(|s| !s.is_finite()).count();
        [count(&self.x), count(&self.y), count(&self.z)]
    }
}

/// File formats understood by [`read_series`] and [`write_series`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesFormat {
    /// `time,x,y,z` text rows.
    Csv,
    /// `{"time": [...], "x": [...], "y": [...], "z": [...]}`.
    Json,
    /// Three or more channel WAV, time from the sample rate.
    Wav,
}

impl SeriesFormat {
    /// Format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" | "txt" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "wav" => Some(Self::Wav),
            _ => None,
        }
    }
}

fn format_of(path: &Path) -> Result<SeriesFormat> {
    SeriesFormat::from_path(path).ok_or_else(|| {
        Error::Unsupported(format!(
            "cannot tell the format of '{}' (expected .csv, .json, or .wav)",
            path.display()
        ))
    })
}

/// Read a series, choosing the reader by file extension.
pub fn read_series<P: AsRef<Path>>(path: P) -> Result<SeriesData> {
    let path = path.as_ref();
    match format_of(path)? {
        SeriesFormat::Csv => read_csv_series(path),
        SeriesFormat::Json => read_json_series(path),
        SeriesFormat::Wav => read_wav_series(path),
    }
}

/// Write a series, choosing the writer by file extension.
///
/// WAV output needs a regular cadence; the sample rate is taken from the
/// first time step.
pub fn write_series<P: AsRef<Path>>(path: P, data: &SeriesData) -> Result<()> {
    let path = path.as_ref();
    match format_of(path)? {
        SeriesFormat::Csv => write_csv_series(path, data),
        SeriesFormat::Json => write_json_series(path, data),
        SeriesFormat::Wav => {
            let rate = nominal_period(&data.time)
                .map(|p| 1.0 / p)
                .filter(|r| r.is_finite() && *r >= 1.0)
                .ok_or_else(|| {
                    Error::Unsupported("WAV output needs a sample rate of at least 1 Hz".into())
                })?;
            write_wav_series(path, data, rate.round() as u32)
        }
    }
}

// ============================================================================
// CSV
// ============================================================================

/// Read `time,x,y,z` rows.
///
/// Blank lines and lines starting with `#` are skipped. A first row that
/// does not parse as numbers is taken as a header. Extra columns are
/// ignored. An empty field or `nan` is a missing sample.
pub fn read_csv_series<P: AsRef<Path>>(path: P) -> Result<SeriesData> {
    parse_csv(BufReader::new(File::open(path)?))
}

fn parse_csv<R: BufRead>(reader: R) -> Result<SeriesData> {
    let mut data = SeriesData::default();
    let mut header_allowed = true;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if fields.len() < 4 {
            return Err(Error::Csv {
                line: index + 1,
                message: format!("expected 4 columns, found {}", fields.len()),
            });
        }

        let values: Option<Vec<f64>> = fields[..4].iter().map(|f| parse_field(f)).collect();
        match values {
            Some(v) => {
                data.time.push(v[0]);
                data.x.push(v[1]);
                data.y.push(v[2]);
                data.z.push(v[3]);
            }
            None if header_allowed => {}
            None => {
                return Err(Error::Csv {
                    line: index + 1,
                    message: format!("not a number in '{trimmed}'"),
                });
            }
        }
        header_allowed = false;
    }

    Ok(data)
}

fn parse_field(field: &str) -> Option<f64> {
    if field.is_empty() || field.eq_ignore_ascii_case("nan") {
        return Some(f64::NAN);
    }
    field.parse().ok()
}

/// Write `time,x,y,z` rows with a header.
pub fn write_csv_series<P: AsRef<Path>>(path: P, data: &SeriesData) -> Result<()> {
    data.as_series()?;
    let mut file = BufWriter::new(File::create(path)?);

    writeln!(file, "time,x,y,z")?;
    for i in 0..data.len() {
        writeln!(
            file,
            "{},{},{},{}",
            data.time[i], data.x[i], data.y[i], data.z[i]
        )?;
    }

    file.flush()?;
    Ok(())
}

// ============================================================================
// JSON
// ============================================================================

/// Read a JSON object with `time`, `x`, `y`, and `z` arrays.
pub fn read_json_series<P: AsRef<Path>>(path: P) -> Result<SeriesData> {
    let data: SeriesData = serde_json::from_reader(BufReader::new(File::open(path)?))?;
    data.as_series()?;
    Ok(data)
}

/// Write a JSON object with `time`, `x`, `y`, and `z` arrays.
pub fn write_json_series<P: AsRef<Path>>(path: P, data: &SeriesData) -> Result<()> {
    data.as_series()?;
    let mut file = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut file, data)?;
    file.flush()?;
    Ok(())
}

// ============================================================================
// WAV
// ============================================================================

/// Read the first three channels of a WAV file.
///
/// Sample `i` is at time `i / sample_rate`. Integer samples are scaled to
/// [-1, 1).
pub fn read_wav_series<P: AsRef<Path>>(path: P) -> Result<SeriesData> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channels < 3 {
        return Err(Error::Unsupported(format!(
            "WAV file has {channels} channel(s), need at least 3"
        )));
    }

    let samples: Vec<f64> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = f64::from(1u32 << (spec.bits_per_sample - 1));
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| f64::from(v) / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    let frames = samples.len() / channels;
    let rate = f64::from(spec.sample_rate);
    let mut data = SeriesData {
        time: (0..frames).map(|i| i as f64 / rate).collect(),
        x: Vec::with_capacity(frames),
        y: Vec::with_capacity(frames),
        z: Vec::with_capacity(frames),
    };
    for frame in samples.chunks_exact(channels) {
        data.x.push(frame[0]);
        data.y.push(frame[1]);
        data.z.push(frame[2]);
    }

    Ok(data)
}

/// Write a 3-channel 32-bit float WAV file.
///
/// The time column is not stored; readers reconstruct it from `sample_rate`.
pub fn write_wav_series<P: AsRef<Path>>(
    path: P,
    data: &SeriesData,
    sample_rate: u32,
) -> Result<()> {
    data.as_series()?;
    let spec = hound::WavSpec {
        channels: 3,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec)?;

    for i in 0..data.len() {
        writer.write_sample(data.x[i] as f32)?;
        writer.write_sample(data.y[i] as f32)?;
        writer.write_sample(data.z[i] as f32)?;
    }

    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_data() -> SeriesData {
        SeriesData::new(
            vec![0.0, 0.5, 1.0, 1.5],
            vec![1.0, -1.0, 0.25, f64::NAN],
            vec![0.0, 2.0, -0.5, 3.0],
            vec![0.125, 0.0, 0.0, -1.0],
        )
        .unwrap()
    }

    fn same(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len()
            && a.iter()
                .zip(b)
                .all(|(p, q)| p == q || (p.is_nan() && q.is_nan()))
    }

    #[test]
    fn test_new_rejects_unequal_lengths() {
        let err = SeriesData::new(vec![0.0, 1.0], vec![0.0], vec![0.0, 1.0], vec![0.0, 1.0])
            .unwrap_err();
        assert!(matches!(err, Error::Engine(_)));
    }

    #[test]
    fn test_from_rows() {
        let data = SeriesData::from_rows(&[0.0, 1.0], &[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(data.x, vec![1.0, 4.0]);
        assert_eq!(data.z, vec![3.0, 6.0]);
        assert_eq!(data.time_span(), Some((0.0, 1.0)));
    }

    #[test]
    fn test_nan_counts() {
        assert_eq!(sample_data().nan_counts(), [1, 0, 0]);
    }

    #[test]
    fn test_parse_csv_header_comments_and_missing() {
        let text = "# exported field\ntime, x, y, z\n0,1,2,3\n\n1,nan,,6\n2,7,8,9,extra\n";
        let data = parse_csv(text.as_bytes()).unwrap();
        assert_eq!(data.time, vec![0.0, 1.0, 2.0]);
        assert!(data.x[1].is_nan());
        assert!(data.y[1].is_nan());
        assert_eq!(data.z, vec![3.0, 6.0, 9.0]);
    }

    #[test]
    fn test_parse_csv_reports_line() {
        let text = "time,x,y,z\n0,1,2,3\n1,oops,2,3\n";
        match parse_csv(text.as_bytes()) {
            Err(Error::Csv { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected CSV error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_csv_short_row() {
        let err = parse_csv("0,1,2\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Csv { line: 1, .. }));
    }

    #[test]
    fn test_csv_file_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("field.csv");
        let data = sample_data();
        write_series(&path, &data).unwrap();
        let back = read_series(&path).unwrap();
        assert!(same(&back.time, &data.time));
        assert!(same(&back.x, &data.x));
        assert!(same(&back.z, &data.z));
    }

    #[test]
    fn test_json_nan_is_null() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("field.json");
        let data = sample_data();
        write_json_series(&path, &data).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("null"));

        let back = read_json_series(&path).unwrap();
        assert!(same(&back.x, &data.x));
        assert!(same(&back.y, &data.y));
    }

    #[test]
    fn test_json_length_mismatch() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"time":[0,1],"x":[0],"y":[0,1],"z":[0,1]}"#).unwrap();
        assert!(matches!(read_json_series(&path), Err(Error::Engine(_))));
    }

    #[test]
    fn test_wav_time_from_sample_rate() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("field.wav");
        let data = sample_data();
        write_series(&path, &data).unwrap();

        let back = read_wav_series(&path).unwrap();
        assert_eq!(back.time, vec![0.0, 0.5, 1.0, 1.5]);
        assert_eq!(back.y, data.y);
        assert!(back.x[3].is_nan());
    }

    #[test]
    fn test_wav_needs_three_channels() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mono.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        writer.write_sample(0i16).unwrap();
        writer.finalize().unwrap();

        assert!(matches!(read_wav_series(&path), Err(Error::Unsupported(_))));
    }

    #[test]
    fn test_unknown_extension() {
        assert!(matches!(read_series("field.cdf"), Err(Error::Unsupported(_))));
        assert_eq!(SeriesFormat::from_path(Path::new("A.WAV")), Some(SeriesFormat::Wav));
    }
}
