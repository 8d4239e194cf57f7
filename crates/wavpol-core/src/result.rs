//! Time × frequency polarization grids and their assembly.

use crate::config::WavpolConfig;

/// Scalar quantities carried on the time × frequency grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    /// Power spectral density summed over axes.
    Power,
    /// Samson–Olson degree of polarization.
    DegreeOfPolarization,
    /// Wavenormal angle from the z axis, radians.
    WaveNormalAngle,
    /// Signed x–y plane ellipticity.
    Ellipticity,
    /// Three-component helicity.
    Helicity,
}

impl Quantity {
    /// All quantities in output order.
    pub const ALL: [Quantity; 5] = [
        Quantity::Power,
        Quantity::DegreeOfPolarization,
        Quantity::WaveNormalAngle,
        Quantity::Ellipticity,
        Quantity::Helicity,
    ];

    /// Short identifier used for file names and variable suffixes.
    pub fn name(&self) -> &'static str {
        match self {
            Quantity::Power => "powspec",
            Quantity::DegreeOfPolarization => "degpol",
            Quantity::WaveNormalAngle => "waveangle",
            Quantity::Ellipticity => "elliptict",
            Quantity::Helicity => "helict",
        }
    }

    /// Parse a quantity from its identifier.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|q| q.name() == name)
    }
}

/// Output of one polarization analysis.
///
/// Every grid is indexed `[frame][bin]` with `num_frames()` rows of
/// `num_bins()` values. Cells that could not be computed are NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct PolarizationSpectrogram {
    /// Center time of each analysis window, seconds.
    pub timeline: Vec<f64>,
    /// Frequency of each bin, Hz.
    pub freqline: Vec<f64>,
    /// Power spectral density.
    pub power: Vec<Vec<f64>>,
    /// Degree of polarization.
    pub degree_of_polarization: Vec<Vec<f64>>,
    /// Wavenormal angle, radians in `[0, π/2]`.
    pub wave_normal_angle: Vec<Vec<f64>>,
    /// Signed ellipticity.
    pub ellipticity: Vec<Vec<f64>>,
    /// Helicity.
    pub helicity: Vec<Vec<f64>>,
    /// Power spectral density per axis `[frame][bin][axis]`.
    pub axis_power: Vec<Vec<[f64; 3]>>,
    /// Parameters the grids were computed with.
    pub config: WavpolConfig,
    /// Frequency bin width, Hz.
    pub bin_width: f64,
}

impl PolarizationSpectrogram {
    /// Number of time rows.
    pub fn num_frames(&self) -> usize {
        self.timeline.len()
    }

    /// Number of frequency bins per row.
    pub fn num_bins(&self) -> usize {
        self.freqline.len()
    }

    /// True when no window was analyzed.
    pub fn is_empty(&self) -> bool {
        self.timeline.is_empty()
    }

    /// Get frequency in Hz for a given bin index
    pub fn bin_to_freq(&self, bin: usize) -> f64 {
        bin as f64 * self.bin_width
    }

    /// Bin nearest to `freq` Hz.
    pub fn freq_to_bin(&self, freq: f64) -> usize {
        let bin = (freq / self.bin_width).round().max(0.0) as usize;
        bin.min(self.num_bins().saturating_sub(1))
    }

    /// Grid for a scalar quantity.
    pub fn grid(&self, quantity: Quantity) -> &[Vec<f64>] {
        match quantity {
            Quantity::Power => &self.power,
            Quantity::DegreeOfPolarization => &self.degree_of_polarization,
            Quantity::WaveNormalAngle => &self.wave_normal_angle,
            Quantity::Ellipticity => &self.ellipticity,
            Quantity::Helicity => &self.helicity,
        }
    }

    /// Value at a frame and bin.
    ///
    /// Returns None if out of bounds
    pub fn get(&self, quantity: Quantity, frame: usize, bin: usize) -> Option<f64> {
        self.grid(quantity)
            .get(frame)
            .and_then(|row| row.get(bin))
            .copied()
    }

    /// Bin with the largest finite power in `frame`.
    pub fn peak_bin(&self, frame: usize) -> Option<usize> {
        self.power.get(frame).and_then(|row| {
            row.iter()
                .enumerate()
                .filter(|(_, p)| p.is_finite())
                .max_by(|a, b| a.1.total_cmp(b.1))
                .map(|(i, _)| i)
        })
    }

    /// Per-axis power grid for one axis (0 = x, 1 = y, 2 = z).
    pub fn axis_power_grid(&self, axis: usize) -> Vec<Vec<f64>> {
        self.axis_power
            .iter()
            .map(|row| row.iter().map(|p| p[axis]).collect())
            .collect()
    }
}

/// Results for one analysis window.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRow {
    /// Window center time.
    pub time: f64,
    /// Power per bin.
    pub power: Vec<f64>,
    /// Degree of polarization per bin.
    pub degree_of_polarization: Vec<f64>,
    /// Wavenormal angle per bin.
    pub wave_normal_angle: Vec<f64>,
    /// Ellipticity per bin.
    pub ellipticity: Vec<f64>,
    /// Helicity per bin.
    pub helicity: Vec<f64>,
    /// Per-axis power per bin.
    pub axis_power: Vec<[f64; 3]>,
}

impl FrameRow {
    /// A row of `num_bins` NaN cells.
    pub fn nan(time: f64, num_bins: usize) -> Self {
        Self {
            time,
            power: vec![f64::NAN; num_bins],
            degree_of_polarization: vec![f64::NAN; num_bins],
            wave_normal_angle: vec![f64::NAN; num_bins],
            ellipticity: vec![f64::NAN; num_bins],
            helicity: vec![f64::NAN; num_bins],
            axis_power: vec![[f64::NAN; 3]; num_bins],
        }
    }
}

/// Collects frame rows into dense grids.
#[derive(Debug)]
pub struct ResultAssembler {
    config: WavpolConfig,
    out: PolarizationSpectrogram,
}

impl ResultAssembler {
    /// Create an assembler for `capacity` rows.
    pub fn new(config: WavpolConfig, capacity: usize) -> Self {
        Self {
            config,
            out: PolarizationSpectrogram {
                timeline: Vec::with_capacity(capacity),
                freqline: Vec::new(),
                power: Vec::with_capacity(capacity),
                degree_of_polarization: Vec::with_capacity(capacity),
                wave_normal_angle: Vec::with_capacity(capacity),
                ellipticity: Vec::with_capacity(capacity),
                helicity: Vec::with_capacity(capacity),
                axis_power: Vec::with_capacity(capacity),
                config,
                bin_width: f64::NAN,
            },
        }
    }

    /// Append one row. Rows of the wrong width are replaced by NaN rows so
    /// every grid keeps a uniform shape.
    pub fn push(&mut self, row: FrameRow) {
        let bins = self.config.num_bins();
        let row = if row.power.len() == bins && row.axis_power.len() == bins {
            row
        } else {
            FrameRow::nan(row.time, bins)
        };
        self.out.timeline.push(row.time);
        self.out.power.push(row.power);
        self.out.degree_of_polarization.push(row.degree_of_polarization);
        self.out.wave_normal_angle.push(row.wave_normal_angle);
        self.out.ellipticity.push(row.ellipticity);
        self.out.helicity.push(row.helicity);
        self.out.axis_power.push(row.axis_power);
    }

    /// Finish with the shared frequency axis `f[k] = k · bin_width`.
    pub fn finish(mut self, bin_width: f64) -> PolarizationSpectrogram {
        self.out.bin_width = bin_width;
        self.out.freqline = (0..self.config.num_bins())
            .map(|k| k as f64 * bin_width)
            .collect();
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(time: f64, bins: usize, value: f64) -> FrameRow {
        FrameRow {
            time,
            power: vec![value; bins],
            degree_of_polarization: vec![value; bins],
            wave_normal_angle: vec![value; bins],
            ellipticity: vec![value; bins],
            helicity: vec![value; bins],
            axis_power: vec![[value; 3]; bins],
        }
    }

    #[test]
    fn test_assemble_shapes() {
        let config = WavpolConfig::with_window_length(16).unwrap();
        let mut assembler = ResultAssembler::new(config, 2);
        assembler.push(row(0.0, 8, 1.0));
        assembler.push(row(1.0, 8, 2.0));
        let out = assembler.finish(0.5);
        assert_eq!(out.num_frames(), 2);
        assert_eq!(out.num_bins(), 8);
        assert_eq!(out.freqline[3], 1.5);
        assert_eq!(out.get(Quantity::Helicity, 1, 7), Some(2.0));
        assert_eq!(out.get(Quantity::Helicity, 2, 0), None);
    }

    #[test]
    fn test_wrong_width_becomes_nan() {
        let config = WavpolConfig::with_window_length(16).unwrap();
        let mut assembler = ResultAssembler::new(config, 1);
        assembler.push(row(0.0, 3, 1.0));
        let out = assembler.finish(1.0);
        assert_eq!(out.power[0].len(), 8);
        assert!(out.power[0].iter().all(|p| p.is_nan()));
    }

    #[test]
    fn test_peak_bin_ignores_nan() {
        let config = WavpolConfig::with_window_length(16).unwrap();
        let mut assembler = ResultAssembler::new(config, 1);
        let mut r = FrameRow::nan(0.0, 8);
        r.power[2] = 1.0;
        r.power[5] = 3.0;
        assembler.push(r);
        let out = assembler.finish(1.0);
        assert_eq!(out.peak_bin(0), Some(5));
        assert_eq!(out.freq_to_bin(4.6), 5);
        assert_eq!(out.freq_to_bin(100.0), 7);
    }

    #[test]
    fn test_quantity_names_roundtrip() {
        for q in Quantity::ALL {
            assert_eq!(Quantity::from_name(q.name()), Some(q));
        }
        assert_eq!(Quantity::from_name("bogus"), None);
    }
}
