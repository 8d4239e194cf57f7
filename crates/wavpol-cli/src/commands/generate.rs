//! Synthetic test series generation command.

use clap::{Args, ValueEnum};
use std::f64::consts::PI;
use std::path::PathBuf;
use wavpol_io::{SeriesData, SeriesFormat, write_series};

/// Kinds of synthetic field
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SignalKind {
    /// Right-handed circular rotation in the x-y plane
    #[default]
    Circular,
    /// In-phase x and y oscillation (flat ellipse)
    Linear,
    /// Independent uniform noise on each axis
    Noise,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Output file (.csv, .json, or .wav)
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Signal kind
    #[arg(long, value_enum, default_value_t = SignalKind::Circular)]
    kind: SignalKind,

    /// Wave frequency in Hz
    #[arg(long, default_value = "1.0")]
    freq: f64,

    /// Sample rate in Hz
    #[arg(long, default_value = "32.0")]
    sample_rate: f64,

    /// Duration in seconds
    #[arg(long, default_value = "64.0")]
    duration: f64,

    /// Amplitude
    #[arg(long, default_value = "1.0")]
    amplitude: f64,

    /// Insert a data gap at this time (seconds)
    #[arg(long)]
    gap_at: Option<f64>,

    /// Length of the inserted gap in seconds
    #[arg(long, default_value = "10.0")]
    gap_length: f64,
}

/// Run the generate command.
pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    if !(args.sample_rate > 0.0 && args.duration > 0.0) {
        anyhow::bail!("sample rate and duration must be positive");
    }
    if args.gap_at.is_some()
        && SeriesFormat::from_path(&args.output) == Some(SeriesFormat::Wav)
    {
        anyhow::bail!("WAV files have no time column; write .csv or .json to keep a gap");
    }

    let data = synthesize(&args);
    write_series(&args.output, &data)?;

    println!(
        "Wrote {} samples of {:?} signal to {}",
        data.len(),
        args.kind,
        args.output.display()
    );
    Ok(())
}

fn synthesize(args: &GenerateArgs) -> SeriesData {
    let n = (args.duration * args.sample_rate).round() as usize;
    let a = args.amplitude;
    let w = 2.0 * PI * args.freq;
    let phase = |i: usize| w * i as f64 / args.sample_rate;

    let (x, y, z): (Vec<f64>, Vec<f64>, Vec<f64>) = match args.kind {
        SignalKind::Circular => (
            (0..n).map(|i| a * phase(i).cos()).collect(),
            (0..n).map(|i| a * phase(i).sin()).collect(),
            vec![0.0; n],
        ),
        SignalKind::Linear => (
            (0..n).map(|i| a * phase(i).cos()).collect(),
            (0..n).map(|i| 0.5 * a * phase(i).cos()).collect(),
            vec![0.0; n],
        ),
        SignalKind::Noise => {
            let mut rng = XorShift::new(0x1234_5678);
            let mut noise = || (0..n).map(|_| a * rng.next_bipolar()).collect::<Vec<f64>>();
            (noise(), noise(), noise())
        }
    };

    let time = (0..n)
        .map(|i| {
            let t = i as f64 / args.sample_rate;
            match args.gap_at {
                Some(gap) if t >= gap => t + args.gap_length,
                _ => t,
            }
        })
        .collect();

    SeriesData { time, x, y, z }
}

/// Simple PRNG for noise generation (xorshift32)
struct XorShift(u32);

impl XorShift {
    fn new(seed: u32) -> Self {
        Self(seed.max(1))
    }

    /// Uniform value in [-1, 1].
    fn next_bipolar(&mut self) -> f64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        f64::from(x) / f64::from(u32::MAX) * 2.0 - 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(kind: SignalKind, gap_at: Option<f64>) -> GenerateArgs {
        GenerateArgs {
            output: PathBuf::from("unused.csv"),
            kind,
            freq: 1.0,
            sample_rate: 8.0,
            duration: 4.0,
            amplitude: 2.0,
            gap_at,
            gap_length: 10.0,
        }
    }

    #[test]
    fn test_circular_has_constant_radius() {
        let data = synthesize(&args(SignalKind::Circular, None));
        assert_eq!(data.len(), 32);
        for i in 0..data.len() {
            let r = data.x[i].hypot(data.y[i]);
            assert!((r - 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_gap_shifts_later_samples() {
        let data = synthesize(&args(SignalKind::Linear, Some(2.0)));
        assert_eq!(data.time[15], 15.0 / 8.0);
        assert_eq!(data.time[16], 12.0);
    }

    #[test]
    fn test_noise_is_bounded_and_deterministic() {
        let a = synthesize(&args(SignalKind::Noise, None));
        let b = synthesize(&args(SignalKind::Noise, None));
        assert_eq!(a, b);
        assert!(a.x.iter().all(|v| v.abs() <= 2.0));
        assert_ne!(a.x, a.y);
    }
}
