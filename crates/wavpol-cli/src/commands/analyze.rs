//! Polarization analysis command.

use super::common::{AnalysisParams, finite_median};
use clap::Args;
use std::path::PathBuf;
use wavpol_core::{PolarizationSpectrogram, Quantity, WavpolAnalyzer};
use wavpol_io::{
    export_all_csv, export_grid_pgm, export_json, export_overflow_json, overflow_record,
    read_series,
};

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input series (.csv, .json, or .wav)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    #[command(flatten)]
    params: AnalysisParams,

    /// Write all result grids to this JSON file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write one CSV per quantity into this directory
    #[arg(long)]
    csv_dir: Option<PathBuf>,

    /// Write one PGM image per quantity into this directory
    #[arg(long)]
    image_dir: Option<PathBuf>,
}

/// Run the analyze command.
pub fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    let config = args.params.to_config()?;
    let data = read_series(&args.input)?;
    tracing::info!(
        input = %args.input.display(),
        samples = data.len(),
        window_length = config.window_length(),
        stride = config.stride(),
        smoothing_width = config.smoothing_width(),
        "analyzing"
    );

    let result = match WavpolAnalyzer::new(config).analyze(&data.as_series()?) {
        Ok(result) => result,
        Err(e) => {
            if let Some(path) = &args.output {
                export_overflow_json(&overflow_record(&e), path)?;
                println!("Wrote error record to {}", path.display());
            }
            return Err(e.into());
        }
    };

    print_summary(&result, data.len());

    let stem = args
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("wavpol")
        .to_string();

    if let Some(path) = &args.output {
        export_json(&result, path)?;
        println!("Wrote results to {}", path.display());
    }

    if let Some(dir) = &args.csv_dir {
        let paths = export_all_csv(&result, dir, &stem)?;
        println!("Wrote {} CSV grids to {}", paths.len(), dir.display());
    }

    if let Some(dir) = &args.image_dir {
        if result.is_empty() {
            tracing::warn!("no analysis rows; skipping images");
        } else {
            std::fs::create_dir_all(dir)?;
            for quantity in Quantity::ALL {
                let path = dir.join(format!("{stem}_{}.pgm", quantity.name()));
                export_grid_pgm(&result, quantity, &path)?;
            }
            println!("Wrote {} images to {}", Quantity::ALL.len(), dir.display());
        }
    }

    Ok(())
}

fn print_summary(result: &PolarizationSpectrogram, samples: usize) {
    let config = &result.config;
    println!("Samples:     {samples}");
    println!(
        "Config:      window {} / stride {} / smoothing {}",
        config.window_length(),
        config.stride(),
        config.smoothing_width()
    );
    println!("Rows:        {}", result.num_frames());
    println!(
        "Bins:        {} ({:.6} Hz wide)",
        result.num_bins(),
        result.bin_width
    );

    match peak_power(result) {
        Some((frame, bin, power)) => println!(
            "Peak power:  {:.6e} at {:.4} Hz, t = {:.3} s",
            power,
            result.freqline[bin],
            result.timeline[frame]
        ),
        None => println!("Peak power:  (none)"),
    }

    match finite_median(result.degree_of_polarization.iter().flatten()) {
        Some(dop) => println!("Median DOP:  {dop:.3}"),
        None => println!("Median DOP:  (none)"),
    }
}

/// Largest finite power cell as `(frame, bin, power)`.
fn peak_power(result: &PolarizationSpectrogram) -> Option<(usize, usize, f64)> {
    (0..result.num_frames())
        .filter_map(|frame| {
            let bin = result.peak_bin(frame)?;
            Some((frame, bin, result.power[frame][bin]))
        })
        .max_by(|a, b| a.2.total_cmp(&b.2))
}
