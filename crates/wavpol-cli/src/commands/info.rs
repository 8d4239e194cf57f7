//! Display series layout: samples, cadence, and batches.

use clap::Args;
use wavpol_core::batch::{discontinuities, find_batches, nominal_period, sampling_rate_mismatch};
use wavpol_io::read_series;

/// Batches listed before the table is cut off.
const MAX_LISTED_BATCHES: usize = 20;

/// Display series file information.
#[derive(Args)]
pub struct InfoArgs {
    /// Path to the series file (.csv, .json, or .wav)
    pub file: std::path::PathBuf,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let data = read_series(&args.file)?;

    println!("File:        {}", args.file.display());
    println!("Samples:     {}", data.len());
    if let Some((first, last)) = data.time_span() {
        println!("Time span:   {first:.6} .. {last:.6} s ({:.6} s)", last - first);
    }
    if let Some(period) = nominal_period(&data.time) {
        println!("Cadence:     {period:.6} s ({:.6} Hz)", 1.0 / period);
    }
    if let Some((first, last)) = sampling_rate_mismatch(&data.time) {
        println!("Warning:     first rate {first:.6} Hz, last rate {last:.6} Hz");
    }

    let [nx, ny, nz] = data.nan_counts();
    println!("Missing:     x {nx}, y {ny}, z {nz}");

    match find_batches(&data.time) {
        Ok(batches) => {
            println!("Batches:     {}", batches.len());
            for (i, batch) in batches.iter().take(MAX_LISTED_BATCHES).enumerate() {
                println!(
                    "  {:>4}  [{:>8}, {:>8})  {:>8} samples  {:.6} Hz",
                    i,
                    batch.start,
                    batch.end,
                    batch.len(),
                    batch.sample_rate
                );
            }
            if batches.len() > MAX_LISTED_BATCHES {
                println!("  ... {} more", batches.len() - MAX_LISTED_BATCHES);
            }
        }
        Err(e) => {
            println!("Batches:     {e}");
            println!("Breaks:      {}", discontinuities(&data.time).len());
        }
    }

    Ok(())
}
