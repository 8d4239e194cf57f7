//! Preset management commands.

use super::common::AnalysisParams;
use clap::{Args, Subcommand};
use std::path::PathBuf;
use wavpol_config::{
    AnalysisPreset, ensure_user_presets_dir, factory_presets, list_user_presets,
    preset_name_from_path, resolve_preset, user_presets_dir,
};

#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: PresetsCommand,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// List factory and user presets
    List,

    /// Show details of a preset
    Show {
        /// Preset name or path
        name: String,
    },

    /// Save analysis parameters as a preset
    Save {
        /// Name for the new preset
        name: String,

        /// Destination file (default: the user presets directory)
        path: Option<PathBuf>,

        #[command(flatten)]
        params: AnalysisParams,

        /// Description of the preset
        #[arg(short, long)]
        description: Option<String>,

        /// Overwrite if the file already exists
        #[arg(long)]
        force: bool,
    },
}

/// Run the presets command.
pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    match args.command {
        PresetsCommand::List => list_presets(),
        PresetsCommand::Show { name } => show_preset(&name),
        PresetsCommand::Save {
            name,
            path,
            params,
            description,
            force,
        } => save_preset(&name, path, &params, description, force),
    }
}

fn list_presets() -> anyhow::Result<()> {
    println!("Factory Presets:");
    println!("================");
    for preset in factory_presets() {
        println!("  {:20} - {}", preset.name, summary(&preset));
    }
    println!();

    println!("User Presets:");
    println!("=============");
    let user_presets = list_user_presets();
    if user_presets.is_empty() {
        println!("  (none)");
    }
    for path in user_presets {
        let name = preset_name_from_path(&path).unwrap_or_else(|| "unknown".to_string());
        match AnalysisPreset::load(&path) {
            Ok(preset) => println!("  {:20} - {}", name, summary(&preset)),
            Err(_) => println!("  {:20} - (error loading)", name),
        }
    }
    println!();

    Ok(())
}

fn summary(preset: &AnalysisPreset) -> String {
    format!(
        "N={} stride={} K={}",
        preset.window_length,
        preset.effective_stride(),
        preset.smoothing_width
    )
}

fn show_preset(name: &str) -> anyhow::Result<()> {
    let preset = resolve_preset(name)?;

    println!("Preset: {}", preset.name);
    println!("{}", "=".repeat(8 + preset.name.len()));
    if let Some(desc) = &preset.description {
        println!("Description:     {desc}");
    }
    println!("Window length:   {}", preset.window_length);
    println!("Stride:          {}", preset.effective_stride());
    println!("Smoothing width: {}", preset.smoothing_width);

    match preset.to_config() {
        Ok(config) => println!("Frequency bins:  {}", config.num_bins()),
        Err(e) => println!("Invalid:         {e}"),
    }

    Ok(())
}

fn save_preset(
    name: &str,
    path: Option<PathBuf>,
    params: &AnalysisParams,
    description: Option<String>,
    force: bool,
) -> anyhow::Result<()> {
    let mut preset = params.to_preset(name)?;
    preset.name = name.to_string();
    if description.is_some() {
        preset.description = description;
    }
    preset.to_config()?;

    let path = match path {
        Some(path) => path,
        None => {
            ensure_user_presets_dir()?;
            user_presets_dir().join(format!("{name}.toml"))
        }
    };

    if path.exists() && !force {
        anyhow::bail!(
            "'{}' already exists. Use --force to overwrite.",
            path.display()
        );
    }

    preset.save(&path)?;
    println!("Saved preset '{}' to {}", name, path.display());

    Ok(())
}
