//! Analysis presets for wavpol.
//!
//! A preset is a small TOML document naming a window length, stride, and
//! smoothing width. Presets can be loaded from disk, looked up among the
//! built-in factory presets, or saved to the user presets directory.
//!
//! # Example
//!
//! ```rust,no_run
//! use wavpol_config::{AnalysisPreset, user_presets_dir};
//!
//! let preset = AnalysisPreset::new("survey")
//!     .with_description("Long windows for a quiet interval")
//!     .with_window_length(1024)
//!     .with_smoothing_width(5);
//!
//! let config = preset.to_config().unwrap();
//! assert_eq!(config.stride(), 512);
//!
//! preset.save(user_presets_dir().join("survey.toml")).unwrap();
//! ```

mod error;
mod preset;

/// Platform-specific paths for presets.
pub mod paths;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use error::ConfigError;
pub use factory_presets::{
    FACTORY_PRESET_NAMES, factory_preset_names, factory_presets, get_factory_preset,
    is_factory_preset,
};
pub use paths::{
    ensure_user_presets_dir, find_preset, list_user_presets, preset_name_from_path,
    user_config_dir, user_presets_dir,
};
pub use preset::AnalysisPreset;

/// Resolve a preset by factory name, user preset name, or file path.
///
/// Factory presets win over files of the same name.
pub fn resolve_preset(name: &str) -> Result<AnalysisPreset, ConfigError> {
    if let Some(preset) = get_factory_preset(name) {
        return Ok(preset);
    }
    match find_preset(name) {
        Some(path) => AnalysisPreset::load(path),
        None => Err(ConfigError::PresetNotFound(name.to_string())),
    }
}
