//! Factory presets bundled with wavpol.
//!
//! Always available without external files. `default` matches
//! [`WavpolConfig::default`](wavpol_core::WavpolConfig::default).

use crate::AnalysisPreset;

/// Factory preset identifiers.
pub static FACTORY_PRESET_NAMES: &[&str] = &["default", "high_resolution", "fast", "narrowband"];

/// TOML content for factory presets, embedded at compile time.
static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("default", DEFAULT_PRESET),
    ("high_resolution", HIGH_RESOLUTION_PRESET),
    ("fast", FAST_PRESET),
    ("narrowband", NARROWBAND_PRESET),
];

const DEFAULT_PRESET: &str = r#"
name = "Default"
description = "256-sample windows, half overlap, 3-bin smoothing"
window_length = 256
stride = 128
smoothing_width = 3
"#;

const HIGH_RESOLUTION_PRESET: &str = r#"
name = "High Resolution"
description = "1024-sample windows at quarter-window steps, 5-bin smoothing"
window_length = 1024
stride = 256
smoothing_width = 5
"#;

const FAST_PRESET: &str = r#"
name = "Fast"
description = "Short 64-sample windows without overlap for quick looks"
window_length = 64
stride = 64
smoothing_width = 3
"#;

const NARROWBAND_PRESET: &str = r#"
name = "Narrowband"
description = "512-sample windows with no smoothing to resolve close lines"
window_length = 512
stride = 256
smoothing_width = 1
"#;

/// All factory presets, in declaration order.
pub fn factory_presets() -> Vec<AnalysisPreset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| AnalysisPreset::from_toml(toml).ok())
        .collect()
}

/// Get a factory preset by identifier or display name, case-insensitively.
///
/// ```rust
/// use wavpol_config::get_factory_preset;
///
/// let preset = get_factory_preset("High Resolution").unwrap();
/// assert_eq!(preset.window_length, 1024);
/// ```
pub fn get_factory_preset(name: &str) -> Option<AnalysisPreset> {
    let name_lower = name.to_lowercase();

    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(id, toml)| Some((*id, AnalysisPreset::from_toml(toml).ok()?)))
        .find(|(id, preset)| {
            id.to_lowercase() == name_lower || preset.name.to_lowercase() == name_lower
        })
        .map(|(_, preset)| preset)
}

/// Identifiers of all factory presets.
pub fn factory_preset_names() -> Vec<&'static str> {
    FACTORY_PRESETS_TOML.iter().map(|(name, _)| *name).collect()
}

/// Check if a name refers to a factory preset.
pub fn is_factory_preset(name: &str) -> bool {
    get_factory_preset(name).is_some()
}
