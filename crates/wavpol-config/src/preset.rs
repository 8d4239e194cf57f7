//! Preset file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;
use wavpol_core::WavpolConfig;
use wavpol_core::config::{DEFAULT_SMOOTHING_WIDTH, DEFAULT_WINDOW_LENGTH};

use crate::error::ConfigError;

/// Analysis preset.
///
/// Stored as TOML. Every field except `name` may be omitted; a missing
/// `stride` means half the window length.
///
/// # TOML Format
///
/// ```toml
/// name = "High Resolution"
/// description = "Long windows, heavy smoothing"
/// window_length = 1024
/// stride = 256
/// smoothing_width = 5
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisPreset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// FFT window length in samples.
    #[serde(default = "default_window_length")]
    pub window_length: usize,

    /// Window advance in samples (defaults to half the window).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stride: Option<usize>,

    /// Number of frequency bins averaged by the smoother.
    #[serde(default = "default_smoothing_width")]
    pub smoothing_width: usize,
}

fn default_window_length() -> usize {
    DEFAULT_WINDOW_LENGTH
}

fn default_smoothing_width() -> usize {
    DEFAULT_SMOOTHING_WIDTH
}

impl AnalysisPreset {
    /// Create a preset with default analysis parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            window_length: DEFAULT_WINDOW_LENGTH,
            stride: None,
            smoothing_width: DEFAULT_SMOOTHING_WIDTH,
        }
    }

    /// Capture an existing configuration under `name`.
    pub fn from_config(name: impl Into<String>, config: &WavpolConfig) -> Self {
        Self {
            name: name.into(),
            description: None,
            window_length: config.window_length(),
            stride: Some(config.stride()),
            smoothing_width: config.smoothing_width(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the window length.
    pub fn with_window_length(mut self, window_length: usize) -> Self {
        self.window_length = window_length;
        self
    }

    /// Set an explicit stride.
    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = Some(stride);
        self
    }

    /// Set the smoothing width.
    pub fn with_smoothing_width(mut self, smoothing_width: usize) -> Self {
        self.smoothing_width = smoothing_width;
        self
    }

    /// Stride that will be used, resolving the half-window default.
    pub fn effective_stride(&self) -> usize {
        self.stride.unwrap_or(self.window_length / 2)
    }

    /// Validate and convert into an analyzer configuration.
    pub fn to_config(&self) -> Result<WavpolConfig, ConfigError> {
        WavpolConfig::new(
            self.window_length,
            self.effective_stride(),
            self.smoothing_width,
        )
        .map_err(|e| ConfigError::invalid(&self.name, e))
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Default for AnalysisPreset {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_new() {
        let preset = AnalysisPreset::new("Test");
        assert_eq!(preset.name, "Test");
        assert!(preset.description.is_none());
        assert_eq!(preset.window_length, 256);
        assert_eq!(preset.stride, None);
        assert_eq!(preset.effective_stride(), 128);
        assert_eq!(preset.smoothing_width, 3);
    }

    #[test]
    fn test_preset_from_toml() {
        let toml = r#"
name = "Storm"
description = "Short windows for a storm interval"
window_length = 64
stride = 16
smoothing_width = 5
"#;

        let preset = AnalysisPreset::from_toml(toml).unwrap();
        assert_eq!(preset.name, "Storm");
        assert_eq!(preset.description.as_deref(), Some("Short windows for a storm interval"));
        assert_eq!(preset.window_length, 64);
        assert_eq!(preset.effective_stride(), 16);
        assert_eq!(preset.smoothing_width, 5);

        let config = preset.to_config().unwrap();
        assert_eq!(config.window_length(), 64);
        assert_eq!(config.stride(), 16);
        assert_eq!(config.smoothing_width(), 5);
    }

    #[test]
    fn test_minimal_toml() {
        let preset = AnalysisPreset::from_toml("name = \"Minimal\"").unwrap();
        assert_eq!(preset.name, "Minimal");
        assert_eq!(preset.window_length, 256); // default
        assert_eq!(preset.effective_stride(), 128);
        assert_eq!(preset.to_config().unwrap(), WavpolConfig::default());
    }

    #[test]
    fn test_missing_name_is_parse_error() {
        let err = AnalysisPreset::from_toml("window_length = 64").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn test_to_toml_omits_unset_fields() {
        let toml = AnalysisPreset::new("Plain").to_toml().unwrap();
        assert!(toml.contains("name = \"Plain\""));
        assert!(toml.contains("window_length = 256"));
        assert!(!toml.contains("stride"));
        assert!(!toml.contains("description"));
    }

    #[test]
    fn test_preset_roundtrip() {
        let original = AnalysisPreset::new("Roundtrip")
            .with_description("Testing serialization")
            .with_window_length(512)
            .with_stride(100)
            .with_smoothing_width(7);

        let parsed = AnalysisPreset::from_toml(&original.to_toml().unwrap()).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_invalid_parameters_name_the_preset() {
        let preset = AnalysisPreset::new("Broken").with_smoothing_width(4);
        let err = preset.to_config().unwrap_err();
        match err {
            ConfigError::Invalid { preset, source } => {
                assert_eq!(preset, "Broken");
                assert!(source.to_string().contains("odd"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_config() {
        let config = WavpolConfig::new(128, 32, 5).unwrap();
        let preset = AnalysisPreset::from_config("Captured", &config);
        assert_eq!(preset.stride, Some(32));
        assert_eq!(preset.to_config().unwrap(), config);
    }
}
