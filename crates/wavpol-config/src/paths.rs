//! Platform-specific paths for presets.
//!
//! # Directory Structure
//!
//! - **User presets**: `~/.config/wavpol/presets/` (Linux),
//!   `~/Library/Application Support/wavpol/presets/` (macOS),
//!   `%APPDATA%\wavpol\presets\` (Windows)
//! - **User config**: the parent of the presets directory
//!
//! # Example
//!
//! ```rust,no_run
//! use wavpol_config::paths;
//!
//! if let Some(path) = paths::find_preset("storm") {
//!     println!("Found preset at: {:?}", path);
//! }
//! ```

use std::path::{Path, PathBuf};

/// Application name used for directory paths.
const APP_NAME: &str = "wavpol";

/// Subdirectory name for presets.
const PRESETS_SUBDIR: &str = "presets";

/// Returns the user-specific configuration directory.
///
/// Falls back to the current directory if the platform config directory
/// cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the user-specific presets directory.
pub fn user_presets_dir() -> PathBuf {
    user_config_dir().join(PRESETS_SUBDIR)
}

/// Find a preset file by name.
///
/// `name` may be a path to a TOML file, or a preset name (with or without
/// `.toml`) looked up in the user presets directory.
pub fn find_preset(name: &str) -> Option<PathBuf> {
    find_preset_in(name, &user_presets_dir())
}

fn find_preset_in(name: &str, dir: &Path) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let filename = if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{name}.toml")
    };

    let candidate = dir.join(filename);
    candidate.is_file().then_some(candidate)
}

/// Ensure the user presets directory exists.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_user_presets_dir() -> Result<PathBuf, crate::ConfigError> {
    let dir = user_presets_dir();

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| crate::ConfigError::create_dir(&dir, e))?;
    }

    Ok(dir)
}

/// List all preset files in the user presets directory, sorted by path.
///
/// Returns an empty vector if the directory doesn't exist or can't be read.
pub fn list_user_presets() -> Vec<PathBuf> {
    list_presets_in_dir(&user_presets_dir())
}

fn list_presets_in_dir(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut presets: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    presets.sort();
    presets
}

/// Preset name from a file path (the file stem).
///
/// ```rust
/// use wavpol_config::paths::preset_name_from_path;
/// use std::path::Path;
///
/// let name = preset_name_from_path(Path::new("/path/to/storm.toml"));
/// assert_eq!(name, Some("storm".to_string()));
/// ```
pub fn preset_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_user_presets_dir() {
        let dir = user_presets_dir();
        let dir_str = dir.to_string_lossy();
        assert!(dir_str.contains("wavpol"));
        assert!(dir.ends_with("presets"));
    }

    #[test]
    fn test_find_preset_by_path() {
        let temp_dir = TempDir::new().unwrap();
        let preset_path = temp_dir.path().join("test.toml");
        fs::write(&preset_path, "name = \"test\"").unwrap();

        let found = find_preset(preset_path.to_str().unwrap());
        assert_eq!(found, Some(preset_path));
    }

    #[test]
    fn test_find_preset_in_adds_extension() {
        let temp_dir = TempDir::new().unwrap();
        let preset_path = temp_dir.path().join("storm.toml");
        fs::write(&preset_path, "name = \"storm\"").unwrap();

        assert_eq!(find_preset_in("storm", temp_dir.path()), Some(preset_path.clone()));
        assert_eq!(find_preset_in("storm.toml", temp_dir.path()), Some(preset_path));
        assert_eq!(find_preset_in("calm", temp_dir.path()), None);
    }

    #[test]
    fn test_find_preset_not_found() {
        assert!(find_preset("nonexistent_preset_12345").is_none());
    }

    #[test]
    fn test_list_presets_in_dir() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("b.toml"), "").unwrap();
        fs::write(temp_dir.path().join("a.toml"), "").unwrap();
        fs::write(temp_dir.path().join("not_a_preset.txt"), "").unwrap();

        let presets = list_presets_in_dir(temp_dir.path());
        assert_eq!(presets.len(), 2);
        assert!(presets[0].ends_with("a.toml"));
        assert!(presets[1].ends_with("b.toml"));
    }

    #[test]
    fn test_list_presets_nonexistent_dir() {
        let presets = list_presets_in_dir(Path::new("/nonexistent/path/12345"));
        assert!(presets.is_empty());
    }

    #[test]
    fn test_preset_name_from_path() {
        assert_eq!(
            preset_name_from_path(Path::new("simple.toml")),
            Some("simple".to_string())
        );
    }
}
