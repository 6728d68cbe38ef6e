//! Loading for `img2fmem.toml` settings files

use super::schema::Settings;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Settings loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsError {
    /// File I/O error
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Settings validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// Load settings from an explicit path, or the defaults when none is given.
///
/// Settings files are never discovered implicitly: a run without `--config`
/// behaves the same regardless of the working directory.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, SettingsError> {
    match path {
        Some(p) => load_settings_file(p),
        None => Ok(Settings::default()),
    }
}

fn load_settings_file(path: &Path) -> Result<Settings, SettingsError> {
    let contents = fs::read_to_string(path)?;
    let settings: Settings = toml::from_str(&contents)?;

    let errors = settings.validate();
    if !errors.is_empty() {
        return Err(SettingsError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    log::debug!("loaded settings from {}", path.display());
    Ok(settings)
}
