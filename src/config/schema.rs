//! Settings schema for `img2fmem.toml`
//!
//! Every key is optional. The settings file only affects where artifacts are
//! written and the attribution header; it never changes how colour or palette
//! bit counts are normalized.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Attribution message written on the first line of every text artifact
pub const DEFAULT_HEADER: &str =
    "Generated by img2fmem - image to FPGA memory map converter";

/// Root settings structure for `img2fmem.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Artifact output settings
    #[serde(default)]
    pub output: OutputSettings,
}

/// `[output]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSettings {
    /// Attribution message after the comment marker
    #[serde(default = "default_header")]
    pub header: String,
    /// Directory for artifacts (default: next to the input image)
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// Write the `_preview.png` artifact
    #[serde(default = "default_true")]
    pub preview: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { header: default_header(), dir: None, preview: true }
    }
}

fn default_header() -> String {
    DEFAULT_HEADER.to_string()
}

fn default_true() -> bool {
    true
}

/// A problem found while validating settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl Settings {
    /// Check values that parse but cannot produce well-formed artifacts.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // The header must stay on one line or it would shift every memory address
        if self.output.header.contains('\n') || self.output.header.contains('\r') {
            errors.push(ValidationError {
                field: "output.header".to_string(),
                message: "must be a single line".to_string(),
            });
        }

        if let Some(dir) = &self.output.dir {
            if dir.as_os_str().is_empty() {
                errors.push(ValidationError {
                    field: "output.dir".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_settings_use_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.output.header, DEFAULT_HEADER);
        assert!(settings.output.preview);
        assert!(settings.output.dir.is_none());
    }

    #[test]
    fn test_output_section() {
        let settings: Settings = toml::from_str(
            r#"
[output]
header = "sprite ROM"
dir = "build/mem"
preview = false
"#,
        )
        .unwrap();
        assert_eq!(settings.output.header, "sprite ROM");
        assert_eq!(settings.output.dir, Some(PathBuf::from("build/mem")));
        assert!(!settings.output.preview);
        assert!(settings.validate().is_empty());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let result: Result<Settings, _> = toml::from_str("[output]\ncolour_bits = 4\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_multiline_header_invalid() {
        let mut settings = Settings::default();
        settings.output.header = "one\ntwo".to_string();
        let errors = settings.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "output.header");
    }
}
