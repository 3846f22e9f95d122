use crate::error::{EdaError, Result};
use crate::pipeline::ParsePolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT_PATH: &str = "data/apps.csv";
pub const DEFAULT_TOP_N: usize = 15;

/// Walkthrough settings. Every field is optional in the JSON file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// CSV file to analyse
    pub input_path: PathBuf,
    /// Rows shown per ranked table (the top-rated table is never truncated)
    pub top_n: usize,
    /// What Clean does with values it cannot coerce
    pub parse_policy: ParsePolicy,
    /// Wait for ENTER before each challenge
    pub pause: bool,
    /// When set, every view is also written here as CSV
    pub export_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            top_n: DEFAULT_TOP_N,
            parse_policy: ParsePolicy::default(),
            pause: true,
            export_dir: None,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`EdaError::Config`] on malformed JSON or unknown values.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        if settings.top_n == 0 {
            return Err(EdaError::Config("top_n must be at least 1".to_owned()));
        }
        Ok(settings)
    }

    /// Load settings from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`EdaError::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            EdaError::Config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_json(&content)
    }
}

/// Settings from `path` when given, defaults otherwise.
///
/// # Errors
///
/// See [`Settings::from_file`].
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(p) => {
            log::debug!("Loading settings from {}", p.display());
            Settings::from_file(p)
        }
        None => Ok(Settings::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = load_settings(None).unwrap();
        assert_eq!(settings.input_path, PathBuf::from("data/apps.csv"));
        assert_eq!(settings.top_n, 15);
        assert_eq!(settings.parse_policy, ParsePolicy::Fail);
        assert!(settings.pause);
        assert!(settings.export_dir.is_none());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"top_n": 5, "parse_policy": "skip"}"#).unwrap();
        assert_eq!(settings.top_n, 5);
        assert_eq!(settings.parse_policy, ParsePolicy::Skip);
        assert_eq!(settings.input_path, PathBuf::from(DEFAULT_INPUT_PATH));
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        assert!(matches!(
            Settings::from_json(r#"{"parse_policy": "maybe"}"#),
            Err(EdaError::Config(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{"top_n": 0}"#),
            Err(EdaError::Config(_))
        ));
        assert!(matches!(Settings::from_json("{"), Err(EdaError::Config(_))));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let path = std::env::temp_dir().join("appscope_missing_settings.json");
        assert!(matches!(
            load_settings(Some(&path)),
            Err(EdaError::Config(_))
        ));
    }
}
