//! Editor settings file
//!
//! Settings are a versioned JSON record. Missing fields take their defaults
//! so older files keep loading; files written by a newer version are refused.

use editor_core::EngineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Settings error
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported settings version: {0}")]
    UnsupportedVersion(u32),
}

/// Settings result
pub type SettingsResult<T> = Result<T, SettingsError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Version of the settings format (for future migrations)
    pub version: u32,
    pub app_title: String,
    /// Tab label for documents without a path
    pub untitled_name: String,
    pub viewport_lines: usize,
    pub engine: EngineConfig,
}

impl EditorSettings {
    /// Current version of the settings format
    pub const CURRENT_VERSION: u32 = 1;

    /// Parse settings from JSON
    pub fn from_json(json: &str) -> SettingsResult<Self> {
        let settings: Self = serde_json::from_str(json)?;
        if settings.version > Self::CURRENT_VERSION {
            return Err(SettingsError::UnsupportedVersion(settings.version));
        }
        Ok(settings)
    }

    pub fn to_json(&self) -> SettingsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> SettingsResult<Self> {
        match fs::read_to_string(path) {
            Ok(json) => {
                let settings = Self::from_json(&json)?;
                tracing::info!(path = %path.display(), "settings loaded");
                Ok(settings)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self, path: &Path) -> SettingsResult<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            app_title: "Malachite IDE".to_string(),
            untitled_name: "untitled.py".to_string(),
            viewport_lines: 40,
            engine: EngineConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_takes_defaults() {
        let settings = EditorSettings::from_json(r#"{ "app_title": "Scratch", "engine": { "auto_pair": false } }"#).unwrap();
        assert_eq!(settings.app_title, "Scratch");
        assert_eq!(settings.untitled_name, "untitled.py");
        assert!(!settings.engine.auto_pair);
        assert!(settings.engine.completion);
    }

    #[test]
    fn test_newer_version_rejected() {
        let err = EditorSettings::from_json(r#"{ "version": 7 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::UnsupportedVersion(7)));
    }

    #[test]
    fn test_malformed_json() {
        let err = EditorSettings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = EditorSettings::load(&dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, EditorSettings::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = EditorSettings {
            viewport_lines: 12,
            engine: EngineConfig {
                max_candidates: Some(5),
                ..EngineConfig::default()
            },
            ..EditorSettings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(EditorSettings::load(&path).unwrap(), settings);
    }
}
