//! RON persistence for [`TerminalSettings`].

use std::fs;
use std::path::Path;

use bevy::prelude::*;
use thiserror::Error;

use crate::settings::TerminalSettings;

/// Default settings file name.
pub const DEFAULT_SETTINGS_FILE: &str = "terminal.ron";

/// Errors from loading or saving settings.
#[derive(Debug, Clone, Error)]
pub enum SettingsError {
    /// IO error (path, message).
    #[error("IO error for '{0}': {1}")]
    Io(String, String),
    /// Parse error (path, message).
    #[error("Parse error for '{0}': {1}")]
    Parse(String, String),
    #[error("Serialization error: {0}")]
    Serialize(String),
}

impl TerminalSettings {
    /// Load settings from a RON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| SettingsError::Io(path.display().to_string(), e.to_string()))?;

        ron::from_str(&contents)
            .map_err(|e| SettingsError::Parse(path.display().to_string(), e.to_string()))
    }

    /// Save settings to a RON file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)
                .map_err(|e| SettingsError::Io(parent.display().to_string(), e.to_string()))?;
        }

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let contents = ron::ser::to_string_pretty(self, pretty)
            .map_err(|e| SettingsError::Serialize(e.to_string()))?;

        fs::write(path, contents)
            .map_err(|e| SettingsError::Io(path.display().to_string(), e.to_string()))
    }

    /// Load settings, falling back to defaults when the file is missing or
    /// invalid.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No terminal settings at '{}', using defaults", path.display());
            return Self::default();
        }

        Self::load(path).unwrap_or_else(|e| {
            error!("Failed to load terminal settings: {}", e);
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_settings_save_and_load() {
        let settings = TerminalSettings::default()
            .buffer_size(128)
            .startup_script("scripts/boot.txt")
            .log_engine_messages(false);

        let temp = NamedTempFile::new().unwrap();
        settings.save(temp.path()).unwrap();

        let loaded = TerminalSettings::load(temp.path()).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_settings_partial_file() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "(buffer_size: 16)").unwrap();

        let loaded = TerminalSettings::load(temp.path()).unwrap();
        assert_eq!(loaded.buffer_size, 16);
        assert_eq!(loaded.startup_script, Some(PathBuf::from("StartupCommands.txt")));
        assert!(loaded.log_engine_messages);
    }

    #[test]
    fn test_settings_load_missing() {
        let result = TerminalSettings::load("nonexistent_terminal_settings.ron");
        assert!(matches!(result, Err(SettingsError::Io(_, _))));

        let settings = TerminalSettings::load_or_default("nonexistent_terminal_settings.ron");
        assert_eq!(settings, TerminalSettings::default());
    }

    #[test]
    fn test_settings_load_invalid() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "this is not valid RON {{{{").unwrap();

        let result = TerminalSettings::load(temp.path());
        assert!(matches!(result, Err(SettingsError::Parse(_, _))));
        assert_eq!(TerminalSettings::load_or_default(temp.path()), TerminalSettings::default());
    }

    #[test]
    fn test_settings_save_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("terminal.ron");

        TerminalSettings::without_startup_script().save(&path).unwrap();
        assert_eq!(TerminalSettings::load(&path).unwrap().startup_script, None);
    }
}
