//! Terminal configuration.

use std::path::PathBuf;

use bevy::prelude::*;

use crate::core::DEFAULT_BUFFER_SIZE;

/// Default startup script, relative to the working directory.
pub const DEFAULT_STARTUP_SCRIPT: &str = "StartupCommands.txt";

/// Settings read by [`TerminalPlugin`](crate::TerminalPlugin).
///
/// With the `persist` feature these can be loaded from a RON file, see
/// [`TerminalSettings::load`].
#[derive(Resource, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "persist", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "persist", serde(default))]
pub struct TerminalSettings {
    /// Number of log entries kept by the terminal.
    pub buffer_size: usize,
    /// Script run once at startup, `None` to disable.
    pub startup_script: Option<PathBuf>,
    /// Forward engine log events into the terminal buffer.
    pub log_engine_messages: bool,
}

impl Default for TerminalSettings {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            startup_script: Some(PathBuf::from(DEFAULT_STARTUP_SCRIPT)),
            log_engine_messages: true,
        }
    }
}

impl TerminalSettings {
    /// Settings without a startup script.
    pub fn without_startup_script() -> Self {
        Self {
            startup_script: None,
            ..default()
        }
    }

    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn startup_script(mut self, path: impl Into<PathBuf>) -> Self {
        self.startup_script = Some(path.into());
        self
    }

    pub fn log_engine_messages(mut self, enabled: bool) -> Self {
        self.log_engine_messages = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = TerminalSettings::default();
        assert_eq!(settings.buffer_size, 512);
        assert_eq!(settings.startup_script, Some(PathBuf::from("StartupCommands.txt")));
        assert!(settings.log_engine_messages);
    }

    #[test]
    fn test_builder() {
        let settings = TerminalSettings::without_startup_script()
            .buffer_size(64)
            .log_engine_messages(false);
        assert_eq!(settings.buffer_size, 64);
        assert_eq!(settings.startup_script, None);
        assert!(!settings.log_engine_messages);

        let settings = settings.startup_script("boot.txt");
        assert_eq!(settings.startup_script, Some(PathBuf::from("boot.txt")));
    }
}
