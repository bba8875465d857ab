//! Config manager for loading and saving wizard settings.
//!
//! Key features:
//! - Atomic writes (write to temp file, then rename)
//! - Missing keys fall back to defaults on load
//! - Cross-field validation before settings are handed out

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::settings::{ConfigSection, Settings};

/// Errors that can occur during config operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Manages wizard configuration.
pub struct ConfigManager {
    /// Path to the config file.
    config_path: PathBuf,
    /// Current settings loaded in memory.
    settings: Settings,
}

impl ConfigManager {
    /// Create a new config manager with the given config file path.
    ///
    /// Does not load the config - call `load()` or `load_or_default()` after.
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            settings: Settings::default(),
        }
    }

    /// Get the config file path.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Get a reference to the current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get a mutable reference to the current settings.
    ///
    /// Changes are only in memory until `save()` is called.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Load config from file.
    ///
    /// Returns error if file doesn't exist.
    pub fn load(&mut self) -> ConfigResult<()> {
        if !self.config_path.exists() {
            return Err(ConfigError::NotFound(self.config_path.clone()));
        }

        let content = fs::read_to_string(&self.config_path)?;
        self.settings = parse_settings(&content)?;
        tracing::debug!("Loaded settings from {}", self.config_path.display());
        Ok(())
    }

    /// Load config from file, keeping defaults if the file doesn't exist.
    pub fn load_or_default(&mut self) -> ConfigResult<()> {
        if self.config_path.exists() {
            self.load()
        } else {
            tracing::info!(
                "No config at {}, using defaults",
                self.config_path.display()
            );
            self.settings = Settings::default();
            Ok(())
        }
    }

    /// Save the entire config atomically.
    pub fn save(&self) -> ConfigResult<()> {
        self.settings.validate().map_err(ConfigError::Invalid)?;
        let content = self.generate_config_with_comments()?;
        self.atomic_write(&content)?;
        Ok(())
    }

    /// Generate config content with a comment above each section.
    fn generate_config_with_comments(&self) -> ConfigResult<String> {
        let mut output = String::new();
        output.push_str("# ParGaMD Setup Wizard Configuration\n\n");

        for section in ConfigSection::ALL {
            let body = match section {
                ConfigSection::Wizard => toml::to_string_pretty(&self.settings.wizard)?,
                ConfigSection::Notifications => {
                    toml::to_string_pretty(&self.settings.notifications)?
                }
                ConfigSection::Backend => toml::to_string_pretty(&self.settings.backend)?,
                ConfigSection::Download => toml::to_string_pretty(&self.settings.download)?,
                ConfigSection::Logging => toml::to_string_pretty(&self.settings.logging)?,
            };

            output.push_str(&format!("# {}\n", section.description()));
            output.push_str(&format!("[{}]\n", section.table_name()));
            for line in body.lines() {
                output.push_str(line);
                output.push('\n');
            }
            output.push('\n');
        }

        Ok(output)
    }

    /// Write content to config file atomically.
    fn atomic_write(&self, content: &str) -> io::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.config_path.with_extension("toml.tmp");

        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }

        fs::rename(&temp_path, &self.config_path)?;

        Ok(())
    }
}

/// Parse and validate settings from TOML text.
pub fn parse_settings(content: &str) -> ConfigResult<Settings> {
    let settings: Settings = toml::from_str(content)?;
    settings.validate().map_err(ConfigError::Invalid)?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn load_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let mut manager = ConfigManager::new(dir.path().join("wizard.toml"));
        assert!(matches!(manager.load(), Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn load_or_default_without_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("wizard.toml");

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_default().unwrap();

        assert_eq!(manager.settings(), &Settings::default());
        assert!(!config_path.exists());
    }

    #[test]
    fn load_preserves_existing_values() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("wizard.toml");
        fs::write(
            &config_path,
            "[backend]\nbase_url = \"http://hpc-gateway:8080\"\n\n[notifications]\ntimeout_ms = 2500\n",
        )
        .unwrap();

        let mut manager = ConfigManager::new(&config_path);
        manager.load().unwrap();

        assert_eq!(manager.settings().backend.base_url, "http://hpc-gateway:8080");
        assert_eq!(manager.settings().notifications.timeout_ms, 2500);
        assert_eq!(manager.settings().wizard.total_steps, 6);
    }

    #[test]
    fn load_rejects_inconsistent_steps() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("wizard.toml");
        fs::write(&config_path, "[wizard]\ntotal_steps = 3\nupload_step = 2\n").unwrap();

        let mut manager = ConfigManager::new(&config_path);
        assert!(matches!(manager.load(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn save_then_load_round_trips_changes() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nested").join("wizard.toml");

        let mut manager = ConfigManager::new(&config_path);
        manager.settings_mut().wizard.default_preview_file = "run_we.sh".to_string();
        manager.save().unwrap();

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[wizard]"));
        assert!(content.contains("[backend]"));
        assert!(!config_path.with_extension("toml.tmp").exists());

        let mut reloaded = ConfigManager::new(&config_path);
        reloaded.load().unwrap();
        assert_eq!(reloaded.settings().wizard.default_preview_file, "run_we.sh");
    }
}
