//! Configuration management for the setup wizard.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Defaults for every key, so partial files are valid
//! - Validation of the step layout on load
//! - Atomic file writes (write to temp, then rename)
//!
//! # Example
//!
//! ```no_run
//! use pargamd_core::config::ConfigManager;
//!
//! let mut config = ConfigManager::new(".config/wizard.toml");
//! config.load_or_default().unwrap();
//!
//! println!("Backend: {}", config.settings().backend.base_url);
//! ```

mod manager;
mod settings;

pub use manager::{parse_settings, ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    BackendSettings, ConfigSection, DownloadSettings, LoggingSettings, NotificationSettings,
    Settings, WizardSettings,
};
