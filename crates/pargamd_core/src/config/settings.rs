//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Every field has a default so a partial (or missing) file is valid.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Step layout of the wizard.
    #[serde(default)]
    pub wizard: WizardSettings,

    /// Notification behavior.
    #[serde(default)]
    pub notifications: NotificationSettings,

    /// Backend endpoints.
    #[serde(default)]
    pub backend: BackendSettings,

    /// Where downloaded bundles are saved.
    #[serde(default)]
    pub download: DownloadSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Logical sections of the settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Wizard,
    Notifications,
    Backend,
    Download,
    Logging,
}

impl ConfigSection {
    pub const ALL: [ConfigSection; 5] = [
        ConfigSection::Wizard,
        ConfigSection::Notifications,
        ConfigSection::Backend,
        ConfigSection::Download,
        ConfigSection::Logging,
    ];

    /// TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Wizard => "wizard",
            ConfigSection::Notifications => "notifications",
            ConfigSection::Backend => "backend",
            ConfigSection::Download => "download",
            ConfigSection::Logging => "logging",
        }
    }

    /// Comment written above the table when generating a config file.
    pub fn description(&self) -> &'static str {
        match self {
            ConfigSection::Wizard => "Wizard step layout",
            ConfigSection::Notifications => "On-screen notifications",
            ConfigSection::Backend => "Backend server and endpoint paths",
            ConfigSection::Download => "Configuration bundle downloads",
            ConfigSection::Logging => "Logging configuration",
        }
    }
}

/// Step layout of the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardSettings {
    /// Number of steps (and form sections).
    #[serde(default = "default_total_steps")]
    pub total_steps: usize,

    /// Step that requires both input files to be uploaded.
    #[serde(default = "default_upload_step")]
    pub upload_step: usize,

    /// Step that shows the summary and configuration preview.
    #[serde(default = "default_review_step")]
    pub review_step: usize,

    /// File shown in the preview pane when the review step is entered.
    #[serde(default = "default_preview_file")]
    pub default_preview_file: String,
}

fn default_total_steps() -> usize {
    6
}

fn default_upload_step() -> usize {
    2
}

fn default_review_step() -> usize {
    5
}

fn default_preview_file() -> String {
    "west.cfg".to_string()
}

impl Default for WizardSettings {
    fn default() -> Self {
        Self {
            total_steps: default_total_steps(),
            upload_step: default_upload_step(),
            review_step: default_review_step(),
            default_preview_file: default_preview_file(),
        }
    }
}

/// Notification behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    /// Time before a notification is dismissed automatically.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    5000
}

impl NotificationSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Backend server and endpoint paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Base URL of the backend server.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_upload_path")]
    pub upload_path: String,

    #[serde(default = "default_preview_path")]
    pub preview_path: String,

    #[serde(default = "default_bundle_path")]
    pub bundle_path: String,

    #[serde(default = "default_save_path")]
    pub save_path: String,

    #[serde(default = "default_load_path")]
    pub load_path: String,

    /// Server-sent events stream carrying job status pushes.
    #[serde(default = "default_events_path")]
    pub events_path: String,

    /// Per-request timeout in seconds (0 disables the timeout).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_upload_path() -> String {
    "/api/upload_files".to_string()
}

fn default_preview_path() -> String {
    "/api/generate_config_preview".to_string()
}

fn default_bundle_path() -> String {
    "/api/download_configs_zip".to_string()
}

fn default_save_path() -> String {
    "/api/save_config".to_string()
}

fn default_load_path() -> String {
    "/api/load_config".to_string()
}

fn default_events_path() -> String {
    "/events".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl BackendSettings {
    /// Join the base URL and an endpoint path.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }

    /// Per-request timeout, if enabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            upload_path: default_upload_path(),
            preview_path: default_preview_path(),
            bundle_path: default_bundle_path(),
            save_path: default_save_path(),
            load_path: default_load_path(),
            events_path: default_events_path(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Configuration bundle downloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadSettings {
    /// Folder for saved bundles. Falls back to the user's download folder.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl DownloadSettings {
    /// Resolve the folder bundles are written to.
    pub fn resolve_directory(&self) -> PathBuf {
        if let Some(dir) = &self.directory {
            return dir.clone();
        }
        directories::UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default level when RUST_LOG is not set.
    #[serde(default)]
    pub level: LogLevel,
}

impl Settings {
    /// Check cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), String> {
        let wizard = &self.wizard;
        if wizard.total_steps == 0 {
            return Err("wizard.total_steps must be at least 1".to_string());
        }
        if !(1..=wizard.total_steps).contains(&wizard.upload_step) {
            return Err(format!(
                "wizard.upload_step {} is outside 1..={}",
                wizard.upload_step, wizard.total_steps
            ));
        }
        if !(1..=wizard.total_steps).contains(&wizard.review_step) {
            return Err(format!(
                "wizard.review_step {} is outside 1..={}",
                wizard.review_step, wizard.total_steps
            ));
        }
        if wizard.default_preview_file.trim().is_empty() {
            return Err("wizard.default_preview_file must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_observed_wizard() {
        let settings = Settings::default();
        assert_eq!(settings.wizard.total_steps, 6);
        assert_eq!(settings.wizard.upload_step, 2);
        assert_eq!(settings.wizard.review_step, 5);
        assert_eq!(settings.notifications.timeout(), Duration::from_millis(5000));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let settings: Settings = toml::from_str("[wizard]\ntotal_steps = 8\n").unwrap();
        assert_eq!(settings.wizard.total_steps, 8);
        assert_eq!(settings.wizard.review_step, 5);
        assert_eq!(settings.backend, BackendSettings::default());
    }

    #[test]
    fn validate_rejects_review_step_out_of_range() {
        let mut settings = Settings::default();
        settings.wizard.total_steps = 4;
        let err = settings.validate().unwrap_err();
        assert!(err.contains("review_step"));
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let mut backend = BackendSettings::default();
        backend.base_url = "http://localhost:5000/".to_string();
        assert_eq!(
            backend.endpoint("/api/save_config"),
            "http://localhost:5000/api/save_config"
        );
        assert_eq!(backend.endpoint("events"), "http://localhost:5000/events");
    }

    #[test]
    fn zero_timeout_disables_request_timeout() {
        let mut backend = BackendSettings::default();
        backend.request_timeout_secs = 0;
        assert!(backend.request_timeout().is_none());
    }

    #[test]
    fn explicit_download_directory_wins() {
        let download = DownloadSettings {
            directory: Some(PathBuf::from("/tmp/bundles")),
        };
        assert_eq!(download.resolve_directory(), PathBuf::from("/tmp/bundles"));
    }
}
