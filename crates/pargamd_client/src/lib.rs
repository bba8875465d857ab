//! ParGaMD Client - network side of the setup wizard
//!
//! - [`HttpBackend`] implements the wizard backend over HTTP/JSON
//! - [`events`] turns the server-sent event stream into push events
//! - [`DirectorySink`] saves downloaded bundles to a folder
//!
//! ```no_run
//! use pargamd_client::{events, DirectorySink, HttpBackend};
//! use pargamd_core::config::ConfigManager;
//! use pargamd_core::wizard::WizardController;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = ConfigManager::new("wizard.toml");
//! config.load_or_default()?;
//! let settings = config.settings();
//!
//! let backend = HttpBackend::new(settings.backend.clone())?;
//! let sink = DirectorySink::from_settings(&settings.download);
//! let wizard = WizardController::new(settings, backend, sink)?;
//!
//! let _status = wizard.subscribe_push(events::connect_with_settings(&settings.backend).await?);
//! # Ok(())
//! # }
//! ```

mod download;
pub mod events;
mod http;

pub use download::{bundle_entries, DirectorySink};
pub use http::HttpBackend;
