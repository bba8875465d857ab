//! ParGaMD Core - Setup wizard logic for ParGaMD experiments
//!
//! This crate contains the step wizard, upload tracking, configuration sync
//! and live status handling with zero UI and network dependencies. The
//! backend and the download target are traits; `pargamd_client` implements
//! them over HTTP.

pub mod backend;
pub mod config;
pub mod form;
pub mod logging;
pub mod models;
pub mod wizard;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
