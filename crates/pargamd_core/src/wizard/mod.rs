//! The setup wizard.
//!
//! - `navigator` computes step transitions and the validation gate
//! - `uploads` tracks confirmed server-side files per slot
//! - `status` renders push events into the status panel and progress bar
//! - `controller` ties them together with the backend and the view model
//!
//! ```no_run
//! # async fn demo<B: pargamd_core::backend::Backend>(backend: B, sink: impl pargamd_core::backend::DownloadSink) {
//! use pargamd_core::config::Settings;
//! use pargamd_core::wizard::WizardController;
//!
//! let wizard = WizardController::new(&Settings::default(), backend, sink).unwrap();
//! wizard.set_field("account", "TG-MCB1234");
//! wizard.advance().await;
//! println!("now on step {}", wizard.current_step());
//! # }
//! ```

mod controller;
mod errors;
mod messages;
mod model;
mod navigator;
mod notifications;
mod receiver;
mod status;
mod summary;
mod uploads;
mod view;


pub use controller::WizardController;
pub use errors::{WizardError, WizardResult};
pub use messages::WizardMsg;
pub use navigator::{Advance, StepMarker, StepNavigator, WizardState, MISSING_UPLOADS};
pub use notifications::{Notification, NotificationCenter, NotificationKind};
pub use receiver::StatusSubscription;
pub use status::{ProgressView, StatusLine, StatusPanel, StatusTone, READY};
pub use summary::{SummaryCard, SummarySection, NOT_UPLOADED};
pub use uploads::UploadTracker;
pub use view::{LoadDialog, WizardView};
