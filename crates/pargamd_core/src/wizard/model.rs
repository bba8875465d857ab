//! Wizard state owned by one controller.
//!
//! All methods here are synchronous state transitions; the controller runs
//! them under its lock and performs the network calls in between.

use tokio::time::Instant;

use crate::config::Settings;
use crate::form::layout::{ACCOUNT, EMAIL, INCLUDE_INFINITE_BOUNDS, PROTEIN_NAME};
use crate::form::{FormModel, FormSnapshot};
use crate::models::{IterationProgress, JobStatusUpdate, UploadSlot, UploadedFileRecord};

use super::navigator::{Advance, StepNavigator, MISSING_UPLOADS};
use super::notifications::NotificationCenter;
use super::status::StatusPanel;
use super::summary::SummaryCard;
use super::uploads::UploadTracker;
use super::view::WizardView;

/// Fields that must be non-empty before an experiment can start.
const EXPERIMENT_FIELDS: [&str; 3] = [ACCOUNT, EMAIL, PROTEIN_NAME];

#[derive(Debug)]
pub(crate) struct WizardModel {
    pub navigator: StepNavigator,
    pub form: FormModel,
    pub uploads: UploadTracker,
    pub notifications: NotificationCenter,
    pub view: WizardView,
    pub default_preview_file: String,
}

impl WizardModel {
    pub fn new(settings: &Settings, form: FormModel) -> Self {
        let wizard = &settings.wizard;
        let navigator = StepNavigator::new(wizard.total_steps, wizard.upload_step, wizard.review_step);
        let view = WizardView::new(navigator.state(), &wizard.default_preview_file);
        Self {
            navigator,
            form,
            uploads: UploadTracker::new(),
            notifications: NotificationCenter::new(settings.notifications.timeout()),
            view,
            default_preview_file: wizard.default_preview_file.clone(),
        }
    }

    pub fn advance(&mut self) -> Advance {
        let outcome = self.navigator.advance(&mut self.form, &self.uploads);
        if matches!(outcome, Advance::Moved { .. }) {
            self.view.apply_navigation(self.navigator.state());
        }
        outcome
    }

    pub fn retreat(&mut self) -> bool {
        let moved = self.navigator.retreat();
        if moved {
            self.view.apply_navigation(self.navigator.state());
        }
        moved
    }

    /// Snapshot sent with preview and bundle requests.
    ///
    /// `include_infinite_bounds` comes from its checkbox, or `true` when the
    /// form has no such field.
    pub fn preview_params(&self) -> FormSnapshot {
        let include = self.form.is_checked(INCLUDE_INFINITE_BOUNDS).unwrap_or(true);
        self.form.snapshot().with_flag(INCLUDE_INFINITE_BOUNDS, include)
    }

    pub fn rebuild_summary(&mut self) {
        self.view.summary = SummaryCard::build(&self.form.snapshot(), &self.uploads);
    }

    pub fn confirm_upload(&mut self, slot: UploadSlot, record: UploadedFileRecord, indicator: String) {
        if let Some(previous) = self.uploads.confirm(slot, record) {
            tracing::debug!("Replaced upload {} for {}", previous.filename, slot);
        }
        self.view.upload_indicators.insert(slot, indicator);
    }

    pub fn set_drop_zone(&mut self, slot: UploadSlot, active: bool) {
        self.view.active_drop_zones.insert(slot, active);
    }

    pub fn apply_job_status(&mut self, update: &JobStatusUpdate) {
        let status = update.status();
        self.view.status = StatusPanel::render(&status);
        if status.is_we_active() {
            self.view.progress.visible = true;
        }
    }

    pub fn apply_iteration(&mut self, progress: &IterationProgress) {
        self.view.progress.apply(progress);
    }

    /// Uploads first, then the required experiment fields in order.
    pub fn check_experiment_setup(&self) -> Result<(), String> {
        if !self.uploads.has_all() {
            return Err(MISSING_UPLOADS.to_string());
        }
        let snapshot = self.form.snapshot();
        for field in EXPERIMENT_FIELDS {
            if snapshot.text(field).is_empty() {
                return Err(format!("Please fill in the {} field", field));
            }
        }
        Ok(())
    }

    /// Prune expired notifications and produce the current display model.
    pub fn render(&mut self, now: Instant) -> WizardView {
        self.notifications.expire(now);
        let mut view = self.view.clone();
        view.invalid_fields = self.form.invalid_fields().map(str::to_string).collect();
        view.notifications = self.notifications.active().to_vec();
        view
    }
}
