//! Wizard controller: runs user actions against the backend and applies the
//! results to the shared state.
//!
//! The controller is a cheap handle; clones share one state. The lock is
//! only ever held for synchronous transitions, never across a request.

use std::path::PathBuf;
use std::sync::{Arc, Weak};
use std::time::Duration;

use futures_util::Stream;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::backend::{Backend, BackendError, DownloadSink};
use crate::config::{ConfigError, Settings};
use crate::form::{pargamd_form, FormModel, FormSnapshot};
use crate::models::{LocalFile, PushEvent, UploadSlot, UploadedFileRecord};

use super::errors::{WizardError, WizardResult};
use super::messages::WizardMsg;
use super::model::WizardModel;
use super::navigator::Advance;
use super::notifications::NotificationKind;
use super::receiver::StatusSubscription;
use super::view::WizardView;

const START_DISABLED: &str = "Start is disabled: SSH/job submission is turned off in this build.";
const MISSING_CONFIG_ID: &str = "Please enter a configuration ID";

struct Inner<B> {
    backend: B,
    sink: Arc<dyn DownloadSink>,
    model: Mutex<WizardModel>,
    revision: watch::Sender<u64>,
}

impl<B> Inner<B> {
    fn bump(&self) {
        self.revision.send_modify(|r| *r = r.wrapping_add(1));
    }

    fn expire_notifications(&self) {
        let removed = self.model.lock().notifications.expire(Instant::now());
        if removed > 0 {
            self.bump();
        }
    }
}

/// Message shown for a failed JSON request.
///
/// Server rejections are shown verbatim; everything else gets `prefix`.
fn failure_message(prefix: &str, error: &BackendError) -> String {
    match error {
        BackendError::Rejected(text) => text.clone(),
        other => format!("{}: {}", prefix, other),
    }
}

pub struct WizardController<B: Backend> {
    inner: Arc<Inner<B>>,
}

impl<B: Backend> Clone for WizardController<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: Backend> WizardController<B> {
    /// Controller over the standard ParGaMD form.
    pub fn new(
        settings: &Settings,
        backend: B,
        sink: impl DownloadSink,
    ) -> Result<Self, ConfigError> {
        Self::with_form(settings, pargamd_form(), backend, sink)
    }

    /// Controller over a custom form layout.
    pub fn with_form(
        settings: &Settings,
        form: FormModel,
        backend: B,
        sink: impl DownloadSink,
    ) -> Result<Self, ConfigError> {
        settings.validate().map_err(ConfigError::Invalid)?;
        let (revision, _) = watch::channel(0);
        tracing::info!(
            "Wizard ready: {} steps, uploads on step {}, review on step {}",
            settings.wizard.total_steps,
            settings.wizard.upload_step,
            settings.wizard.review_step
        );
        Ok(Self {
            inner: Arc::new(Inner {
                backend,
                sink: Arc::new(sink),
                model: Mutex::new(WizardModel::new(settings, form)),
                revision,
            }),
        })
    }

    fn from_inner(inner: Arc<Inner<B>>) -> Self {
        Self { inner }
    }

    fn downgrade(&self) -> Weak<Inner<B>> {
        Arc::downgrade(&self.inner)
    }

    /// Run a state transition and publish a new revision.
    fn update<R>(&self, f: impl FnOnce(&mut WizardModel) -> R) -> R {
        let result = {
            let mut model = self.inner.model.lock();
            f(&mut *model)
        };
        self.inner.bump();
        result
    }

    fn read<R>(&self, f: impl FnOnce(&WizardModel) -> R) -> R {
        let model = self.inner.model.lock();
        f(&*model)
    }

    // === Notifications ===

    fn notify(&self, kind: NotificationKind, message: impl Into<String>) -> u64 {
        let (id, timeout) = self.update(|m| {
            let id = m.notifications.push(kind, message);
            (id, m.notifications.timeout())
        });
        self.schedule_expiry(timeout);
        id
    }

    fn success(&self, message: impl Into<String>) -> u64 {
        self.notify(NotificationKind::Success, message)
    }

    fn error(&self, message: impl Into<String>) -> u64 {
        self.notify(NotificationKind::Error, message)
    }

    /// Publish a revision once the notification deadline has passed, so
    /// renderers redraw without it.
    fn schedule_expiry(&self, timeout: Duration) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let weak = self.downgrade();
        handle.spawn(async move {
            tokio::time::sleep(timeout).await;
            if let Some(inner) = weak.upgrade() {
                inner.expire_notifications();
            }
        });
    }

    pub fn dismiss_notification(&self, id: u64) -> bool {
        self.update(|m| m.notifications.dismiss(id))
    }

    // === Reading state ===

    /// Current display model. Expired notifications are dropped first.
    pub fn view(&self) -> WizardView {
        self.inner.model.lock().render(Instant::now())
    }

    /// Receiver that changes whenever the view may have changed.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    pub fn current_step(&self) -> usize {
        self.read(|m| m.navigator.state().current_step())
    }

    pub fn upload_record(&self, slot: UploadSlot) -> Option<UploadedFileRecord> {
        self.read(|m| m.uploads.record(slot).cloned())
    }

    /// Fresh snapshot of the form.
    pub fn snapshot(&self) -> FormSnapshot {
        self.read(|m| m.form.snapshot())
    }

    pub fn read_form<R>(&self, f: impl FnOnce(&FormModel) -> R) -> R {
        self.read(|m| f(&m.form))
    }

    // === Form input ===

    pub fn set_field(&self, name: &str, value: &str) -> bool {
        self.update(|m| m.form.set_text(name, value))
    }

    pub fn set_checked(&self, name: &str, checked: bool) -> bool {
        self.update(|m| m.form.set_checked(name, checked))
    }

    /// Validate a single field when it loses focus.
    pub fn blur_field(&self, name: &str) -> Option<bool> {
        self.update(|m| m.form.validate_field(name))
    }

    // === Navigation ===

    /// Move forward one step if the current step validates.
    ///
    /// Entering the review step regenerates the summary and preview; the
    /// returned future completes once that preview has been applied.
    pub async fn advance(&self) -> Advance {
        let outcome = self.update(WizardModel::advance);
        match &outcome {
            Advance::Blocked { error: Some(message) } => {
                self.error(message.clone());
            }
            Advance::Blocked { error: None } => {
                tracing::debug!("Step {} has invalid fields", self.current_step());
            }
            Advance::Moved {
                entered_review: true,
                ..
            } => {
                if let Err(e) = self.generate_configuration_preview().await {
                    tracing::debug!("Review preview failed: {}", e);
                }
            }
            Advance::Moved { .. } | Advance::AtEnd => {}
        }
        outcome
    }

    /// Move back one step. Returns `false` on the first step.
    pub fn retreat(&self) -> bool {
        self.update(WizardModel::retreat)
    }

    // === Uploads ===

    /// Upload a file for a slot.
    ///
    /// The file handle is attached to the form immediately. The confirmed
    /// record is stored only when the server reports success; a failure
    /// leaves any earlier record in place.
    pub async fn handle_upload(
        &self,
        slot: UploadSlot,
        file: LocalFile,
    ) -> WizardResult<UploadedFileRecord> {
        self.update(|m| m.form.attach_file(slot, file.clone()));
        tracing::info!("Uploading {} ({} bytes) as {}", file.name, file.len(), slot);

        match self.inner.backend.upload_file(slot, &file).await {
            Ok(record) => {
                let message = format!("{} uploaded successfully", file.name);
                self.update(|m| m.confirm_upload(slot, record.clone(), message.clone()));
                self.success(message);
                Ok(record)
            }
            Err(e) => {
                self.error(failure_message("File upload failed", &e));
                Err(e.into())
            }
        }
    }

    /// Upload the first dropped file. An empty drop does nothing.
    pub async fn handle_drop(
        &self,
        slot: UploadSlot,
        files: Vec<LocalFile>,
    ) -> Option<WizardResult<UploadedFileRecord>> {
        self.update(|m| m.set_drop_zone(slot, false));
        let file = files.into_iter().next()?;
        Some(self.handle_upload(slot, file).await)
    }

    pub fn drag_over(&self, slot: UploadSlot) {
        self.update(|m| m.set_drop_zone(slot, true));
    }

    pub fn drag_leave(&self, slot: UploadSlot) {
        self.update(|m| m.set_drop_zone(slot, false));
    }

    // === Configuration ===

    /// Rebuild the summary card and preview the default file.
    pub async fn generate_configuration_preview(&self) -> WizardResult<()> {
        let filename = self.update(|m| {
            m.rebuild_summary();
            m.view.preview_file = m.default_preview_file.clone();
            m.default_preview_file.clone()
        });
        self.update_config_preview(&filename).await
    }

    /// Request the rendered text of one configuration file.
    pub async fn update_config_preview(&self, filename: &str) -> WizardResult<()> {
        let params = self.read(WizardModel::preview_params);
        match self.inner.backend.generate_preview(filename, &params).await {
            Ok(content) => {
                self.update(|m| m.view.preview = Some(content));
                Ok(())
            }
            Err(e) => {
                self.error(failure_message("Failed to generate config preview", &e));
                Err(e.into())
            }
        }
    }

    /// Switch the previewed file and regenerate it.
    pub async fn select_preview_file(&self, filename: &str) -> WizardResult<()> {
        self.update(|m| m.view.preview_file = filename.to_string());
        self.update_config_preview(filename).await
    }

    /// Save the current parameters; returns the server-issued id.
    pub async fn save_configuration(&self) -> WizardResult<String> {
        let params = self.snapshot();
        match self.inner.backend.save_config(&params).await {
            Ok(config_id) => {
                self.success(format!("Configuration saved with ID: {}", config_id));
                Ok(config_id)
            }
            Err(e) => {
                self.error(failure_message("Failed to save configuration", &e));
                Err(e.into())
            }
        }
    }

    pub fn open_load_dialog(&self) {
        self.update(|m| m.view.load_dialog.open = true);
    }

    pub fn close_load_dialog(&self) {
        self.update(|m| m.view.load_dialog.open = false);
    }

    pub fn set_config_id_input(&self, config_id: &str) {
        self.update(|m| m.view.load_dialog.config_id = config_id.to_string());
    }

    /// Load the configuration whose id is typed into the load dialog.
    pub async fn load_configuration(&self) -> WizardResult<usize> {
        let config_id = self.read(|m| m.view.load_dialog.config_id.clone());
        self.load_configuration_by_id(&config_id).await
    }

    /// Load a saved configuration into the form.
    ///
    /// Returns how many fields were written. The preview is regenerated
    /// before this returns; its failure is reported separately.
    pub async fn load_configuration_by_id(&self, config_id: &str) -> WizardResult<usize> {
        if config_id.is_empty() {
            self.error(MISSING_CONFIG_ID);
            return Err(WizardError::validation(MISSING_CONFIG_ID));
        }

        let config = match self.inner.backend.load_config(config_id).await {
            Ok(config) => config,
            Err(e) => {
                self.error(failure_message("Failed to load configuration", &e));
                return Err(e.into());
            }
        };

        let (applied, filename) = self.update(|m| {
            let applied = m.form.apply_config(&config);
            m.rebuild_summary();
            m.view.preview_file = m.default_preview_file.clone();
            (applied, m.default_preview_file.clone())
        });
        tracing::info!("Loaded configuration {} ({} fields)", config_id, applied);
        self.success("Configuration loaded successfully");
        self.close_load_dialog();

        if let Err(e) = self.update_config_preview(&filename).await {
            tracing::debug!("Preview after load failed: {}", e);
        }
        Ok(applied)
    }

    /// Download the configuration bundle and hand it to the sink.
    pub async fn download_bundle(&self) -> WizardResult<PathBuf> {
        let params = self.read(WizardModel::preview_params);
        let data = match self.inner.backend.download_bundle(&params).await {
            Ok(data) => data,
            Err(BackendError::Status { status, body }) => {
                self.error(format!("Failed to download ZIP: {}", body));
                return Err(BackendError::Status { status, body }.into());
            }
            Err(e) => {
                self.error(format!("Error downloading ZIP: {}", e));
                return Err(e.into());
            }
        };

        let filename = format!(
            "ParGaMD_configs_{}.zip",
            chrono::Utc::now().timestamp_millis()
        );
        match self.inner.sink.save_as(&filename, data).await {
            Ok(path) => {
                tracing::info!("Saved configuration bundle to {}", path.display());
                self.update(|m| m.view.last_download = Some(path.clone()));
                Ok(path)
            }
            Err(e) => {
                self.error(format!("Error downloading ZIP: {}", e));
                Err(e.into())
            }
        }
    }

    // === Experiment ===

    /// Validate the experiment setup. Job submission is turned off, so a
    /// valid setup is reported as disabled and nothing is sent.
    pub fn start_experiment(&self) -> WizardResult<()> {
        if let Err(message) = self.read(WizardModel::check_experiment_setup) {
            self.error(message.clone());
            return Err(WizardError::Validation(message));
        }
        self.error(START_DISABLED);
        Err(WizardError::Disabled(START_DISABLED.to_string()))
    }

    // === Live status ===

    /// Apply one push event. Last write wins.
    pub fn apply_push_event(&self, event: &PushEvent) {
        match event {
            PushEvent::JobStatus(update) => self.update(|m| m.apply_job_status(update)),
            PushEvent::Iteration(progress) => self.update(|m| m.apply_iteration(progress)),
            PushEvent::Error(message) => {
                self.error(message.clone());
            }
        }
    }

    /// Feed a push-event stream into this controller until the returned
    /// handle is shut down or dropped.
    pub fn subscribe_push<S>(&self, events: S) -> StatusSubscription
    where
        S: Stream<Item = PushEvent> + Send + 'static,
    {
        let weak = self.downgrade();
        StatusSubscription::spawn(events, move |event| match weak.upgrade() {
            Some(inner) => {
                Self::from_inner(inner).apply_push_event(&event);
                true
            }
            None => false,
        })
    }

    // === Messages ===

    /// Route a renderer message to its operation.
    ///
    /// Failures are already reported as notifications, so results are
    /// dropped here.
    pub async fn dispatch(&self, msg: WizardMsg) {
        match msg {
            WizardMsg::Next => {
                self.advance().await;
            }
            WizardMsg::Prev => {
                self.retreat();
            }
            WizardMsg::FieldChanged { name, value } => {
                self.set_field(&name, &value);
            }
            WizardMsg::CheckboxToggled { name, checked } => {
                self.set_checked(&name, checked);
            }
            WizardMsg::FieldBlurred(name) => {
                self.blur_field(&name);
            }
            WizardMsg::FilePicked { slot, file } => {
                let _ = self.handle_upload(slot, file).await;
            }
            WizardMsg::FilesDropped { slot, files } => {
                let _ = self.handle_drop(slot, files).await;
            }
            WizardMsg::DragOver(slot) => self.drag_over(slot),
            WizardMsg::DragLeave(slot) => self.drag_leave(slot),
            WizardMsg::SelectPreview(filename) => {
                let _ = self.select_preview_file(&filename).await;
            }
            WizardMsg::SaveConfig => {
                let _ = self.save_configuration().await;
            }
            WizardMsg::OpenLoadDialog => self.open_load_dialog(),
            WizardMsg::CloseLoadDialog => self.close_load_dialog(),
            WizardMsg::ConfigIdChanged(config_id) => self.set_config_id_input(&config_id),
            WizardMsg::ConfirmLoad => {
                let _ = self.load_configuration().await;
            }
            WizardMsg::DownloadBundle => {
                let _ = self.download_bundle().await;
            }
            WizardMsg::StartExperiment => {
                let _ = self.start_experiment();
            }
            WizardMsg::DismissNotification(id) => {
                self.dismiss_notification(id);
            }
        }
    }
}
