//! Display model of the wizard.
//!
//! Everything a renderer needs to draw the page lives here. The controller
//! mutates it; renderers only read it.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::models::UploadSlot;

use super::navigator::{StepMarker, WizardState};
use super::notifications::Notification;
use super::status::{ProgressView, StatusPanel};
use super::summary::SummaryCard;

/// Load-configuration dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadDialog {
    pub open: bool,
    pub config_id: String,
}

#[derive(Debug, Clone)]
pub struct WizardView {
    /// Marker per step indicator, index 0 is step 1.
    pub steps: Vec<StepMarker>,
    /// Active flag per form section, index 0 is step 1.
    pub sections: Vec<bool>,
    pub prev_visible: bool,
    pub next_visible: bool,
    pub invalid_fields: Vec<String>,
    /// Confirmation text per slot, set on successful upload.
    pub upload_indicators: BTreeMap<UploadSlot, String>,
    /// Drag-over highlight per drop zone.
    pub active_drop_zones: BTreeMap<UploadSlot, bool>,
    pub summary: SummaryCard,
    pub preview_file: String,
    pub preview: Option<String>,
    pub status: StatusPanel,
    pub progress: ProgressView,
    pub load_dialog: LoadDialog,
    pub last_download: Option<PathBuf>,
    pub notifications: Vec<Notification>,
}

impl WizardView {
    pub fn new(state: &WizardState, preview_file: &str) -> Self {
        let mut view = Self {
            steps: Vec::new(),
            sections: Vec::new(),
            prev_visible: false,
            next_visible: false,
            invalid_fields: Vec::new(),
            upload_indicators: BTreeMap::new(),
            active_drop_zones: UploadSlot::ALL.into_iter().map(|s| (s, false)).collect(),
            summary: SummaryCard::default(),
            preview_file: preview_file.to_string(),
            preview: None,
            status: StatusPanel::ready(),
            progress: ProgressView::default(),
            load_dialog: LoadDialog::default(),
            last_download: None,
            notifications: Vec::new(),
        };
        view.apply_navigation(state);
        view
    }

    /// Recompute step markers, section visibility and button visibility.
    ///
    /// Idempotent: applying the same state twice yields the same view.
    pub fn apply_navigation(&mut self, state: &WizardState) {
        let total = state.total_steps();
        let current = state.current_step();
        self.steps = (1..=total).map(|step| state.marker(step)).collect();
        self.sections = (1..=total).map(|step| step == current).collect();
        self.prev_visible = !state.is_first();
        self.next_visible = !state.is_last();
    }

    pub fn current_section(&self) -> Option<usize> {
        self.sections.iter().position(|active| *active).map(|i| i + 1)
    }

    pub fn is_drop_zone_active(&self, slot: UploadSlot) -> bool {
        self.active_drop_zones.get(&slot).copied().unwrap_or(false)
    }

    pub fn upload_indicator(&self, slot: UploadSlot) -> Option<&str> {
        self.upload_indicators.get(&slot).map(String::as_str)
    }

    /// Message texts of the active notifications, oldest first.
    pub fn notification_messages(&self) -> Vec<&str> {
        self.notifications.iter().map(|n| n.message.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_step_hides_prev() {
        let view = WizardView::new(&WizardState::new(6), "west.cfg");
        assert_eq!(view.steps.len(), 6);
        assert_eq!(view.steps[0], StepMarker::Active);
        assert_eq!(view.current_section(), Some(1));
        assert!(!view.prev_visible);
        assert!(view.next_visible);
        assert!(!view.is_drop_zone_active(UploadSlot::Pdb));
    }

    #[test]
    fn single_step_wizard_hides_both_buttons() {
        let view = WizardView::new(&WizardState::new(1), "west.cfg");
        assert!(!view.prev_visible);
        assert!(!view.next_visible);
        assert_eq!(view.sections, vec![true]);
    }

    #[test]
    fn apply_navigation_is_idempotent() {
        let state = WizardState::new(6);
        let mut view = WizardView::new(&state, "west.cfg");
        let before = (view.steps.clone(), view.sections.clone());
        view.apply_navigation(&state);
        view.apply_navigation(&state);
        assert_eq!((view.steps, view.sections), before);
    }
}
