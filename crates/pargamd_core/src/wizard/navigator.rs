//! Step navigation: current step, validation gate, display markers.
//!
//! The navigator only computes the next state; applying it to the view is
//! the controller's job.

use crate::form::FormModel;

use super::uploads::UploadTracker;

/// Error shown when the upload step is left without both files confirmed.
pub const MISSING_UPLOADS: &str = "Please upload both PDB and PRMTOP files";

/// Display marker of one step indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMarker {
    Plain,
    Active,
    Completed,
}

/// Position in the wizard, always within `1..=total_steps`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardState {
    current_step: usize,
    total_steps: usize,
}

impl WizardState {
    pub fn new(total_steps: usize) -> Self {
        Self {
            current_step: 1,
            total_steps: total_steps.max(1),
        }
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn is_first(&self) -> bool {
        self.current_step == 1
    }

    pub fn is_last(&self) -> bool {
        self.current_step == self.total_steps
    }

    /// Marker for a 1-based step index.
    pub fn marker(&self, step: usize) -> StepMarker {
        if step == self.current_step {
            StepMarker::Active
        } else if step < self.current_step {
            StepMarker::Completed
        } else {
            StepMarker::Plain
        }
    }

    fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current_step += 1;
        true
    }

    fn prev(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.current_step -= 1;
        true
    }
}

/// Outcome of a forward navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Validation failed. `error` is the consolidated message, if any;
    /// field-level failures are reported through the invalid markers only.
    Blocked { error: Option<String> },
    /// Already on the final step.
    AtEnd,
    /// Moved one step forward.
    Moved { step: usize, entered_review: bool },
}

#[derive(Debug, Clone)]
pub struct StepNavigator {
    state: WizardState,
    upload_step: usize,
    review_step: usize,
}

impl StepNavigator {
    pub fn new(total_steps: usize, upload_step: usize, review_step: usize) -> Self {
        Self {
            state: WizardState::new(total_steps),
            upload_step,
            review_step,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn upload_step(&self) -> usize {
        self.upload_step
    }

    pub fn review_step(&self) -> usize {
        self.review_step
    }

    /// Check the visible section.
    ///
    /// Every required field of the current section is checked and marked.
    /// On the upload step both slots must also hold a confirmed record.
    pub fn validate_current_step(
        &self,
        form: &mut FormModel,
        uploads: &UploadTracker,
    ) -> Result<(), Option<String>> {
        let step = self.state.current_step();
        let fields_valid = form.validate_section(step);

        if step == self.upload_step && !uploads.has_all() {
            return Err(Some(MISSING_UPLOADS.to_string()));
        }

        if fields_valid {
            Ok(())
        } else {
            Err(None)
        }
    }

    pub fn advance(&mut self, form: &mut FormModel, uploads: &UploadTracker) -> Advance {
        if let Err(error) = self.validate_current_step(form, uploads) {
            return Advance::Blocked { error };
        }
        if !self.state.next() {
            return Advance::AtEnd;
        }
        let step = self.state.current_step();
        Advance::Moved {
            step,
            entered_review: step == self.review_step,
        }
    }

    /// Move back one step. Returns `false` on the first step.
    pub fn retreat(&mut self) -> bool {
        self.state.prev()
    }
}
