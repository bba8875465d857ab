//! Bound form fields.
//!
//! `FormModel` is the source of truth for every value the user entered. The
//! wizard never caches values elsewhere; it takes a fresh [`FormSnapshot`]
//! whenever a request needs them.

mod field;
pub mod layout;
mod snapshot;

use std::collections::BTreeMap;

use serde_json::Value;

pub use field::{Field, FieldKind, FieldValue};
pub use layout::pargamd_form;
pub use snapshot::FormSnapshot;

use crate::models::{LocalFile, SavedConfiguration, UploadSlot};

#[derive(Debug, Clone, Default)]
pub struct FormModel {
    fields: Vec<Field>,
    files: BTreeMap<UploadSlot, LocalFile>,
}

impl FormModel {
    pub fn new(fields: Vec<Field>) -> Self {
        Self {
            fields,
            files: BTreeMap::new(),
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// Text value of a non-checkbox field.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Field::text_value)
    }

    /// Checked state of a checkbox field.
    pub fn is_checked(&self, name: &str) -> Option<bool> {
        self.field(name).and_then(Field::is_checked)
    }

    /// Set a text value. Returns `false` for unknown names and checkboxes.
    pub fn set_text(&mut self, name: &str, value: &str) -> bool {
        self.field_mut(name).map_or(false, |f| f.set_text(value))
    }

    /// Set a checkbox. Returns `false` for unknown names and non-checkboxes.
    pub fn set_checked(&mut self, name: &str, checked: bool) -> bool {
        self.field_mut(name).map_or(false, |f| f.set_checked(checked))
    }

    /// Validate one field (blur), updating its invalid marker.
    pub fn validate_field(&mut self, name: &str) -> Option<bool> {
        self.field_mut(name).map(Field::validate)
    }

    /// Validate the required fields of one section.
    ///
    /// Every required field is checked (and marked) even after the first
    /// failure; fields outside the section are left untouched.
    pub fn validate_section(&mut self, section: usize) -> bool {
        let mut valid = true;
        for field in self
            .fields
            .iter_mut()
            .filter(|f| f.section == section && f.required)
        {
            if !field.validate() {
                valid = false;
            }
        }
        valid
    }

    /// Names of fields currently marked invalid.
    pub fn invalid_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.is_invalid())
            .map(|f| f.name.as_str())
    }

    /// Attach the raw file handle picked for a slot.
    pub fn attach_file(&mut self, slot: UploadSlot, file: LocalFile) {
        self.files.insert(slot, file);
    }

    pub fn file(&self, slot: UploadSlot) -> Option<&LocalFile> {
        self.files.get(&slot)
    }

    /// Write a saved configuration back into matching fields.
    ///
    /// Keys without a matching field are ignored. Returns how many fields
    /// were written.
    pub fn apply_config(&mut self, config: &SavedConfiguration) -> usize {
        let mut applied = 0;
        for (key, value) in config {
            if let Some(field) = self.field_mut(key) {
                field.assign(value);
                applied += 1;
            } else {
                tracing::debug!("Ignoring saved key without a field: {}", key);
            }
        }
        applied
    }

    /// Take a fresh snapshot of all values and attached files.
    pub fn snapshot(&self) -> FormSnapshot {
        let mut values: BTreeMap<String, Value> = self
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.to_json()))
            .collect();

        values.insert(
            layout::ENABLE_GPU_PARALLELIZATION.to_string(),
            Value::Bool(
                self.is_checked(layout::ENABLE_GPU_PARALLELIZATION)
                    .unwrap_or(false),
            ),
        );

        FormSnapshot::new(values, self.files.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::layout::*;
    use super::*;
    use serde_json::json;

    #[test]
    fn default_layout_covers_six_steps() {
        let form = pargamd_form();
        let max_section = form.fields().iter().map(|f| f.section).max().unwrap();
        assert_eq!(max_section, 5);
        assert_eq!(form.text(NSTLIM), Some("50000"));
        assert_eq!(form.is_checked(INCLUDE_INFINITE_BOUNDS), Some(true));
        assert_eq!(form.is_checked(ENABLE_GPU_PARALLELIZATION), Some(false));
    }

    #[test]
    fn validate_section_only_touches_that_section() {
        let mut form = pargamd_form();
        form.set_text(NSTLIM, "");

        assert!(!form.validate_section(1));
        let invalid: Vec<&str> = form.invalid_fields().collect();
        assert_eq!(invalid, vec![ACCOUNT, EMAIL]);
        assert!(!form.field(NSTLIM).unwrap().is_invalid());
    }

    #[test]
    fn validate_section_clears_markers_once_fixed() {
        let mut form = pargamd_form();
        assert!(!form.validate_section(1));

        form.set_text(ACCOUNT, "TG-MCB1234");
        form.set_text(EMAIL, "user@ucsd.edu");
        assert!(form.validate_section(1));
        assert_eq!(form.invalid_fields().count(), 0);
    }

    #[test]
    fn validate_field_marks_single_field() {
        let mut form = pargamd_form();
        assert_eq!(form.validate_field(EMAIL), Some(false));
        assert_eq!(form.validate_field("nope"), None);
        assert_eq!(form.invalid_fields().collect::<Vec<_>>(), vec![EMAIL]);
    }

    #[test]
    fn snapshot_reflects_current_values() {
        let mut form = pargamd_form();
        form.set_text(PROTEIN_NAME, "T4L");
        form.set_checked(ENABLE_GPU_PARALLELIZATION, true);
        form.attach_file(UploadSlot::Prmtop, LocalFile::new("t4l.prmtop", "%VERSION"));

        let first = form.snapshot();
        assert_eq!(first.text(PROTEIN_NAME), "T4L");
        assert!(first.flag(ENABLE_GPU_PARALLELIZATION));
        assert!(first.file(UploadSlot::Prmtop).is_some());

        form.set_text(PROTEIN_NAME, "BPTI");
        assert_eq!(form.snapshot().text(PROTEIN_NAME), "BPTI");
        assert_eq!(first.text(PROTEIN_NAME), "T4L");
    }

    #[test]
    fn apply_config_writes_matching_fields() {
        let mut form = pargamd_form();
        let config = json!({
            "protein_name": "T4L",
            "enable_gpu_parallelization": true,
            "max_total_iterations": 250,
            "session_token": "ignored"
        });

        let applied = form.apply_config(config.as_object().unwrap());

        assert_eq!(applied, 3);
        assert_eq!(form.text(PROTEIN_NAME), Some("T4L"));
        assert_eq!(form.is_checked(ENABLE_GPU_PARALLELIZATION), Some(true));
        assert_eq!(form.text(MAX_TOTAL_ITERATIONS), Some("250"));
        assert!(form.field("session_token").is_none());
    }
}
