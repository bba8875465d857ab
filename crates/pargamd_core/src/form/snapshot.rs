//! Point-in-time copy of the form, sent with every backend request.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::models::{LocalFile, UploadSlot};

/// Every named field with its value at the time the snapshot was taken.
///
/// Checkbox fields are booleans, everything else is the literal text.
/// Attached file handles travel alongside but are never serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormSnapshot {
    #[serde(flatten)]
    values: BTreeMap<String, Value>,
    #[serde(skip)]
    files: BTreeMap<UploadSlot, LocalFile>,
}

impl FormSnapshot {
    pub(crate) fn new(
        values: BTreeMap<String, Value>,
        files: BTreeMap<UploadSlot, LocalFile>,
    ) -> Self {
        Self { values, files }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Display text of a value; empty when the field is absent.
    pub fn text(&self, name: &str) -> String {
        match self.values.get(name) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }

    /// Boolean flag; absent or non-boolean values read as `false`.
    pub fn flag(&self, name: &str) -> bool {
        self.values
            .get(name)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Return a copy with a boolean flag set explicitly.
    pub fn with_flag(mut self, name: &str, value: bool) -> Self {
        self.values.insert(name.to_string(), Value::Bool(value));
        self
    }

    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    pub fn file(&self, slot: UploadSlot) -> Option<&LocalFile> {
        self.files.get(&slot)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> FormSnapshot {
        let mut values = BTreeMap::new();
        values.insert("protein_name".to_string(), json!("T4L"));
        values.insert("enable_gpu_parallelization".to_string(), json!(true));
        let mut files = BTreeMap::new();
        files.insert(UploadSlot::Pdb, LocalFile::new("t4l.pdb", "ATOM"));
        FormSnapshot::new(values, files)
    }

    #[test]
    fn serializes_values_flat_without_files() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            json,
            json!({"protein_name": "T4L", "enable_gpu_parallelization": true})
        );
    }

    #[test]
    fn accessors_read_values() {
        let snapshot = sample();
        assert_eq!(snapshot.text("protein_name"), "T4L");
        assert_eq!(snapshot.text("missing"), "");
        assert!(snapshot.flag("enable_gpu_parallelization"));
        assert!(!snapshot.flag("protein_name"));
        assert_eq!(snapshot.file(UploadSlot::Pdb).unwrap().name, "t4l.pdb");
        assert!(snapshot.file(UploadSlot::Prmtop).is_none());
    }

    #[test]
    fn with_flag_overrides() {
        let snapshot = sample().with_flag("include_infinite_bounds", false);
        assert_eq!(snapshot.get("include_infinite_bounds"), Some(&json!(false)));
        assert_eq!(snapshot.len(), 3);
    }
}
