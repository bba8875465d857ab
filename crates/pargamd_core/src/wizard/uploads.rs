//! Confirmed upload records, kept apart from the raw form file inputs.

use std::collections::BTreeMap;

use crate::models::{UploadSlot, UploadedFileRecord};

/// Slot -> server metadata, populated only on confirmed success.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadTracker {
    records: BTreeMap<UploadSlot, UploadedFileRecord>,
}

impl UploadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a confirmed record, returning the one it replaced.
    pub fn confirm(
        &mut self,
        slot: UploadSlot,
        record: UploadedFileRecord,
    ) -> Option<UploadedFileRecord> {
        self.records.insert(slot, record)
    }

    pub fn record(&self, slot: UploadSlot) -> Option<&UploadedFileRecord> {
        self.records.get(&slot)
    }

    pub fn filename(&self, slot: UploadSlot) -> Option<&str> {
        self.record(slot).map(|r| r.filename.as_str())
    }

    pub fn has_all(&self) -> bool {
        UploadSlot::ALL.iter().all(|s| self.records.contains_key(s))
    }

    pub fn missing(&self) -> Vec<UploadSlot> {
        UploadSlot::ALL
            .into_iter()
            .filter(|s| !self.records.contains_key(s))
            .collect()
    }
}
