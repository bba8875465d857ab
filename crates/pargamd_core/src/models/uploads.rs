//! Upload slots, raw file handles and confirmed upload records.

use std::fmt;
use std::io;
use std::path::Path;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One of the two fixed upload targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UploadSlot {
    /// Structure file (`.pdb`).
    #[serde(rename = "pdb_file")]
    Pdb,
    /// Topology file (`.prmtop`).
    #[serde(rename = "prmtop_file")]
    Prmtop,
}

impl UploadSlot {
    pub const ALL: [UploadSlot; 2] = [UploadSlot::Pdb, UploadSlot::Prmtop];

    /// Multipart field name the backend expects for this slot.
    pub fn field_name(&self) -> &'static str {
        match self {
            UploadSlot::Pdb => "pdb_file",
            UploadSlot::Prmtop => "prmtop_file",
        }
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        match name {
            "pdb_file" => Some(UploadSlot::Pdb),
            "prmtop_file" => Some(UploadSlot::Prmtop),
            _ => None,
        }
    }

    /// Short label used in summaries.
    pub fn label(&self) -> &'static str {
        match self {
            UploadSlot::Pdb => "PDB",
            UploadSlot::Prmtop => "PRMTOP",
        }
    }
}

impl fmt::Display for UploadSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// Server-side metadata for a confirmed upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFileRecord {
    pub file_path: String,
    pub filename: String,
    pub file_type: String,
}

/// A file picked or dropped by the user, not yet confirmed by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub name: String,
    pub bytes: Bytes,
    pub mime: Option<String>,
}

impl LocalFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
            mime: None,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// Read a file from disk, named after its final path component.
    pub async fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_field_names_round_trip() {
        for slot in UploadSlot::ALL {
            assert_eq!(UploadSlot::from_field_name(slot.field_name()), Some(slot));
        }
        assert_eq!(UploadSlot::from_field_name("pdb"), None);
    }

    #[test]
    fn slot_serializes_as_wire_name() {
        let json = serde_json::to_string(&UploadSlot::Prmtop).unwrap();
        assert_eq!(json, "\"prmtop_file\"");
    }

    #[tokio::test]
    async fn from_path_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t4l.pdb");
        std::fs::write(&path, b"HEADER").unwrap();

        let file = LocalFile::from_path(&path).await.unwrap();
        assert_eq!(file.name, "t4l.pdb");
        assert_eq!(file.len(), 6);
        assert!(file.mime.is_none());
    }
}
