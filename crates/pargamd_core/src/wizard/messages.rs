//! Wizard messages (user events)

use crate::models::{LocalFile, UploadSlot};

/// Messages a renderer sends to the controller
#[derive(Debug, Clone)]
pub enum WizardMsg {
    // === Navigation ===
    /// "Next" button clicked
    Next,

    /// "Previous" button clicked
    Prev,

    // === Form input ===
    /// Text, number or select field edited
    FieldChanged { name: String, value: String },

    /// Checkbox toggled
    CheckboxToggled { name: String, checked: bool },

    /// Field lost focus
    FieldBlurred(String),

    // === Uploads ===
    /// File picker returned a file
    FilePicked { slot: UploadSlot, file: LocalFile },

    /// Files dropped on a drop zone (only the first is used)
    FilesDropped { slot: UploadSlot, files: Vec<LocalFile> },

    /// Drag entered a drop zone
    DragOver(UploadSlot),

    /// Drag left a drop zone
    DragLeave(UploadSlot),

    // === Configuration ===
    /// Preview file selector changed
    SelectPreview(String),

    /// "Save Configuration" clicked
    SaveConfig,

    /// "Load Configuration" clicked
    OpenLoadDialog,

    /// Load dialog dismissed
    CloseLoadDialog,

    /// Config id input edited
    ConfigIdChanged(String),

    /// Load dialog confirmed
    ConfirmLoad,

    /// "Download ZIP" clicked
    DownloadBundle,

    /// "Start Experiment" clicked
    StartExperiment,

    /// Notification close button clicked
    DismissNotification(u64),
}
