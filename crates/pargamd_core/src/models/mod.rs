//! Data models for the setup wizard.
//!
//! - Upload slots, raw file handles and confirmed upload records
//! - Job status and iteration progress received on the push channel
//! - Request/reply shapes of the backend endpoints

mod api;
mod status;
mod uploads;

pub use api::{
    decode_reply, BundleRequest, LoadReply, LoadRequest, PreviewReply, PreviewRequest, SaveReply,
    SavedConfiguration,
};
pub use status::{IterationProgress, JobId, JobStatus, JobStatusUpdate, PushEvent};
pub use uploads::{LocalFile, UploadSlot, UploadedFileRecord};
