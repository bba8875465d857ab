//! Seams to the outside world: the backend server and the save-as target.
//!
//! The wizard only talks to these traits. `pargamd_client` provides the
//! HTTP implementation; tests use in-memory fakes.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::form::FormSnapshot;
use crate::models::{LocalFile, SavedConfiguration, UploadSlot, UploadedFileRecord};

/// Failure of a backend request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The server answered `success: false`; the text is shown verbatim.
    #[error("{0}")]
    Rejected(String),

    /// The request could not be sent or the response could not be read.
    #[error("{0}")]
    Transport(String),

    /// Non-success HTTP status on the binary download path.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the expected JSON shape.
    #[error("{0}")]
    Decode(String),
}

/// The backend endpoints consumed by the wizard.
#[async_trait]
pub trait Backend: Send + Sync + 'static {
    /// Upload one file under its slot's field name.
    async fn upload_file(
        &self,
        slot: UploadSlot,
        file: &LocalFile,
    ) -> Result<UploadedFileRecord, BackendError>;

    /// Render one configuration file from the current parameters.
    async fn generate_preview(
        &self,
        filename: &str,
        params: &FormSnapshot,
    ) -> Result<String, BackendError>;

    /// Store the parameters; returns the server-issued configuration id.
    async fn save_config(&self, params: &FormSnapshot) -> Result<String, BackendError>;

    /// Fetch a previously saved configuration.
    async fn load_config(&self, config_id: &str) -> Result<SavedConfiguration, BackendError>;

    /// Request the zipped configuration bundle.
    async fn download_bundle(&self, params: &FormSnapshot) -> Result<Bytes, BackendError>;
}

#[async_trait]
impl<T: Backend + ?Sized> Backend for Arc<T> {
    async fn upload_file(
        &self,
        slot: UploadSlot,
        file: &LocalFile,
    ) -> Result<UploadedFileRecord, BackendError> {
        (**self).upload_file(slot, file).await
    }

    async fn generate_preview(
        &self,
        filename: &str,
        params: &FormSnapshot,
    ) -> Result<String, BackendError> {
        (**self).generate_preview(filename, params).await
    }

    async fn save_config(&self, params: &FormSnapshot) -> Result<String, BackendError> {
        (**self).save_config(params).await
    }

    async fn load_config(&self, config_id: &str) -> Result<SavedConfiguration, BackendError> {
        (**self).load_config(config_id).await
    }

    async fn download_bundle(&self, params: &FormSnapshot) -> Result<Bytes, BackendError> {
        (**self).download_bundle(params).await
    }
}

/// Failure while handing a downloaded bundle to the user.
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Downloaded bundle is not a valid archive: {0}")]
    InvalidArchive(String),

    /// The background save task panicked or was cancelled.
    #[error("Save task failed: {0}")]
    Task(String),
}

/// Target of the client-side save-as flow.
///
/// The sink takes ownership of the bundle buffer; it is released when
/// `save_as` returns. Implementations that touch the filesystem keep the
/// blocking work off the async runtime.
#[async_trait]
pub trait DownloadSink: Send + Sync + 'static {
    /// Persist `data` under `filename`, returning where it was written.
    async fn save_as(&self, filename: &str, data: Bytes) -> Result<PathBuf, DownloadError>;
}

#[async_trait]
impl<T: DownloadSink + ?Sized> DownloadSink for Arc<T> {
    async fn save_as(&self, filename: &str, data: Bytes) -> Result<PathBuf, DownloadError> {
        (**self).save_as(filename, data).await
    }
}
