//! HTTP implementation of the wizard backend.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use pargamd_core::backend::{Backend, BackendError};
use pargamd_core::config::BackendSettings;
use pargamd_core::form::FormSnapshot;
use pargamd_core::models::{
    decode_reply, BundleRequest, LoadReply, LoadRequest, LocalFile, PreviewReply, PreviewRequest,
    SaveReply, SavedConfiguration, UploadSlot, UploadedFileRecord,
};

fn transport(e: reqwest::Error) -> BackendError {
    BackendError::Transport(e.to_string())
}

/// Error for a non-success response. A body that cannot be read is a
/// transport failure, not an empty message.
pub(crate) fn status_error<E: std::fmt::Display>(
    status: StatusCode,
    body: Result<String, E>,
) -> BackendError {
    match body {
        Ok(body) => BackendError::Status {
            status: status.as_u16(),
            body,
        },
        Err(e) => {
            warn!("Could not read body of HTTP {} response: {}", status, e);
            BackendError::Transport(format!("HTTP {}: {}", status, e))
        }
    }
}

/// Talks to the wizard backend over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    settings: BackendSettings,
}

impl HttpBackend {
    /// Build a client with the configured request timeout.
    pub fn new(settings: BackendSettings) -> Result<Self, BackendError> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(transport)?;
        Ok(Self::with_client(client, settings))
    }

    /// Use an existing client (shared connection pool, custom TLS, ...).
    pub fn with_client(client: Client, settings: BackendSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &BackendSettings {
        &self.settings
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Decode a JSON reply. The `success` flag decides, not the HTTP status.
    async fn read_reply<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
        let status = response.status();
        let body = response.bytes().await.map_err(transport)?;
        if !status.is_success() {
            debug!("Backend answered HTTP {}", status);
        }
        decode_reply(&body)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.settings.endpoint(path);
        debug!("POST {}", url);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        Self::read_reply(response).await
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn upload_file(
        &self,
        slot: UploadSlot,
        file: &LocalFile,
    ) -> Result<UploadedFileRecord, BackendError> {
        let mut part = Part::bytes(file.bytes.to_vec()).file_name(file.name.clone());
        if let Some(mime) = &file.mime {
            part = part.mime_str(mime).map_err(transport)?;
        }
        let form = Form::new().part(slot.field_name(), part);

        let url = self.settings.endpoint(&self.settings.upload_path);
        debug!("POST {} ({} as {})", url, file.name, slot);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;
        Self::read_reply(response).await
    }

    async fn generate_preview(
        &self,
        filename: &str,
        params: &FormSnapshot,
    ) -> Result<String, BackendError> {
        let request = PreviewRequest { filename, params };
        let reply: PreviewReply = self.post_json(&self.settings.preview_path, &request).await?;
        Ok(reply.content)
    }

    async fn save_config(&self, params: &FormSnapshot) -> Result<String, BackendError> {
        let reply: SaveReply = self.post_json(&self.settings.save_path, params).await?;
        Ok(reply.config_id)
    }

    async fn load_config(&self, config_id: &str) -> Result<SavedConfiguration, BackendError> {
        let request = LoadRequest { config_id };
        let reply: LoadReply = self.post_json(&self.settings.load_path, &request).await?;
        Ok(reply.config)
    }

    async fn download_bundle(&self, params: &FormSnapshot) -> Result<Bytes, BackendError> {
        let url = self.settings.endpoint(&self.settings.bundle_path);
        debug!("POST {}", url);
        let response = self
            .client
            .post(&url)
            .json(&BundleRequest { params })
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            warn!("Bundle download failed: HTTP {}", status);
            return Err(status_error(status, response.text().await));
        }

        let data = response.bytes().await.map_err(transport)?;
        debug!("Received bundle of {} bytes", data.len());
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn unreadable_error_body_is_a_transport_failure() {
        let err = status_error(StatusCode::BAD_GATEWAY, Err("connection reset"));
        assert_eq!(
            err,
            BackendError::Transport("HTTP 502 Bad Gateway: connection reset".into())
        );
        assert!(!err.to_string().is_empty());

        let err = status_error::<&str>(StatusCode::NOT_FOUND, Ok("missing".into()));
        assert_eq!(
            err,
            BackendError::Status {
                status: 404,
                body: "missing".into()
            }
        );
    }
    use pargamd_core::form::layout::{INCLUDE_INFINITE_BOUNDS, PROTEIN_NAME};
    use pargamd_core::form::pargamd_form;
    use serde_json::json;

    fn backend_for(server: &MockServer) -> HttpBackend {
        let settings = BackendSettings {
            base_url: server.base_url(),
            ..BackendSettings::default()
        };
        HttpBackend::new(settings).unwrap()
    }

    fn params() -> FormSnapshot {
        let mut form = pargamd_form();
        form.set_text(PROTEIN_NAME, "T4L");
        form.snapshot()
    }

    #[tokio::test]
    async fn upload_sends_multipart_under_slot_name() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/upload_files")
                    .body_contains("name=\"prmtop_file\"")
                    .body_contains("filename=\"t4l.prmtop\"");
                then.status(200).json_body(json!({
                    "success": true,
                    "file_path": "uploads/t4l.prmtop",
                    "filename": "t4l.prmtop",
                    "file_type": "prmtop_file"
                }));
            })
            .await;

        let record = backend_for(&server)
            .upload_file(UploadSlot::Prmtop, &LocalFile::new("t4l.prmtop", "%VERSION"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(record.file_path, "uploads/t4l.prmtop");
        assert_eq!(record.file_type, "prmtop_file");
    }

    #[tokio::test]
    async fn upload_rejection_carries_server_text() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/upload_files");
                then.status(400)
                    .json_body(json!({"success": false, "error": "Invalid file type"}));
            })
            .await;

        let err = backend_for(&server)
            .upload_file(UploadSlot::Pdb, &LocalFile::new("t4l.txt", "x"))
            .await
            .unwrap_err();

        assert_eq!(err, BackendError::Rejected("Invalid file type".into()));
    }

    #[tokio::test]
    async fn preview_posts_filename_and_params() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/generate_config_preview")
                    .json_body_partial(r#"{"filename": "west.cfg", "params": {"protein_name": "T4L"}}"#);
                then.status(200)
                    .json_body(json!({"success": true, "content": "west:\n  system: {}"}));
            })
            .await;

        let content = backend_for(&server)
            .generate_preview("west.cfg", &params())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(content, "west:\n  system: {}");
    }

    #[tokio::test]
    async fn save_posts_flat_params() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/save_config")
                    .json_body_partial(r#"{"protein_name": "T4L", "enable_gpu_parallelization": false}"#);
                then.status(200)
                    .json_body(json!({"success": true, "config_id": "3f2a"}));
            })
            .await;

        let id = backend_for(&server).save_config(&params()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(id, "3f2a");
    }

    #[tokio::test]
    async fn load_returns_config_map() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/load_config")
                    .json_body(json!({"config_id": "3f2a"}));
                then.status(200).json_body(json!({
                    "success": true,
                    "config": {"protein_name": "T4L", "max_total_iterations": 250}
                }));
            })
            .await;

        let config = backend_for(&server).load_config("3f2a").await.unwrap();

        assert_eq!(config.get("protein_name"), Some(&json!("T4L")));
        assert_eq!(config.get("max_total_iterations"), Some(&json!(250)));
    }

    #[tokio::test]
    async fn malformed_reply_is_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/load_config");
                then.status(500).body("<html>Internal Server Error</html>");
            })
            .await;

        let err = backend_for(&server).load_config("3f2a").await.unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
    }

    #[tokio::test]
    async fn bundle_returns_bytes_or_status() {
        let server = MockServer::start_async().await;
        let ok = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/download_configs_zip")
                    .json_body_partial(format!(
                        r#"{{"params": {{"{}": true}}}}"#,
                        INCLUDE_INFINITE_BOUNDS
                    ));
                then.status(200)
                    .header("Content-Type", "application/zip")
                    .body(b"PK\x05\x06".as_slice());
            })
            .await;

        let backend = backend_for(&server);
        let params = params().with_flag(INCLUDE_INFINITE_BOUNDS, true);
        let data = backend.download_bundle(&params).await.unwrap();
        ok.assert_async().await;
        assert_eq!(data.as_ref(), b"PK\x05\x06");

        ok.delete_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/download_configs_zip");
                then.status(500).body("template missing");
            })
            .await;

        let err = backend.download_bundle(&params).await.unwrap_err();
        assert_eq!(
            err,
            BackendError::Status {
                status: 500,
                body: "template missing".into()
            }
        );
    }

    #[tokio::test]
    async fn unreachable_server_is_transport_error() {
        let settings = BackendSettings {
            base_url: "http://127.0.0.1:1".to_string(),
            ..BackendSettings::default()
        };
        let backend = HttpBackend::new(settings).unwrap();

        let err = backend.save_config(&params()).await.unwrap_err();
        assert!(matches!(err, BackendError::Transport(_)));
    }
}
