//! Request and reply shapes of the backend JSON endpoints.
//!
//! Every JSON reply carries a `success` flag; failures carry an `error`
//! string that is shown to the user verbatim.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backend::BackendError;
use crate::form::FormSnapshot;

/// Opaque field -> value map of a saved configuration.
pub type SavedConfiguration = serde_json::Map<String, Value>;

#[derive(Debug, Serialize)]
pub struct PreviewRequest<'a> {
    pub filename: &'a str,
    pub params: &'a FormSnapshot,
}

#[derive(Debug, Serialize)]
pub struct BundleRequest<'a> {
    pub params: &'a FormSnapshot,
}

#[derive(Debug, Serialize)]
pub struct LoadRequest<'a> {
    pub config_id: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PreviewReply {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SaveReply {
    pub config_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoadReply {
    pub config: SavedConfiguration,
}

/// Decode a `{success, error?, ...}` reply body into its payload.
pub fn decode_reply<T: DeserializeOwned>(body: &[u8]) -> Result<T, BackendError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| BackendError::Decode(e.to_string()))?;

    let success = value
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    if !success {
        let message = match value.get("error") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => "Request failed".to_string(),
            Some(other) => other.to_string(),
        };
        return Err(BackendError::Rejected(message));
    }

    serde_json::from_value(value).map_err(|e| BackendError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UploadedFileRecord;

    #[test]
    fn decodes_success_payload() {
        let body = br#"{"success":true,"file_path":"uploads/t4l.pdb","filename":"t4l.pdb","file_type":"pdb_file"}"#;
        let record: UploadedFileRecord = decode_reply(body).unwrap();
        assert_eq!(record.filename, "t4l.pdb");
        assert_eq!(record.file_type, "pdb_file");
    }

    #[test]
    fn failure_carries_server_text() {
        let body = br#"{"success":false,"error":"Configuration not found"}"#;
        let err = decode_reply::<LoadReply>(body).unwrap_err();
        assert_eq!(err, BackendError::Rejected("Configuration not found".into()));
    }

    #[test]
    fn missing_success_flag_is_failure() {
        let err = decode_reply::<SaveReply>(br#"{"config_id":"abc"}"#).unwrap_err();
        assert_eq!(err, BackendError::Rejected("Request failed".into()));
    }

    #[test]
    fn non_json_body_is_decode_error() {
        let err = decode_reply::<PreviewReply>(b"<html>500</html>").unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
    }

    #[test]
    fn success_without_payload_field_is_decode_error() {
        let err = decode_reply::<PreviewReply>(br#"{"success":true}"#).unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
    }
}
