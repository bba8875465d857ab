//! Save-as target that writes configuration bundles into a folder.

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, info};
use zip::ZipArchive;

use pargamd_core::backend::{DownloadError, DownloadSink};
use pargamd_core::config::DownloadSettings;

/// List the entries of a zip bundle, rejecting anything that is not one.
pub fn bundle_entries(data: &[u8]) -> Result<Vec<String>, DownloadError> {
    let archive = ZipArchive::new(Cursor::new(data))
        .map_err(|e| DownloadError::InvalidArchive(e.to_string()))?;
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    Ok(names)
}

/// Writes each bundle as a file in one directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Sink for the configured download folder.
    pub fn from_settings(settings: &DownloadSettings) -> Self {
        Self::new(settings.resolve_directory())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Verify the bundle and write it under the sanitized name.
    fn write_bundle(&self, filename: &str, data: &[u8]) -> Result<PathBuf, DownloadError> {
        let entries = bundle_entries(data)?;
        debug!("Bundle contains {} files: {}", entries.len(), entries.join(", "));

        // Only the final component is used; the name comes from outside.
        let name = Path::new(filename)
            .file_name()
            .map(|n| n.to_owned())
            .ok_or_else(|| DownloadError::InvalidArchive(format!("bad file name '{}'", filename)))?;
        let path = self.dir.join(name);

        self.write_atomic(&path, data)
            .map_err(|source| DownloadError::Write {
                path: path.clone(),
                source,
            })?;
        info!("Wrote {} ({} bytes)", path.display(), data.len());
        Ok(path)
    }

    fn write_atomic(&self, path: &Path, data: &[u8]) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let temp_path = path.with_extension("zip.part");
        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(data)?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, path)
    }
}

#[async_trait]
impl DownloadSink for DirectorySink {
    async fn save_as(&self, filename: &str, data: Bytes) -> Result<PathBuf, DownloadError> {
        let sink = self.clone();
        let filename = filename.to_string();
        tokio::task::spawn_blocking(move || sink.write_bundle(&filename, &data))
            .await
            .map_err(|e| DownloadError::Task(e.to_string()))?
    }
}
