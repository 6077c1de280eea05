use log::info;
use serde::Serialize;
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::api::routes::EXPORT;
use crate::api::{ApiClient, RequestOptions};
use crate::utils::error::CommandError;

/// Export file formats understood by the service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    /// Name the saved file gets in the download directory
    pub fn file_name(&self) -> String {
        format!("packets.{}", self.as_str())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize)]
struct ExportRequest {
    format: ExportFormat,
    include_raw: bool,
}

/// A downloaded blob parked in a temporary file until it is saved.
///
/// Saving consumes the blob and releases the temporary file, so the
/// handle cannot be used after release.
#[derive(Debug)]
pub struct TransientBlob {
    file: NamedTempFile,
}

impl TransientBlob {
    pub fn materialize(data: &[u8]) -> io::Result<Self> {
        let mut file = NamedTempFile::new()?;
        file.write_all(data)?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Copy the blob to `dest` and release the temporary file
    pub fn save_as(self, dest: &Path) -> io::Result<PathBuf> {
        std::fs::copy(self.file.path(), dest)?;
        self.file.close()?;
        Ok(dest.to_path_buf())
    }
}

/// Request an export in `format`, including raw payloads, and save it into
/// `download_dir`. Returns where the file was saved.
pub async fn export_packets(
    api: &ApiClient,
    download_dir: &Path,
    format: ExportFormat,
) -> Result<PathBuf, CommandError> {
    let request = RequestOptions::post()
        .json(&ExportRequest {
            format,
            include_raw: true,
        })?
        .blob();

    let data = api.call(EXPORT, request).await?.into_bytes();

    let blob = TransientBlob::materialize(&data)?;
    let saved = blob.save_as(&download_dir.join(format.file_name()))?;

    info!("Exported {} bytes to {}", data.len(), saved.display());
    Ok(saved)
}
