use log::info;
use parking_lot::Mutex;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::api::ApiClient;
use crate::utils::error::CommandError;

/// Capture file extensions offered for upload
pub const CAPTURE_EXTENSIONS: [&str; 2] = ["pcap", "pcapng"];

/// The file picker: holds at most one selected capture file
#[derive(Debug, Clone, Default)]
pub struct FileInput {
    selected: Arc<Mutex<Option<PathBuf>>>,
}

impl FileInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&self, path: impl Into<PathBuf>) {
        *self.selected.lock() = Some(path.into());
    }

    pub fn selected(&self) -> Option<PathBuf> {
        self.selected.lock().clone()
    }

    pub fn reset(&self) {
        self.selected.lock().take();
    }

    pub fn is_empty(&self) -> bool {
        self.selected.lock().is_none()
    }

    /// Whether the picker would list this file
    pub fn accepts(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                CAPTURE_EXTENSIONS
                    .iter()
                    .any(|allowed| ext.eq_ignore_ascii_case(allowed))
            })
            .unwrap_or(false)
    }
}

/// Empties the file input when dropped
struct ResetOnDrop<'a>(&'a FileInput);

impl Drop for ResetOnDrop<'_> {
    fn drop(&mut self) {
        self.0.reset();
    }
}

/// Post the selected capture file to the ingestion endpoint, then run
/// `after_ingest` to pull in what the service ingested.
///
/// Returns `Ok(false)` without touching anything when no file is selected.
/// Otherwise the input is reset once the call finishes, on success and
/// failure alike.
pub async fn upload_capture<F>(
    api: &ApiClient,
    ingest_url: &str,
    input: &FileInput,
    after_ingest: F,
) -> Result<bool, CommandError>
where
    F: Future<Output = ()>,
{
    let Some(path) = input.selected() else {
        return Ok(false);
    };
    let _reset = ResetOnDrop(input);

    info!("Uploading capture file {}", path.display());
    api.upload_file(ingest_url, &path).await?;
    info!("Capture file {} ingested", path.display());

    after_ingest.await;
    Ok(true)
}
