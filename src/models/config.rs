use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models::capture::CaptureParams;

/// Default base URL of the capture service API
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Default capture-file ingestion endpoint
pub const DEFAULT_INGEST_URL: &str = "http://localhost:8081/api/pcap/upload";

/// Default number of packets per page
pub const DEFAULT_PAGE_SIZE: u64 = 25;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the capture service REST API
    pub api_url: String,

    /// Capture-file ingestion endpoint (separate host)
    pub ingest_url: String,

    /// Packets per page, fixed for the session
    pub page_size: u64,

    /// Directory exported files are saved into
    pub download_dir: PathBuf,

    /// Initial capture parameters
    pub capture: CaptureParams,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            ingest_url: DEFAULT_INGEST_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            download_dir: PathBuf::from("."),
            capture: CaptureParams::default(),
        }
    }
}
