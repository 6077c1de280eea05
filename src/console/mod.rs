//! The console: wires the API client, capture session, packet query and
//! insights together and turns operator intents into calls on them.

pub mod notice;
pub mod sync;

use log::{debug, info};
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;

use crate::api::ApiClient;
use crate::commands::{clear_data, export_packets, upload_capture, ExportFormat, FileInput};
use crate::models::alert::Alert;
use crate::models::capture::{CaptureParams, CaptureStatus};
use crate::models::config::AppConfig;
use crate::models::filter::PacketFilter;
use crate::models::stats::Statistics;
use crate::query::{PacketQuery, PacketView};
use crate::session::{CaptureSession, SessionPhase, StatusCache};
use crate::utils::error::{AppResult, CommandError, SessionError};
use crate::view::InsightsModel;

pub use notice::{Notice, NoticeBoard, NoticeLevel};
pub use sync::FullResync;

/// Everything the presentation layer needs for one frame
#[derive(Debug, Clone)]
pub struct ConsoleSnapshot {
    pub status: CaptureStatus,
    pub phase: SessionPhase,
    pub busy: bool,
    pub packets: PacketView,
    pub statistics: Statistics,
    pub recent_alerts: Vec<Alert>,
    pub params: CaptureParams,
    pub pending_upload: Option<PathBuf>,
    pub notice: Option<Notice>,
}

pub struct Console {
    config: AppConfig,
    api: ApiClient,
    sync: FullResync,
    session: CaptureSession,
    params: RwLock<CaptureParams>,
    file_input: FileInput,
    notices: NoticeBoard,
}

impl Console {
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let api = ApiClient::new(config.api_url.clone())?;

        let sync = FullResync {
            status: StatusCache::new(api.clone()),
            packets: Arc::new(PacketQuery::new(api.clone(), config.page_size)),
            insights: Arc::new(InsightsModel::new(api.clone())),
        };
        let session = CaptureSession::new(api.clone(), sync.status.clone(), Arc::new(sync.clone()));

        Ok(Self {
            params: RwLock::new(config.capture.clone()),
            config,
            api,
            sync,
            session,
            file_input: FileInput::new(),
            notices: NoticeBoard::default(),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> &CaptureSession {
        &self.session
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn file_input(&self) -> &FileInput {
        &self.file_input
    }

    pub fn snapshot(&self) -> ConsoleSnapshot {
        ConsoleSnapshot {
            status: self.sync.status.snapshot(),
            phase: self.session.phase(),
            busy: self.session.is_busy(),
            packets: self.sync.packets.snapshot(),
            statistics: self.sync.insights.statistics(),
            recent_alerts: self.sync.insights.recent_alerts(),
            params: self.params.read().clone(),
            pending_upload: self.file_input.selected(),
            notice: self.notices.current(),
        }
    }

    // ── Refreshes (advisory, never surfaced) ────────────────────

    /// Status, packets, statistics and alerts
    pub async fn resync(&self) {
        self.sync.run().await;
    }

    pub async fn refresh_packets(&self) {
        self.sync.packets.refresh().await;
    }

    pub async fn refresh_alerts(&self) {
        self.sync.insights.refresh_alerts().await;
    }

    // ── Packet log navigation ───────────────────────────────────

    pub async fn apply_filter(&self, filter: PacketFilter) {
        self.sync.packets.apply_filter(filter).await;
    }

    pub async fn next_page(&self) -> bool {
        self.sync.packets.next_page().await
    }

    pub async fn prev_page(&self) -> bool {
        self.sync.packets.prev_page().await
    }

    // ── Capture commands ────────────────────────────────────────

    pub fn update_params(&self, edit: impl FnOnce(&mut CaptureParams)) {
        edit(&mut *self.params.write());
    }

    pub async fn start_capture(&self) -> Result<(), SessionError> {
        let params = self.params.read().clone();
        let result = self.session.start(&params).await;
        self.report("Start failed", &result);
        result
    }

    pub async fn stop_capture(&self) -> Result<(), SessionError> {
        let result = self.session.stop().await;
        self.report("Stop failed", &result);
        result
    }

    /// Stop when the service reports a running capture, start otherwise
    pub async fn toggle_capture(&self) -> Result<(), SessionError> {
        if self.sync.status.snapshot().is_capturing {
            self.stop_capture().await
        } else {
            self.start_capture().await
        }
    }

    // ── Data commands ───────────────────────────────────────────

    /// Upload the file in the file input, then refresh packets,
    /// statistics and alerts
    pub async fn upload(&self) -> Result<bool, CommandError> {
        let result = upload_capture(
            &self.api,
            &self.config.ingest_url,
            &self.file_input,
            self.sync.refresh_data(),
        )
        .await;

        match &result {
            Ok(true) => self.notices.info("PCAP uploaded"),
            Ok(false) => debug!("Upload requested with no file selected"),
            Err(e) => self.notices.error(format!("Upload failed: {e}")),
        }
        result
    }

    pub async fn export(&self, format: ExportFormat) -> Result<PathBuf, CommandError> {
        let result = export_packets(&self.api, &self.config.download_dir, format).await;

        match &result {
            Ok(path) => self.notices.info(format!("Exported to {}", path.display())),
            Err(e) => self.notices.error(format!("Export failed: {e}")),
        }
        result
    }

    /// Clear stored data once `confirm` agrees. On success every local
    /// snapshot is emptied without asking the service again.
    pub async fn clear(&self, confirm: impl FnOnce() -> bool) -> Result<bool, CommandError> {
        let result = clear_data(&self.api, confirm).await;

        match &result {
            Ok(true) => {
                self.sync.packets.reset();
                self.sync.insights.reset();
                self.notices.info("Cleared");
            }
            Ok(false) => {}
            Err(e) => self.notices.error(format!("Clear failed: {e}")),
        }
        result
    }

    /// Release the poll timer; nothing polls once this returns
    pub fn shutdown(&self) {
        info!("Console shutting down");
        self.session.shutdown();
    }

    fn report(&self, context: &str, result: &Result<(), SessionError>) {
        match result {
            Ok(()) | Err(SessionError::Busy) => {}
            Err(e) => self.notices.error(format!("{context}: {e}")),
        }
    }
}
