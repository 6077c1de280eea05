use log::{info, warn};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::api::routes::{CAPTURE_START, CAPTURE_STOP};
use crate::api::{ApiClient, RequestOptions};
use crate::models::capture::CaptureParams;
use crate::session::status::StatusCache;
use crate::session::timer::{PollTimer, Synchronizer};
use crate::utils::error::SessionError;

/// Period of the live resync timer
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Lifecycle of the capture session as seen from the console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Stopped,
    Starting,
    Live,
    Stopping,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionPhase::Stopped => "STOPPED",
            SessionPhase::Starting => "STARTING",
            SessionPhase::Live => "LIVE",
            SessionPhase::Stopping => "STOPPING",
        };
        f.write_str(name)
    }
}

/// Drives start/stop commands and owns the poll timer
pub struct CaptureSession {
    /// Client for capture commands
    api: ApiClient,

    /// Cached service status
    status: StatusCache,

    /// Full resync run on every poll tick and after stop
    sync: Arc<dyn Synchronizer>,

    /// Current lifecycle phase
    phase: Mutex<SessionPhase>,

    /// Set while a start or stop is in flight
    busy: AtomicBool,

    /// The one poll timer slot
    timer: Mutex<PollTimer>,

    period: Duration,
}

/// Clears the busy flag when the command finishes, whatever the outcome
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl CaptureSession {
    pub fn new(api: ApiClient, status: StatusCache, sync: Arc<dyn Synchronizer>) -> Self {
        Self::with_period(api, status, sync, POLL_INTERVAL)
    }

    pub fn with_period(
        api: ApiClient,
        status: StatusCache,
        sync: Arc<dyn Synchronizer>,
        period: Duration,
    ) -> Self {
        Self {
            api,
            status,
            sync,
            phase: Mutex::new(SessionPhase::Stopped),
            busy: AtomicBool::new(false),
            timer: Mutex::new(PollTimer::new()),
            period,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        *self.phase.lock()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub fn is_polling(&self) -> bool {
        self.timer.lock().is_armed()
    }

    pub fn status(&self) -> &StatusCache {
        &self.status
    }

    /// Start a live capture with `params`.
    ///
    /// On success the session goes live and a fresh poll timer replaces any
    /// previous one. On failure the phase is restored and the timer is left
    /// as it was.
    pub async fn start(&self, params: &CaptureParams) -> Result<(), SessionError> {
        let _guard = self.acquire()?;
        let request = RequestOptions::post().json(params)?;
        let previous = self.set_phase(SessionPhase::Starting);

        info!(
            "Starting capture with interface: {:?}, packet count: {}, timeout: {}s, filter: {:?}",
            params.interface, params.packet_count, params.timeout_seconds, params.filter_expression
        );

        match self.api.call(CAPTURE_START, request).await {
            Ok(_) => {
                self.status.set_capturing(true);
                self.timer.lock().arm(self.period, self.sync.clone());
                self.set_phase(SessionPhase::Live);
                info!("Capture started successfully");
                Ok(())
            }
            Err(e) => {
                self.set_phase(previous);
                Err(e.into())
            }
        }
    }

    /// Stop the live capture.
    ///
    /// The timer is only torn down once the service confirms; a failed stop
    /// keeps polling because the capture may still be running. After a
    /// confirmed stop one last resync picks up the tail of the session.
    pub async fn stop(&self) -> Result<(), SessionError> {
        let _guard = self.acquire()?;
        let previous = self.set_phase(SessionPhase::Stopping);

        match self.api.call(CAPTURE_STOP, RequestOptions::post()).await {
            Ok(_) => {
                self.status.set_capturing(false);
                self.timer.lock().disarm();
                self.set_phase(SessionPhase::Stopped);
                info!("Capture stopped successfully");

                self.sync.resync().await;
                Ok(())
            }
            Err(e) => {
                self.set_phase(previous);
                Err(e.into())
            }
        }
    }

    /// Re-read the service's capture status into the cache; soft-fails
    pub async fn refresh_status(&self) {
        self.status.refresh().await;
    }

    /// Release the poll timer unconditionally
    pub fn shutdown(&self) {
        if self.timer.lock().disarm() {
            info!("Poll timer released on shutdown");
        }
    }

    fn acquire(&self) -> Result<BusyGuard<'_>, SessionError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("Capture command rejected: another one is in flight");
            return Err(SessionError::Busy);
        }
        Ok(BusyGuard(&self.busy))
    }

    fn set_phase(&self, next: SessionPhase) -> SessionPhase {
        std::mem::replace(&mut *self.phase.lock(), next)
    }
}
