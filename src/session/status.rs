use log::warn;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::api::routes::CAPTURE_STATUS;
use crate::api::{ApiClient, RequestOptions};
use crate::models::capture::{CaptureStatus, StatusUpdate};

/// Cached copy of the service's capture status
#[derive(Clone)]
pub struct StatusCache {
    api: ApiClient,
    status: Arc<RwLock<CaptureStatus>>,
}

impl StatusCache {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            status: Arc::new(RwLock::new(CaptureStatus::default())),
        }
    }

    /// Poll the service and merge the answer. Failures keep the cached copy.
    pub async fn refresh(&self) {
        let update = match self.api.call(CAPTURE_STATUS, RequestOptions::get()).await {
            Ok(payload) => payload.decode::<StatusUpdate>(),
            Err(e) => Err(e),
        };

        match update {
            Ok(Some(update)) => self.status.write().merge(update),
            Ok(None) => {}
            Err(e) => warn!("Status refresh failed: {}", e),
        }
    }

    pub fn snapshot(&self) -> CaptureStatus {
        self.status.read().clone()
    }

    /// Provisional flag set on command success, replaced by the next poll
    pub fn set_capturing(&self, capturing: bool) {
        self.status.write().is_capturing = capturing;
    }
}
