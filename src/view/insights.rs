use log::warn;
use parking_lot::RwLock;

use crate::api::routes::{ALERTS, STATISTICS};
use crate::api::{ApiClient, RequestOptions};
use crate::models::alert::{Alert, AlertList};
use crate::models::stats::Statistics;
use crate::utils::error::ApiError;

/// Number of alerts the console lists
pub const RECENT_ALERT_LIMIT: usize = 10;

/// Latest statistics and alert snapshots.
///
/// Both are advisory: a failed refresh is logged and the previous snapshot
/// stays on screen.
pub struct InsightsModel {
    api: ApiClient,
    statistics: RwLock<Statistics>,
    alerts: RwLock<Vec<Alert>>,
}

impl InsightsModel {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            statistics: RwLock::new(Statistics::default()),
            alerts: RwLock::new(Vec::new()),
        }
    }

    pub async fn refresh_statistics(&self) {
        match self.fetch::<Statistics>(STATISTICS).await {
            Ok(stats) => *self.statistics.write() = stats.unwrap_or_default(),
            Err(e) => warn!("Statistics refresh failed: {}", e),
        }
    }

    pub async fn refresh_alerts(&self) {
        match self.fetch::<AlertList>(ALERTS).await {
            Ok(list) => *self.alerts.write() = list.unwrap_or_default().alerts,
            Err(e) => warn!("Alert refresh failed: {}", e),
        }
    }

    pub fn statistics(&self) -> Statistics {
        self.statistics.read().clone()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.read().clone()
    }

    /// The first alerts of the fetched set, in service order
    pub fn recent_alerts(&self) -> Vec<Alert> {
        self.alerts
            .read()
            .iter()
            .take(RECENT_ALERT_LIMIT)
            .cloned()
            .collect()
    }

    pub fn reset(&self) {
        *self.statistics.write() = Statistics::default();
        self.alerts.write().clear();
    }

    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
    ) -> Result<Option<T>, ApiError> {
        self.api
            .call(endpoint, RequestOptions::get())
            .await?
            .decode::<T>()
    }
}
