use futures::future::BoxFuture;
use std::sync::Arc;

use crate::query::PacketQuery;
use crate::session::{StatusCache, Synchronizer};
use crate::view::InsightsModel;

/// Refreshes every snapshot the console shows
#[derive(Clone)]
pub struct FullResync {
    pub status: StatusCache,
    pub packets: Arc<PacketQuery>,
    pub insights: Arc<InsightsModel>,
}

impl FullResync {
    /// Status, current packet page, statistics and alerts, concurrently
    pub async fn run(&self) {
        futures::join!(
            self.status.refresh(),
            self.packets.refresh(),
            self.insights.refresh_statistics(),
            self.insights.refresh_alerts()
        );
    }

    /// Everything except the capture status
    pub async fn refresh_data(&self) {
        futures::join!(
            self.packets.refresh(),
            self.insights.refresh_statistics(),
            self.insights.refresh_alerts()
        );
    }
}

impl Synchronizer for FullResync {
    fn resync(&self) -> BoxFuture<'static, ()> {
        let this = self.clone();
        Box::pin(async move { this.run().await })
    }
}
