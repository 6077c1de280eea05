use log::{debug, warn};
use parking_lot::RwLock;

use crate::api::routes::PACKETS;
use crate::api::{ApiClient, RequestOptions};
use crate::models::filter::PacketFilter;
use crate::models::packet::{Packet, PacketPage};
use crate::utils::error::ApiError;

/// Pagination state of the packet log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    /// Current page, starting at 1
    pub page: u64,

    /// Packets per page, fixed for the session
    pub page_size: u64,

    /// Total reported by the service; may move between fetches
    pub total: u64,
}

impl PageState {
    pub fn new(page_size: u64) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            total: 0,
        }
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page.saturating_mul(self.page_size) < self.total
    }

    /// 1-based position in the whole log of the `idx`th row on this page
    pub fn row_number(&self, idx: usize) -> u64 {
        (self.page - 1) * self.page_size + idx as u64 + 1
    }
}

/// Snapshot handed to the presentation layer
#[derive(Debug, Clone)]
pub struct PacketView {
    pub packets: Vec<Packet>,
    pub page: PageState,
    pub filter: PacketFilter,
}

#[derive(Debug)]
struct QueryState {
    filter: PacketFilter,
    page: PageState,
    packets: Vec<Packet>,
}

/// Server-side filtered, paginated view of the packet log
pub struct PacketQuery {
    api: ApiClient,
    state: RwLock<QueryState>,
}

impl PacketQuery {
    pub fn new(api: ApiClient, page_size: u64) -> Self {
        Self {
            api,
            state: RwLock::new(QueryState {
                filter: PacketFilter::default(),
                page: PageState::new(page_size),
                packets: Vec::new(),
            }),
        }
    }

    pub fn snapshot(&self) -> PacketView {
        let state = self.state.read();
        PacketView {
            packets: state.packets.clone(),
            page: state.page,
            filter: state.filter.clone(),
        }
    }

    pub fn page(&self) -> PageState {
        self.state.read().page
    }

    pub fn filter(&self) -> PacketFilter {
        self.state.read().filter.clone()
    }

    /// Move to `page` and replace the local list with that page.
    ///
    /// Whichever response arrives last wins; an older request resolving
    /// after a newer one can leave a stale page on screen until the next
    /// fetch. Failures are logged and leave the current list in place.
    pub async fn fetch_page(&self, page: u64) {
        let query = {
            let mut state = self.state.write();
            state.page.page = page.max(1);
            query_pairs(&state.page, &state.filter)
        };

        match self.request(query).await {
            Ok(body) => {
                let packets = body.packets.unwrap_or_default();
                let total = match body.total {
                    Some(total) if total > 0 => total,
                    _ => packets.len() as u64,
                };

                debug!("Fetched {} packets (total {})", packets.len(), total);

                let mut state = self.state.write();
                state.packets = packets;
                state.page.total = total;
            }
            Err(e) => warn!("Packet fetch failed: {}", e),
        }
    }

    /// Refetch the current page
    pub async fn refresh(&self) {
        let page = self.page().page;
        self.fetch_page(page).await;
    }

    /// Replace the filter and start over from page 1
    pub async fn apply_filter(&self, filter: PacketFilter) {
        self.state.write().filter = filter;
        self.fetch_page(1).await;
    }

    /// Returns false without fetching when already past the last page
    pub async fn next_page(&self) -> bool {
        let page = self.page();
        if !page.has_next() {
            return false;
        }
        self.fetch_page(page.page + 1).await;
        true
    }

    /// Returns false without fetching when already on the first page
    pub async fn prev_page(&self) -> bool {
        let page = self.page();
        if !page.has_prev() {
            return false;
        }
        self.fetch_page(page.page - 1).await;
        true
    }

    /// Forget every fetched packet and the total
    pub fn reset(&self) {
        let mut state = self.state.write();
        state.packets.clear();
        state.page.total = 0;
    }

    async fn request(&self, query: Vec<(&'static str, String)>) -> Result<PacketPage, ApiError> {
        let payload = self
            .api
            .call(PACKETS, RequestOptions::get().query(query))
            .await?;
        Ok(payload.decode::<PacketPage>()?.unwrap_or_default())
    }
}

/// `page` and `page_size` followed by every filter field that is set
pub fn query_pairs(page: &PageState, filter: &PacketFilter) -> Vec<(&'static str, String)> {
    let mut pairs = vec![
        ("page", page.page.to_string()),
        ("page_size", page.page_size.to_string()),
    ];
    pairs.extend(filter.query_pairs());
    pairs
}
