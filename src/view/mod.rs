pub mod insights;

pub use insights::{InsightsModel, RECENT_ALERT_LIMIT};
