//! Capture service endpoints, relative to the configured API base URL.

/// Current capture status
pub const CAPTURE_STATUS: &str = "/capture/status";

/// Start a live capture with `CaptureParams` as body
pub const CAPTURE_START: &str = "/capture/start";

/// Stop the live capture
pub const CAPTURE_STOP: &str = "/capture/stop";

/// Paginated, filterable packet log
pub const PACKETS: &str = "/packets";

/// Aggregate statistics snapshot
pub const STATISTICS: &str = "/statistics";

/// Recent security alerts
pub const ALERTS: &str = "/alerts";

/// Export stored packets as a downloadable file
pub const EXPORT: &str = "/export";

/// Delete all stored packets
pub const CLEAR: &str = "/clear";
