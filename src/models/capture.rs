use serde::{Deserialize, Serialize};

/// Capture status as reported by the capture service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureStatus {
    /// Whether the service is currently capturing
    pub is_capturing: bool,
    
    /// Packets captured since the session started
    pub packets_captured: u64,
    
    /// Packets that went through classification
    pub packets_analyzed: u64,
}

/// Partial status update. The service may omit any field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusUpdate {
    pub is_capturing: Option<bool>,
    pub packets_captured: Option<u64>,
    pub packets_analyzed: Option<u64>,
}

impl CaptureStatus {
    /// Merge a status response into the cached copy, keeping fields the
    /// response did not carry.
    pub fn merge(&mut self, update: StatusUpdate) {
        if let Some(capturing) = update.is_capturing {
            self.is_capturing = capturing;
        }
        if let Some(captured) = update.packets_captured {
            self.packets_captured = captured;
        }
        if let Some(analyzed) = update.packets_analyzed {
            self.packets_analyzed = analyzed;
        }
    }
}

/// Parameters sent verbatim as the body of a start command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureParams {
    /// Network interface to capture from (e.g. eth0)
    pub interface: String,
    
    /// Number of packets the service should capture
    pub packet_count: u64,
    
    /// Capture timeout in seconds, enforced by the service
    #[serde(rename = "timeout")]
    pub timeout_seconds: u64,
    
    /// Optional capture filter expression (BPF syntax)
    #[serde(rename = "filter")]
    pub filter_expression: String,
}

impl Default for CaptureParams {
    fn default() -> Self {
        Self {
            interface: String::new(),
            packet_count: 100,
            timeout_seconds: 60,
            filter_expression: String::new(),
        }
    }
}
