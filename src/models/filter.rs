use serde::{Deserialize, Serialize};
use std::fmt;

/// Protocols the packet log can be narrowed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    Tcp,
    Udp,
    Http,
    Dns,
    Icmp,
}

impl Protocol {
    pub const ALL: [Protocol; 5] = [
        Protocol::Tcp,
        Protocol::Udp,
        Protocol::Http,
        Protocol::Dns,
        Protocol::Icmp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
            Protocol::Http => "HTTP",
            Protocol::Dns => "DNS",
            Protocol::Icmp => "ICMP",
        }
    }

    /// Step through "all protocols" followed by each protocol in turn
    pub fn cycle(current: Option<Protocol>) -> Option<Protocol> {
        match current {
            None => Some(Protocol::ALL[0]),
            Some(p) => {
                let idx = Protocol::ALL.iter().position(|x| *x == p).unwrap_or(0);
                Protocol::ALL.get(idx + 1).copied()
            }
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display filter applied server-side to the packet log
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketFilter {
    /// Filter by protocol, `None` for all protocols
    pub protocol: Option<Protocol>,

    /// Filter by source IP address
    pub src_ip: String,

    /// Filter by destination IP address
    pub dst_ip: String,

    /// Only packets labelled suspicious
    pub suspicious_only: bool,

    /// Only packets labelled malicious
    pub malicious_only: bool,
}

impl PacketFilter {
    /// Query pairs for every field that carries a value. Empty strings,
    /// `false` and unset protocol are left out entirely.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(protocol) = self.protocol {
            pairs.push(("protocol", protocol.as_str().to_string()));
        }
        if !self.src_ip.is_empty() {
            pairs.push(("src_ip", self.src_ip.clone()));
        }
        if !self.dst_ip.is_empty() {
            pairs.push(("dst_ip", self.dst_ip.clone()));
        }
        if self.suspicious_only {
            pairs.push(("suspicious_only", "true".to_string()));
        }
        if self.malicious_only {
            pairs.push(("malicious_only", "true".to_string()));
        }

        pairs
    }
}
