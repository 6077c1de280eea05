use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate statistics snapshot computed by the service
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Statistics {
    /// Packet totals
    pub basic_statistics: BasicStatistics,
    
    /// Classification counters
    pub security_statistics: SecurityStatistics,
    
    /// Address cardinality
    pub network_overview: NetworkOverview,
    
    /// Packets per protocol
    pub protocol_distribution: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct BasicStatistics {
    /// Total packets that went through classification
    pub packets_analyzed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct SecurityStatistics {
    pub suspicious_detected: u64,
    pub malicious_detected: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct NetworkOverview {
    pub unique_source_ips: u64,
    pub unique_destination_ips: u64,
}

/// One row of the protocol distribution chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolShare {
    pub protocol: String,
    pub count: u64,
    /// Rounded share of all protocol counts, 0..=100
    pub percentage: u64,
}

impl Statistics {
    /// Sources plus destinations, as shown on the dashboard card
    pub fn unique_ips(&self) -> u64 {
        self.network_overview.unique_source_ips + self.network_overview.unique_destination_ips
    }

    /// Distribution rows with display percentages
    pub fn protocol_shares(&self) -> Vec<ProtocolShare> {
        let total: u64 = self.protocol_distribution.values().sum();

        self.protocol_distribution
            .iter()
            .map(|(protocol, &count)| ProtocolShare {
                protocol: protocol.clone(),
                count,
                percentage: percentage(count, total),
            })
            .collect()
    }
}

/// `round(100 * count / total)`, with halves rounded up and 0 for an empty total
pub fn percentage(count: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    (200 * count + total) / (2 * total)
}
