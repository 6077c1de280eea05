use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A security alert raised by the classification service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Alert {
    /// Server-assigned identifier (numeric or string)
    pub id: Option<Value>,
    
    /// Alert type, typically the classification label
    #[serde(rename = "type")]
    pub kind: Option<String>,
    
    /// Human readable description
    pub description: Option<String>,
    
    /// Source IP address
    pub source_ip: Option<String>,
    
    /// Destination IP address
    pub destination_ip: Option<String>,
    
    /// When the alert was raised, as sent by the service
    pub timestamp: Option<Value>,
    
    /// Severity string (`low`, `medium`, `high`)
    pub severity: Option<String>,
}

/// Alert severity tiers used for presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// `high` and `medium` map to their tiers, anything else is low
    pub fn from_field(severity: Option<&str>) -> Self {
        match severity {
            Some("high") => Severity::High,
            Some("medium") => Severity::Medium,
            _ => Severity::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
        }
    }
}

impl Alert {
    pub fn severity(&self) -> Severity {
        Severity::from_field(self.severity.as_deref())
    }

    /// Badge text: the reported severity upper-cased, `LOW` when absent
    pub fn severity_badge(&self) -> String {
        match self.severity.as_deref() {
            Some(s) if !s.is_empty() => s.to_uppercase(),
            _ => "LOW".to_string(),
        }
    }

    pub fn display_timestamp(&self) -> String {
        match &self.timestamp {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}

/// Response body of the alerts endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertList {
    #[serde(default)]
    pub alerts: Vec<Alert>,
}
