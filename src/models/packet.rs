use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A packet record as served by the packet log.
///
/// The record is opaque: the console only reads a handful of well-known
/// fields for display and never validates them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Packet {
    fields: Map<String, Value>,
}

/// Severity tier derived from a packet's free-text label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelTier {
    Malicious,
    Suspicious,
    Benign,
}

impl LabelTier {
    /// Case-insensitive substring match, malicious taking precedence
    pub fn classify(label: Option<&str>) -> Self {
        let Some(label) = label else {
            return LabelTier::Benign;
        };
        let lower = label.to_lowercase();
        if lower.contains("malicious") {
            LabelTier::Malicious
        } else if lower.contains("suspicious") {
            LabelTier::Suspicious
        } else {
            LabelTier::Benign
        }
    }
}

/// Response body of the packet log endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PacketPage {
    #[serde(default)]
    pub packets: Option<Vec<Packet>>,

    #[serde(default)]
    pub total: Option<u64>,
}

impl Packet {
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    pub fn id(&self) -> Option<&Value> {
        self.fields.get("id").filter(|v| truthy(v))
    }

    /// Source address, `src_ip` falling back to `src`
    pub fn source(&self) -> Option<String> {
        self.first_text(&["src_ip", "src"])
    }

    /// Destination address, `dst_ip` falling back to `dst`
    pub fn destination(&self) -> Option<String> {
        self.first_text(&["dst_ip", "dst"])
    }

    pub fn source_port(&self) -> Option<String> {
        self.first_text(&["src_port"])
    }

    pub fn destination_port(&self) -> Option<String> {
        self.first_text(&["dst_port"])
    }

    pub fn protocol(&self) -> Option<String> {
        self.first_text(&["protocol"])
    }

    /// Frame size, `length` falling back to `size`
    pub fn size(&self) -> Option<String> {
        self.first_text(&["length", "size"])
    }

    pub fn label(&self) -> Option<String> {
        self.first_text(&["label"])
    }

    pub fn tier(&self) -> LabelTier {
        LabelTier::classify(self.label().as_deref())
    }

    /// Label text for display, `UNKNOWN` when the packet carries none
    pub fn display_label(&self) -> String {
        self.label().unwrap_or_else(|| "UNKNOWN".to_string())
    }

    /// Capture time in local time. A missing timestamp shows the current
    /// time; an unparseable one is shown as sent.
    pub fn display_timestamp(&self) -> String {
        const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

        let Some(raw) = self.fields.get("timestamp").filter(|v| truthy(v)) else {
            return Local::now().format(FORMAT).to_string();
        };

        match parse_timestamp(raw) {
            Some(ts) => ts.with_timezone(&Local).format(FORMAT).to_string(),
            None => render(raw),
        }
    }

    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.fields).unwrap_or_default()
    }

    fn first_text(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|k| self.fields.get(*k))
            .find(|v| truthy(v))
            .map(render)
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        _ => true,
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
                    .ok()
                    .map(|naive| Utc.from_utc_datetime(&naive))
            }),
        _ => None,
    }
}
