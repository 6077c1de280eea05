//! Pure rendering of console state into styled lines.

use crate::console::{ConsoleSnapshot, NoticeLevel};
use crate::models::alert::{Alert, Severity};
use crate::models::config::AppConfig;
use crate::models::packet::{LabelTier, Packet};
use crate::ui::{App, Mode, Tab};

const BAR_WIDTH: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Muted,
    Heading,
    Accent,
    Good,
    Warn,
    Danger,
    Info,
    Disabled,
    Highlight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub tone: Tone,
}

impl Span {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Tone::Plain)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    pub fn new(spans: Vec<Span>) -> Self {
        Self { spans }
    }

    pub fn single(text: impl Into<String>, tone: Tone) -> Self {
        Self::new(vec![Span::new(text, tone)])
    }

    pub fn blank() -> Self {
        Self::default()
    }

    /// Concatenated text with styling dropped
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Render one full frame
pub fn render(app: &App, snap: &ConsoleSnapshot, config: &AppConfig) -> Vec<Line> {
    let mut lines = header(app, snap);
    lines.push(Line::blank());

    if app.mode == Mode::Detail {
        lines.extend(packet_detail(app, snap));
    } else {
        match app.tab {
            Tab::Dashboard => lines.extend(dashboard(snap)),
            Tab::Packets => lines.extend(packet_log(app, snap)),
            Tab::Alerts => lines.extend(alert_list(&snap.recent_alerts)),
            Tab::Settings => lines.extend(settings(snap, config)),
        }
    }

    lines.push(Line::blank());
    lines.push(footer(app, snap));
    lines
}

fn header(app: &App, snap: &ConsoleSnapshot) -> Vec<Line> {
    let (state, tone) = if snap.status.is_capturing {
        ("LIVE", Tone::Good)
    } else {
        ("STOPPED", Tone::Muted)
    };

    let mut title = vec![
        Span::new("Packet Capture Console", Tone::Heading),
        Span::plain("  ["),
        Span::new(state, tone),
        Span::plain("]  "),
        Span::new(
            format!("{} packets analyzed", snap.status.packets_analyzed),
            Tone::Info,
        ),
    ];
    if snap.busy {
        title.push(Span::new(format!("  ({}...)", snap.phase), Tone::Warn));
    }

    let tabs = Tab::ALL
        .iter()
        .enumerate()
        .flat_map(|(idx, tab)| {
            let tone = if *tab == app.tab {
                Tone::Highlight
            } else {
                Tone::Muted
            };
            [
                Span::new(format!(" {}:{} ", idx + 1, tab.title()), tone),
                Span::plain(" "),
            ]
        })
        .collect();

    vec![Line::new(title), Line::new(tabs)]
}

fn dashboard(snap: &ConsoleSnapshot) -> Vec<Line> {
    let stats = &snap.statistics;
    let mut lines = vec![Line::single("Overview", Tone::Heading)];

    let cards = [
        ("Packets analyzed", stats.basic_statistics.packets_analyzed, Tone::Info),
        ("Packets captured", snap.status.packets_captured, Tone::Info),
        ("Suspicious", stats.security_statistics.suspicious_detected, Tone::Warn),
        ("Malicious", stats.security_statistics.malicious_detected, Tone::Danger),
        ("Unique IPs", stats.unique_ips(), Tone::Accent),
    ];
    for (label, value, tone) in cards {
        lines.push(Line::new(vec![
            Span::plain(format!("  {:<18}", label)),
            Span::new(value.to_string(), tone),
        ]));
    }

    lines.push(Line::blank());
    lines.push(Line::single("Protocol distribution", Tone::Heading));
    let shares = stats.protocol_shares();
    if shares.is_empty() {
        lines.push(Line::single("  No data yet.", Tone::Muted));
    }
    for share in shares {
        let filled = (share.percentage * BAR_WIDTH / 100) as usize;
        lines.push(Line::new(vec![
            Span::plain(format!("  {:<8}", share.protocol)),
            Span::new("#".repeat(filled), Tone::Accent),
            Span::new(".".repeat(BAR_WIDTH as usize - filled), Tone::Muted),
            Span::plain(format!(" {:>3}% ({})", share.percentage, share.count)),
        ]));
    }

    lines.push(Line::blank());
    lines.extend(alert_list(&snap.recent_alerts));
    lines
}

fn alert_list(alerts: &[Alert]) -> Vec<Line> {
    let mut lines = vec![Line::single("Recent alerts", Tone::Heading)];
    if alerts.is_empty() {
        lines.push(Line::single("  No alerts.", Tone::Muted));
        return lines;
    }

    for alert in alerts {
        let tone = match alert.severity() {
            Severity::High => Tone::Danger,
            Severity::Medium => Tone::Warn,
            Severity::Low => Tone::Info,
        };
        lines.push(Line::new(vec![
            Span::plain("  "),
            Span::new(format!("[{:<6}]", alert.severity_badge()), tone),
            Span::plain(format!(
                " {}  {}",
                alert.display_timestamp(),
                alert.kind.as_deref().unwrap_or("alert")
            )),
        ]));

        let mut detail = String::from("           ");
        if let Some(description) = &alert.description {
            detail.push_str(description);
        }
        if let (Some(src), Some(dst)) = (&alert.source_ip, &alert.destination_ip) {
            detail.push_str(&format!("  {} -> {}", src, dst));
        }
        lines.push(Line::single(detail, Tone::Muted));
    }
    lines
}

fn packet_log(app: &App, snap: &ConsoleSnapshot) -> Vec<Line> {
    let view = &snap.packets;
    let draft = &app.filter_draft;
    let mut lines = Vec::new();

    let toggle = |on: bool| if on { Tone::Good } else { Tone::Muted };
    lines.push(Line::new(vec![
        Span::new("Filter ", Tone::Heading),
        Span::plain(format!(
            "proto[t]={} src[i]={} dst[o]={} ",
            draft.protocol.map(|p| p.as_str()).unwrap_or("all"),
            or_any(&draft.src_ip),
            or_any(&draft.dst_ip),
        )),
        Span::new("suspicious[z] ", toggle(draft.suspicious_only)),
        Span::new("malicious[m] ", toggle(draft.malicious_only)),
        Span::new(
            if *draft == view.filter {
                "(applied)"
            } else {
                "(press a to apply)"
            },
            Tone::Muted,
        ),
    ]));
    lines.push(Line::blank());

    lines.push(Line::single(
        format!(
            "{:>5}  {:<19}  {:<21}  {:<21}  {:<6}  {:>6}  {}",
            "#", "Time", "Source", "Destination", "Proto", "Size", "Label"
        ),
        Tone::Heading,
    ));

    if view.packets.is_empty() {
        lines.push(Line::single("  No packets to display.", Tone::Muted));
    }
    for (idx, packet) in view.packets.iter().enumerate() {
        lines.push(packet_row(view.page.row_number(idx), packet, idx == app.selected));
    }

    lines.push(Line::blank());
    let nav = |enabled: bool, text: &str| {
        Span::new(text, if enabled { Tone::Accent } else { Tone::Disabled })
    };
    lines.push(Line::new(vec![
        Span::plain(format!(
            "Showing {} of {} packets   ",
            view.packets.len(),
            view.page.total
        )),
        nav(view.page.has_prev(), "[p] Prev"),
        Span::plain(format!("  Page {}  ", view.page.page)),
        nav(view.page.has_next(), "[n] Next"),
    ]));
    lines
}

fn packet_row(number: u64, packet: &Packet, selected: bool) -> Line {
    let endpoint = |addr: Option<String>, port: Option<String>| {
        let addr = addr.unwrap_or_else(|| "-".to_string());
        match port {
            Some(port) => format!("{}:{}", addr, port),
            None => addr,
        }
    };

    let label_tone = match packet.tier() {
        LabelTier::Malicious => Tone::Danger,
        LabelTier::Suspicious => Tone::Warn,
        LabelTier::Benign => Tone::Good,
    };
    let base = if selected { Tone::Highlight } else { Tone::Plain };

    Line::new(vec![
        Span::new(
            format!(
                "{:>5}  {:<19}  {:<21}  {:<21}  {:<6}  {:>6}  ",
                number,
                packet.display_timestamp(),
                endpoint(packet.source(), packet.source_port()),
                endpoint(packet.destination(), packet.destination_port()),
                packet.protocol().unwrap_or_else(|| "-".to_string()),
                packet.size().unwrap_or_else(|| "-".to_string()),
            ),
            base,
        ),
        Span::new(packet.display_label(), label_tone),
    ])
}

fn packet_detail(app: &App, snap: &ConsoleSnapshot) -> Vec<Line> {
    let Some(packet) = snap.packets.packets.get(app.selected) else {
        return vec![Line::single("  No packet selected.", Tone::Muted)];
    };

    let title = match packet.id() {
        Some(id) => format!("Packet {} (Esc to close)", id),
        None => "Packet detail (Esc to close)".to_string(),
    };
    let mut lines = vec![Line::single(title, Tone::Heading)];
    lines.extend(
        packet
            .to_pretty_json()
            .lines()
            .map(|l| Line::single(l, Tone::Plain)),
    );
    lines
}

fn settings(snap: &ConsoleSnapshot, config: &AppConfig) -> Vec<Line> {
    let params = &snap.params;
    let row = |key: &str, label: &str, value: String| {
        Line::new(vec![
            Span::new(format!("  {:<4}", key), Tone::Accent),
            Span::plain(format!("{:<24}", label)),
            Span::new(value, Tone::Info),
        ])
    };

    let mut lines = vec![Line::single("Capture parameters", Tone::Heading)];
    lines.push(row("[i]", "Interface", or_any(&params.interface).to_string()));
    lines.push(row("[k]", "Packet count", params.packet_count.to_string()));
    lines.push(row("[w]", "Timeout (s)", params.timeout_seconds.to_string()));
    lines.push(row("[b]", "BPF filter", or_any(&params.filter_expression).to_string()));

    lines.push(Line::blank());
    lines.push(Line::single("Connection", Tone::Heading));
    lines.push(row("", "API base URL", config.api_url.clone()));
    lines.push(row("", "Ingestion URL", config.ingest_url.clone()));
    lines.push(row("", "Download dir", config.download_dir.display().to_string()));
    lines.push(row("", "Page size", config.page_size.to_string()));

    if let Some(path) = &snap.pending_upload {
        lines.push(Line::blank());
        lines.push(Line::new(vec![
            Span::plain("  Selected file: "),
            Span::new(path.display().to_string(), Tone::Info),
        ]));
    }
    lines
}

fn footer(app: &App, snap: &ConsoleSnapshot) -> Line {
    if let Some(notice) = &snap.notice {
        let tone = match notice.level {
            NoticeLevel::Info => Tone::Good,
            NoticeLevel::Error => Tone::Danger,
        };
        return Line::new(vec![
            Span::new(notice.message.clone(), tone),
            Span::new("  [Enter] OK", Tone::Muted),
        ]);
    }

    match &app.mode {
        Mode::Prompt { field, buffer } => Line::new(vec![
            Span::new(format!("{}: ", field.label()), Tone::Accent),
            Span::plain(format!("{}_", buffer)),
        ]),
        Mode::ConfirmClear => Line::single(
            "Clear all captured data? This cannot be undone. [y/N]",
            Tone::Warn,
        ),
        _ => {
            let capture = if snap.status.is_capturing {
                "[s] stop"
            } else {
                "[s] start"
            };
            let capture_tone = if snap.busy { Tone::Disabled } else { Tone::Accent };
            Line::new(vec![
                Span::new(capture, capture_tone),
                Span::new(
                    "  [r] refresh  [u] upload  [e/E] export json/csv  [c] clear  [Tab] switch  [q] quit",
                    Tone::Muted,
                ),
            ])
        }
    }
}

fn or_any(value: &str) -> &str {
    if value.is_empty() {
        "any"
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::Notice;
    use crate::models::capture::{CaptureParams, CaptureStatus};
    use crate::models::filter::PacketFilter;
    use crate::models::stats::Statistics;
    use crate::query::{PacketView, PageState};
    use crate::session::SessionPhase;
    use serde_json::json;

    fn snapshot() -> ConsoleSnapshot {
        ConsoleSnapshot {
            status: CaptureStatus::default(),
            phase: SessionPhase::Stopped,
            busy: false,
            packets: PacketView {
                packets: Vec::new(),
                page: PageState::new(25),
                filter: PacketFilter::default(),
            },
            statistics: Statistics::default(),
            recent_alerts: Vec::new(),
            params: CaptureParams::default(),
            pending_upload: None,
            notice: None,
        }
    }

    fn texts(lines: &[Line]) -> Vec<String> {
        lines.iter().map(Line::text).collect()
    }

    fn find_span<'a>(lines: &'a [Line], text: &str) -> Option<&'a Span> {
        lines
            .iter()
            .flat_map(|l| l.spans.iter())
            .find(|s| s.text == text)
    }

    #[test]
    fn header_follows_server_capture_flag() {
        let mut snap = snapshot();
        let lines = render(&App::default(), &snap, &AppConfig::default());
        assert_eq!(find_span(&lines, "STOPPED").map(|s| s.tone), Some(Tone::Muted));

        snap.status.is_capturing = true;
        snap.status.packets_analyzed = 42;
        let lines = render(&App::default(), &snap, &AppConfig::default());
        assert_eq!(find_span(&lines, "LIVE").map(|s| s.tone), Some(Tone::Good));
        assert!(texts(&lines)[0].contains("42 packets analyzed"));
    }

    #[test]
    fn empty_dashboard_shows_placeholders() {
        let lines = render(&App::default(), &snapshot(), &AppConfig::default());
        let text = texts(&lines);
        assert!(text.iter().any(|l| l.trim() == "No data yet."));
        assert!(text.iter().any(|l| l.trim() == "No alerts."));
    }

    #[test]
    fn protocol_bars_show_percentages() {
        let mut snap = snapshot();
        snap.statistics.protocol_distribution.insert("TCP".into(), 75);
        snap.statistics.protocol_distribution.insert("UDP".into(), 25);

        let text = texts(&render(&App::default(), &snap, &AppConfig::default()));
        assert!(text.iter().any(|l| l.contains("TCP") && l.contains(" 75% (75)")));
        assert!(text.iter().any(|l| l.contains("UDP") && l.contains(" 25% (25)")));
    }

    #[test]
    fn packet_rows_are_numbered_by_page() {
        let mut snap = snapshot();
        snap.packets.page = PageState {
            page: 2,
            page_size: 25,
            total: 30,
        };
        snap.packets.packets = vec![
            Packet::from_value(json!({"src_ip": "10.0.0.1", "src_port": 443, "label": "malicious"}))
                .unwrap(),
        ];

        let lines = render(&App::new(Tab::Packets), &snap, &AppConfig::default());
        let text = texts(&lines);
        assert!(text.iter().any(|l| l.trim_start().starts_with("26") && l.contains("10.0.0.1:443")));
        assert!(text.iter().any(|l| l.starts_with("Showing 1 of 30 packets")));
        assert_eq!(find_span(&lines, "malicious").map(|s| s.tone), Some(Tone::Danger));
        assert_eq!(find_span(&lines, "[n] Next").map(|s| s.tone), Some(Tone::Disabled));
        assert_eq!(find_span(&lines, "[p] Prev").map(|s| s.tone), Some(Tone::Accent));
    }

    #[test]
    fn empty_packet_log_has_placeholder() {
        let lines = render(&App::new(Tab::Packets), &snapshot(), &AppConfig::default());
        let text = texts(&lines);
        assert!(text.iter().any(|l| l.trim() == "No packets to display."));
        assert!(text.iter().any(|l| l.starts_with("Showing 0 of 0 packets")));
    }

    #[test]
    fn unlabelled_packet_shows_unknown() {
        let mut snap = snapshot();
        snap.packets.packets = vec![Packet::from_value(json!({"protocol": "UDP"})).unwrap()];
        snap.packets.page.total = 1;

        let lines = render(&App::new(Tab::Packets), &snap, &AppConfig::default());
        assert_eq!(find_span(&lines, "UNKNOWN").map(|s| s.tone), Some(Tone::Good));
    }

    #[test]
    fn alerts_are_toned_by_severity() {
        let mut snap = snapshot();
        snap.recent_alerts = vec![
            Alert {
                severity: Some("high".into()),
                ..Default::default()
            },
            Alert::default(),
        ];

        let lines = render(&App::new(Tab::Alerts), &snap, &AppConfig::default());
        assert_eq!(find_span(&lines, "[HIGH  ]").map(|s| s.tone), Some(Tone::Danger));
        assert_eq!(find_span(&lines, "[LOW   ]").map(|s| s.tone), Some(Tone::Info));
    }

    #[test]
    fn detail_view_dumps_selected_packet() {
        let mut snap = snapshot();
        snap.packets.packets = vec![Packet::from_value(json!({"id": 7, "protocol": "DNS"})).unwrap()];
        let mut app = App::new(Tab::Packets);
        app.mode = Mode::Detail;

        let text = texts(&render(&app, &snap, &AppConfig::default()));
        assert!(text.iter().any(|l| l.starts_with("Packet 7")));
        assert!(text.iter().any(|l| l.contains("\"protocol\": \"DNS\"")));
    }

    #[test]
    fn notice_replaces_footer() {
        let mut snap = snapshot();
        snap.notice = Some(Notice {
            level: NoticeLevel::Error,
            message: "Start failed: HTTP 500 - boom".into(),
        });

        let lines = render(&App::default(), &snap, &AppConfig::default());
        let last = lines.last().unwrap();
        assert_eq!(last.spans[0].tone, Tone::Danger);
        assert!(last.text().starts_with("Start failed: HTTP 500 - boom"));
    }

    #[test]
    fn settings_list_connection_and_params() {
        let mut snap = snapshot();
        snap.params.interface = "eth0".into();
        let text = texts(&render(&App::new(Tab::Settings), &snap, &AppConfig::default()));
        assert!(text.iter().any(|l| l.contains("Interface") && l.contains("eth0")));
        assert!(text.iter().any(|l| l.contains("http://localhost:8080/api")));
        assert!(text.iter().any(|l| l.contains("Page size") && l.contains("25")));
    }
}
