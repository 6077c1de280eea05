//! Terminal presentation: tab state, key handling, rendering.

pub mod render;
pub mod terminal;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;

use crate::commands::ExportFormat;
use crate::console::ConsoleSnapshot;
use crate::models::filter::{PacketFilter, Protocol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Packets,
    Alerts,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Dashboard, Tab::Packets, Tab::Alerts, Tab::Settings];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Packets => "Packets",
            Tab::Alerts => "Alerts",
            Tab::Settings => "Settings",
        }
    }

    pub fn next(&self) -> Tab {
        let idx = Tab::ALL.iter().position(|t| t == self).unwrap_or(0);
        Tab::ALL[(idx + 1) % Tab::ALL.len()]
    }

    pub fn from_name(name: &str) -> Option<Tab> {
        Tab::ALL
            .iter()
            .copied()
            .find(|t| t.title().eq_ignore_ascii_case(name))
    }
}

/// Text fields the operator can type into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    SrcIp,
    DstIp,
    Interface,
    PacketCount,
    Timeout,
    CaptureFilter,
    UploadPath,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::SrcIp => "src ip",
            Field::DstIp => "dst ip",
            Field::Interface => "Interface (e.g., eth0)",
            Field::PacketCount => "Packet count",
            Field::Timeout => "Timeout (s)",
            Field::CaptureFilter => "BPF filter (optional)",
            Field::UploadPath => "Capture file (.pcap/.pcapng)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Prompt { field: Field, buffer: String },
    ConfirmClear,
    Detail,
}

/// What the operator asked for; executed by the terminal loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Quit,
    ToggleCapture,
    RefreshAll,
    RefreshPackets,
    RefreshAlerts,
    NextPage,
    PrevPage,
    ApplyFilter(PacketFilter),
    SetParam(Field, String),
    Upload(PathBuf),
    Export(ExportFormat),
    Clear,
    DismissNotice,
}

/// Per-session UI state; console data lives in [`ConsoleSnapshot`]
#[derive(Debug, Clone)]
pub struct App {
    pub tab: Tab,
    pub mode: Mode,
    /// Filter being edited, applied with `a`
    pub filter_draft: PacketFilter,
    /// Highlighted row on the packets tab
    pub selected: usize,
}

impl Default for App {
    fn default() -> Self {
        Self::new(Tab::Dashboard)
    }
}

impl App {
    pub fn new(tab: Tab) -> Self {
        Self {
            tab,
            mode: Mode::Normal,
            filter_draft: PacketFilter::default(),
            selected: 0,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, snap: &ConsoleSnapshot) -> Option<Intent> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Intent::Quit);
        }

        // a notice blocks everything until acknowledged
        if snap.notice.is_some() {
            return match key.code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Some(Intent::DismissNotice),
                _ => None,
            };
        }

        match std::mem::replace(&mut self.mode, Mode::Normal) {
            Mode::Normal => self.handle_normal(key, snap),
            Mode::Prompt { field, buffer } => self.handle_prompt(key, field, buffer),
            Mode::ConfirmClear => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => Some(Intent::Clear),
                _ => None,
            },
            Mode::Detail => match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => None,
                _ => {
                    self.mode = Mode::Detail;
                    None
                }
            },
        }
    }

    fn handle_normal(&mut self, key: KeyEvent, snap: &ConsoleSnapshot) -> Option<Intent> {
        match key.code {
            KeyCode::Char('q') => return Some(Intent::Quit),
            KeyCode::Tab => {
                self.tab = self.tab.next();
                return None;
            }
            KeyCode::Char(c @ '1'..='4') => {
                self.tab = Tab::ALL[(c as usize) - ('1' as usize)];
                return None;
            }
            KeyCode::Char('s') if !snap.busy => return Some(Intent::ToggleCapture),
            KeyCode::Char('r') => return Some(Intent::RefreshAll),
            KeyCode::Char('u') => return self.prompt(Field::UploadPath),
            KeyCode::Char('e') => return Some(Intent::Export(ExportFormat::Json)),
            KeyCode::Char('E') => return Some(Intent::Export(ExportFormat::Csv)),
            KeyCode::Char('c') => {
                self.mode = Mode::ConfirmClear;
                return None;
            }
            _ => {}
        }

        match self.tab {
            Tab::Packets => self.handle_packets(key, snap),
            Tab::Dashboard | Tab::Alerts => match key.code {
                KeyCode::Char('a') => Some(Intent::RefreshAlerts),
                _ => None,
            },
            Tab::Settings => match key.code {
                KeyCode::Char('i') => self.prompt(Field::Interface),
                KeyCode::Char('k') => self.prompt(Field::PacketCount),
                KeyCode::Char('w') => self.prompt(Field::Timeout),
                KeyCode::Char('b') => self.prompt(Field::CaptureFilter),
                _ => None,
            },
        }
    }

    fn handle_packets(&mut self, key: KeyEvent, snap: &ConsoleSnapshot) -> Option<Intent> {
        let page = &snap.packets.page;
        let rows = snap.packets.packets.len();

        match key.code {
            KeyCode::Char('n') | KeyCode::Right if page.has_next() => {
                self.selected = 0;
                Some(Intent::NextPage)
            }
            KeyCode::Char('p') | KeyCode::Left if page.has_prev() => {
                self.selected = 0;
                Some(Intent::PrevPage)
            }
            KeyCode::Char('g') => Some(Intent::RefreshPackets),
            KeyCode::Down => {
                if rows > 0 {
                    self.selected = (self.selected + 1).min(rows - 1);
                }
                None
            }
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Enter if rows > 0 => {
                self.mode = Mode::Detail;
                None
            }
            KeyCode::Char('t') => {
                self.filter_draft.protocol = Protocol::cycle(self.filter_draft.protocol);
                None
            }
            KeyCode::Char('i') => self.prompt(Field::SrcIp),
            KeyCode::Char('o') => self.prompt(Field::DstIp),
            KeyCode::Char('z') => {
                self.filter_draft.suspicious_only = !self.filter_draft.suspicious_only;
                None
            }
            KeyCode::Char('m') => {
                self.filter_draft.malicious_only = !self.filter_draft.malicious_only;
                None
            }
            KeyCode::Char('a') => {
                self.selected = 0;
                Some(Intent::ApplyFilter(self.filter_draft.clone()))
            }
            _ => None,
        }
    }

    fn handle_prompt(&mut self, key: KeyEvent, field: Field, mut buffer: String) -> Option<Intent> {
        match key.code {
            KeyCode::Esc => None,
            KeyCode::Enter => match field {
                Field::SrcIp => {
                    self.filter_draft.src_ip = buffer.trim().to_string();
                    None
                }
                Field::DstIp => {
                    self.filter_draft.dst_ip = buffer.trim().to_string();
                    None
                }
                Field::UploadPath if buffer.trim().is_empty() => None,
                Field::UploadPath => Some(Intent::Upload(PathBuf::from(buffer.trim()))),
                other => Some(Intent::SetParam(other, buffer)),
            },
            KeyCode::Backspace => {
                buffer.pop();
                self.mode = Mode::Prompt { field, buffer };
                None
            }
            KeyCode::Char(c) => {
                buffer.push(c);
                self.mode = Mode::Prompt { field, buffer };
                None
            }
            _ => {
                self.mode = Mode::Prompt { field, buffer };
                None
            }
        }
    }

    fn prompt(&mut self, field: Field) -> Option<Intent> {
        self.mode = Mode::Prompt {
            field,
            buffer: String::new(),
        };
        None
    }
}
