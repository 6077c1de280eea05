use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use log::{debug, info, warn};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::commands::FileInput;
use crate::console::Console;
use crate::ui::render::{render, Line, Tone};
use crate::ui::{App, Field, Intent, Tab};
use crate::utils::error::{AppError, AppResult};

const INPUT_POLL: Duration = Duration::from_millis(200);

/// Raw mode and the alternate screen for as long as it lives
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

fn color_spec(tone: Tone) -> ColorSpec {
    let mut spec = ColorSpec::new();
    match tone {
        Tone::Plain => {}
        Tone::Muted | Tone::Disabled => {
            spec.set_dimmed(true);
        }
        Tone::Heading => {
            spec.set_bold(true);
        }
        Tone::Accent => {
            spec.set_fg(Some(Color::Cyan));
        }
        Tone::Good => {
            spec.set_fg(Some(Color::Green)).set_bold(true);
        }
        Tone::Warn => {
            spec.set_fg(Some(Color::Yellow));
        }
        Tone::Danger => {
            spec.set_fg(Some(Color::Red)).set_bold(true);
        }
        Tone::Info => {
            spec.set_fg(Some(Color::Blue));
        }
        Tone::Highlight => {
            spec.set_fg(Some(Color::Black)).set_bg(Some(Color::Cyan));
        }
    }
    spec
}

/// Write styled lines, each followed by `newline`
pub fn write_frame<W: WriteColor>(out: &mut W, lines: &[Line], newline: &str) -> io::Result<()> {
    for line in lines {
        for span in &line.spans {
            out.set_color(&color_spec(span.tone))?;
            write!(out, "{}", span.text)?;
        }
        out.reset()?;
        write!(out, "{}", newline)?;
    }
    out.flush()
}

/// Render one frame to stdout and return
pub fn print_once(console: &Console, tab: Tab) -> io::Result<()> {
    let lines = render(&App::new(tab), &console.snapshot(), console.config());
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    write_frame(&mut stdout, &lines, "\n")
}

/// Interactive loop; returns when the operator quits
pub async fn run(console: Arc<Console>) -> AppResult<()> {
    let _guard = TerminalGuard::enter().map_err(|e| AppError::TerminalError(e.to_string()))?;
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let mut app = App::default();
    let mut last_frame: Vec<Line> = Vec::new();

    info!("Terminal UI running");

    loop {
        let snap = console.snapshot();
        let frame = render(&app, &snap, console.config());
        if frame != last_frame {
            queue!(stdout, MoveTo(0, 0), Clear(ClearType::All))?;
            write_frame(&mut stdout, &frame, "\r\n")?;
            last_frame = frame;
        }

        if !event::poll(INPUT_POLL)? {
            continue;
        }
        let key = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => key,
            Event::Resize(..) => {
                last_frame.clear();
                continue;
            }
            _ => continue,
        };

        match app.handle_key(key, &snap) {
            Some(Intent::Quit) => break,
            Some(intent) => dispatch(&console, intent),
            None => {}
        }
    }

    info!("Terminal UI closed");
    Ok(())
}

/// Local edits run inline; anything touching the service runs as its own
/// task so the loop keeps taking keys while it is pending.
fn dispatch(console: &Arc<Console>, intent: Intent) {
    debug!("Dispatching {:?}", intent);

    match intent {
        Intent::Quit => {}
        Intent::DismissNotice => console.notices().dismiss(),
        Intent::SetParam(field, value) => set_param(console, field, &value),
        Intent::Upload(path) if !FileInput::accepts(&path) => {
            console
                .notices()
                .error(format!("Not a capture file: {}", path.display()));
        }
        intent => {
            let console = console.clone();
            tokio::spawn(async move { execute_intent(&console, intent).await });
        }
    }
}

async fn execute_intent(console: &Console, intent: Intent) {
    match intent {
        Intent::ToggleCapture => {
            let _ = console.toggle_capture().await;
        }
        Intent::RefreshAll => console.resync().await,
        Intent::RefreshPackets => console.refresh_packets().await,
        Intent::RefreshAlerts => console.refresh_alerts().await,
        Intent::NextPage => {
            console.next_page().await;
        }
        Intent::PrevPage => {
            console.prev_page().await;
        }
        Intent::ApplyFilter(filter) => console.apply_filter(filter).await,
        Intent::Upload(path) => {
            console.file_input().select(path);
            let _ = console.upload().await;
        }
        Intent::Export(format) => {
            let _ = console.export(format).await;
        }
        // the operator already answered the y/n prompt
        Intent::Clear => {
            let _ = console.clear(|| true).await;
        }
        Intent::Quit | Intent::DismissNotice | Intent::SetParam(..) => {}
    }
}

/// Numeric fields keep their old value when the input does not parse
fn set_param(console: &Console, field: Field, value: &str) {
    let value = value.trim();
    match field {
        Field::Interface => console.update_params(|p| p.interface = value.to_string()),
        Field::CaptureFilter => console.update_params(|p| p.filter_expression = value.to_string()),
        Field::PacketCount => match value.parse() {
            Ok(count) => console.update_params(|p| p.packet_count = count),
            Err(_) => warn!("Ignoring packet count {:?}", value),
        },
        Field::Timeout => match value.parse() {
            Ok(seconds) => console.update_params(|p| p.timeout_seconds = seconds),
            Err(_) => warn!("Ignoring timeout {:?}", value),
        },
        Field::SrcIp | Field::DstIp | Field::UploadPath => {}
    }
}
