use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

use pktconsole::console::Console;
use pktconsole::models::capture::CaptureParams;
use pktconsole::models::config::{AppConfig, DEFAULT_API_URL, DEFAULT_INGEST_URL};
use pktconsole::ui::{terminal, Tab};
use pktconsole::utils::logging;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Operator console for a packet capture and threat classification service")]
struct Args {
    /// Base URL of the capture service API
    #[clap(long, default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Capture-file ingestion endpoint
    #[clap(long, default_value = DEFAULT_INGEST_URL)]
    ingest_url: String,

    /// Packets per page
    #[clap(long, default_value = "25")]
    page_size: u64,

    /// Directory exported files are saved into
    #[clap(long, default_value = ".")]
    download_dir: PathBuf,

    /// Network interface to capture from
    #[clap(short, long, default_value = "")]
    interface: String,

    /// Number of packets to capture
    #[clap(short = 'n', long, default_value = "100")]
    packet_count: u64,

    /// Capture timeout in seconds
    #[clap(short, long, default_value = "60")]
    timeout: u64,

    /// BPF filter expression
    #[clap(short, long, default_value = "")]
    filter: String,

    /// Log level (trace, debug, info, warn, error, off)
    #[clap(long, default_value = "info")]
    log_level: String,

    /// Log file; the terminal is taken by the console
    #[clap(long, default_value = "pktconsole.log")]
    log_file: PathBuf,

    /// Print one snapshot of the given tab and exit
    #[clap(long, value_name = "TAB")]
    print: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    logging::init_logger(logging::get_log_level(&args.log_level), Some(&args.log_file))
        .with_context(|| format!("cannot open log file {}", args.log_file.display()))?;

    info!("Starting pktconsole v{}", env!("CARGO_PKG_VERSION"));

    let print_tab = match args.print.as_deref() {
        Some(name) => Some(Tab::from_name(name).with_context(|| format!("unknown tab {name:?}"))?),
        None => None,
    };

    let config = AppConfig {
        api_url: args.api_url,
        ingest_url: args.ingest_url,
        page_size: args.page_size,
        download_dir: args.download_dir,
        capture: CaptureParams {
            interface: args.interface,
            packet_count: args.packet_count,
            timeout_seconds: args.timeout,
            filter_expression: args.filter,
        },
    };

    info!("Connecting to capture service at {}", config.api_url);
    let console = Arc::new(Console::new(config).context("cannot build HTTP client")?);

    // Initial snapshot
    console.resync().await;

    let result = match print_tab {
        Some(tab) => terminal::print_once(&console, tab).map_err(anyhow::Error::from),
        None => terminal::run(console.clone()).await.map_err(anyhow::Error::from),
    };

    console.shutdown();
    result
}
